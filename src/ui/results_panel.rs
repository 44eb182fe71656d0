use iced::alignment::Alignment;
use iced::widget::{column, container, horizontal_space, progress_bar, row, scrollable, text};
use iced::{Element, Length};
use serde_json::Value;

use crate::Message;
use crate::http::response::{RunReport, pretty, result_heading};
use crate::runner::RunState;

use super::style;

pub fn view(state: &RunState) -> Element<'_, Message> {
    let mut section = column![].spacing(12).width(Length::Fill);

    if state.in_flight {
        section = section.push(progress_view(state));
    }

    if let Some(statistics) = &state.statistics {
        section = section.push(summary_view(statistics, state.report_link.as_deref()));
    }

    match &state.results {
        Some(results) if !results.is_empty() => {
            let list = results
                .iter()
                .fold(column![].spacing(8), |list, result| list.push(result_view(result)));
            section = section.push(scrollable(list).height(Length::Fill));
        }
        _ if !state.in_flight && state.statistics.is_none() => {
            section = section.push(
                container(text("No results yet").size(14).color(style::TEXT_MUTED))
                    .center_x(Length::Fill)
                    .padding(16),
            );
        }
        _ => {}
    }

    container(section).padding(16).height(Length::Fill).into()
}

fn progress_view(state: &RunState) -> Element<'_, Message> {
    let (value, label) = match state.percent {
        Some(percent) => (percent as f32, format!("Receiving results... {percent}%")),
        None => (
            state.progress_count.min(100) as f32,
            format!("Running {} test case(s)...", state.progress_count),
        ),
    };

    column![
        text(label).size(12).color(style::TEXT_MUTED),
        progress_bar(0.0..=100.0, value)
            .height(8)
            .style(style::progress_style),
    ]
    .spacing(6)
    .into()
}

fn summary_view<'a>(statistics: &'a Value, link: Option<&'a str>) -> Element<'a, Message> {
    let report = RunReport {
        statistics: Some(statistics.clone()),
        ..RunReport::default()
    };

    let rows = report
        .statistics_rows()
        .into_iter()
        .fold(row![].spacing(18), |rows, (key, value)| {
            rows.push(
                column![
                    text(value).size(18),
                    text(key).size(11).color(style::TEXT_MUTED),
                ]
                .spacing(2)
                .align_x(Alignment::Center),
            )
        });

    let mut summary = column![text("Summary").size(14), rows].spacing(10);
    if let Some(link) = link {
        summary = summary.push(text(format!("Report: {link}")).size(11).color(style::INFO));
    }

    container(summary)
        .padding(12)
        .width(Length::Fill)
        .style(|_| style::surface_style(style::SURFACE_1, 8.0))
        .into()
}

fn result_view(result: &Value) -> Element<'_, Message> {
    let (title, status) = result_heading(result);
    let status_text = status.unwrap_or_default();
    let status_color = style::status_color(&status_text);

    container(
        column![
            row![
                text(title).size(13),
                horizontal_space(),
                text(status_text).size(12).color(status_color),
            ]
            .align_y(Alignment::Center),
            text(pretty(result)).size(11).color(style::TEXT_MUTED),
        ]
        .spacing(6),
    )
    .padding(10)
    .width(Length::Fill)
    .style(|_| style::surface_style(style::SURFACE_1, 8.0))
    .into()
}
