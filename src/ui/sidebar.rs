use std::time::{SystemTime, UNIX_EPOCH};

use iced::alignment::Alignment;
use iced::widget::{button, column, container, horizontal_space, row, scrollable, text};
use iced::{Element, Length};

use crate::Message;
use crate::history::{RunOutcome, RunRecord};

use super::style;

pub fn view(entries: &[RunRecord]) -> Element<'_, Message> {
    let mut list = column![
        row![
            text("Run History").size(11).color(style::TEXT_MUTED),
            horizontal_space(),
            button(text("Clear").size(11))
                .on_press(Message::HistoryCleared)
                .padding([3, 8])
                .style(style::ghost_button)
        ]
        .align_y(Alignment::Center)
    ]
    .spacing(6);

    if entries.is_empty() {
        list = list.push(text("No runs yet").size(12).color(style::TEXT_MUTED));
    } else {
        for entry in entries {
            list = list.push(entry_view(entry));
        }
    }

    container(scrollable(list.spacing(4)).height(Length::Fill))
        .padding([8, 10])
        .height(Length::Fill)
        .style(|_| style::surface_style(style::SURFACE_0, 0.0))
        .into()
}

fn entry_view(entry: &RunRecord) -> Element<'_, Message> {
    let (badge, color) = match entry.outcome {
        RunOutcome::Completed => ("DONE", style::PRIMARY),
        RunOutcome::Failed => ("FAIL", style::DANGER),
    };

    let mut details = column![
        text(truncate(&entry.endpoint, 26)).size(12),
        text(format!(
            "{} · {} test(s)",
            relative_time(entry.timestamp),
            entry.selected_count
        ))
        .size(10)
        .color(style::TEXT_MUTED),
    ]
    .spacing(2);
    if let Some(summary) = &entry.summary {
        details = details.push(text(truncate(summary, 34)).size(10).color(style::TEXT_MUTED));
    }

    container(
        row![text(badge).size(10).color(color).width(36), details]
            .spacing(6)
            .align_y(Alignment::Center),
    )
    .padding([6, 8])
    .width(Length::Fill)
    .style(|_| style::surface_style(style::SURFACE_1, 6.0))
    .into()
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let head: String = value.chars().take(max_chars).collect();
        format!("{head}…")
    }
}

fn relative_time(timestamp: u64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(timestamp);
    let diff = now.saturating_sub(timestamp);

    if diff < 60 {
        format!("{diff}s ago")
    } else if diff < 3600 {
        format!("{}m ago", diff / 60)
    } else if diff < 86400 {
        format!("{}h ago", diff / 3600)
    } else {
        format!("{}d ago", diff / 86400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("https://a", 20), "https://a");
        assert_eq!(truncate("ééééé", 3), "ééé…");
    }

    #[test]
    fn future_timestamps_read_as_now() {
        assert_eq!(relative_time(u64::MAX), "0s ago");
    }
}
