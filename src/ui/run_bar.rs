use iced::alignment::Alignment;
use iced::widget::{button, column, horizontal_space, row, text};
use iced::{Element, Length};

use crate::Message;

use super::style;

/// Auth key button plus the Run trigger. Run is disabled while a run is in flight.
pub fn view<'a>(auth_missing: bool, in_flight: bool) -> Element<'a, Message> {
    let key_button = button(text("🔑 Authentication").size(12))
        .on_press(Message::AuthDialogOpened)
        .padding([6, 10])
        .style(style::key_button(auth_missing));

    let run_button = button(text(if in_flight { "Running..." } else { "Run ▶" }).size(13))
        .on_press_maybe((!in_flight).then_some(Message::RunPressed))
        .padding([6, 16])
        .style(style::primary_button);

    let mut bar = column![
        row![key_button, horizontal_space(), run_button]
            .spacing(10)
            .align_y(Alignment::Center)
    ]
    .spacing(4)
    .width(Length::Fill);

    if auth_missing {
        bar = bar.push(text("Authentication details not submitted").size(11).color(style::DANGER));
    }

    bar.into()
}
