use iced::alignment::Alignment;
use iced::widget::{button, column, container, row, text};
use iced::{Element, Length};

use crate::Message;
use crate::notify::Notifications;

use super::style;

pub fn view(notifications: &Notifications) -> Element<'_, Message> {
    notifications
        .entries()
        .iter()
        .fold(column![].spacing(6).width(Length::Fill), |list, entry| {
            list.push(
                container(
                    row![
                        text(&entry.message)
                            .size(12)
                            .color(style::severity_color(entry.severity))
                            .width(Length::Fill),
                        button(text("✕").size(11))
                            .on_press(Message::NotificationDismissed(entry.id))
                            .padding([2, 6])
                            .style(style::ghost_button),
                    ]
                    .spacing(8)
                    .align_y(Alignment::Center),
                )
                .padding([8, 10])
                .width(Length::Fill)
                .style(move |_| style::toast_style(entry.severity)),
            )
        })
        .into()
}
