use iced::alignment::Alignment;
use iced::widget::{button, container, horizontal_space, row, text};
use iced::{Element, Length};

use crate::Message;

use super::style;

pub fn view<'a>(sidebar_open: bool, suite_url: &'a str) -> Element<'a, Message> {
    let sidebar_toggle = button(text(if sidebar_open { "◀" } else { "▶" }).size(14))
        .on_press(Message::SidebarTogglePressed)
        .padding([6, 10])
        .style(style::ghost_button);

    container(
        row![
            sidebar_toggle,
            text("SCIM2 Compliance Test Suite").size(16),
            text(format!("v{}", env!("CARGO_PKG_VERSION"))).size(10).color(style::TEXT_MUTED),
            horizontal_space(),
            text(suite_url).size(11).color(style::TEXT_MUTED),
        ]
        .spacing(8)
        .padding([5, 12])
        .align_y(Alignment::Center),
    )
    .width(Length::Fill)
    .style(|_| style::surface_style(style::SURFACE_1, 0.0))
    .into()
}
