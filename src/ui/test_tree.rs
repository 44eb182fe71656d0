use iced::alignment::Alignment;
use iced::widget::{button, checkbox, column, container, horizontal_space, row, scrollable, text};
use iced::{Element, Length};

use crate::Message;
use crate::selection::{SelectionState, SelectionTree, TestGroup};

use super::style;

pub fn view<'a>(tree: &'a SelectionTree, select_all: bool) -> Element<'a, Message> {
    let header = row![
        checkbox("Select all", select_all)
            .on_toggle(|_| Message::SelectAllToggled)
            .size(16)
            .text_size(12)
            .style(style::checkbox_style),
        horizontal_space(),
        text(format!("{} selected", tree.selected_count()))
            .size(11)
            .color(style::TEXT_MUTED),
    ]
    .align_y(Alignment::Center);

    let list = tree
        .groups()
        .iter()
        .fold(column![].spacing(2), |list, group| list.push(group_view(group)));

    column![
        text("Test Cases").size(13).color(style::TEXT_MUTED),
        header,
        scrollable(list).height(Length::Fill),
    ]
    .spacing(8)
    .height(Length::Fill)
    .into()
}

fn group_view(group: &TestGroup) -> Element<'_, Message> {
    let id = group.id;
    let count = match group.selection_state() {
        SelectionState::Partial => format!("{}/{}", group.checked_count(), group.sub.len()),
        SelectionState::Checked | SelectionState::Unchecked => String::new(),
    };

    let expand = button(text(if group.expanded { "▾" } else { "▸" }).size(12))
        .on_press(Message::GroupExpandToggled(id))
        .padding([2, 8])
        .style(style::ghost_button);

    let parent = row![
        checkbox(group.name.as_str(), group.checked)
            .on_toggle(move |_| Message::GroupToggled(id))
            .size(16)
            .text_size(13)
            .style(style::checkbox_style),
        horizontal_space(),
        text(count).size(11).color(style::WARNING),
        expand,
    ]
    .spacing(6)
    .align_y(Alignment::Center);

    let mut section = column![parent].spacing(2);
    if group.expanded {
        for (index, sub) in group.sub.iter().enumerate() {
            section = section.push(
                container(
                    checkbox(sub.name.as_str(), sub.checked)
                        .on_toggle(move |_| Message::SubTestToggled(id, index))
                        .size(14)
                        .text_size(11)
                        .style(style::checkbox_style),
                )
                .padding([2, 28]),
            );
        }
    }

    container(section)
        .padding([6, 8])
        .width(Length::Fill)
        .style(|_| style::flat_surface_style(style::SURFACE_0))
        .into()
}
