use iced::widget::{button, column, container, horizontal_space, pick_list, row, text, text_input};
use iced::{Element, Length};

use crate::Message;
use crate::auth::{AuthField, AuthForm, AuthType, FieldErrors};

use super::style;

pub fn view<'a>(form: &'a AuthForm, errors: &'a FieldErrors) -> Element<'a, Message> {
    let auth_type_selector = pick_list(AuthType::ALL, Some(form.auth_type), Message::AuthTypeSelected)
        .width(240)
        .style(style::pick_list_style)
        .padding([6, 8]);

    let mut section = column![
        text("Authentication").size(16),
        text("To execute tests please provide the details below.")
            .size(12)
            .color(style::TEXT_MUTED),
        labelled_input(
            "https://localhost:9443/scim2",
            &form.endpoint,
            errors.get(AuthField::Endpoint),
            false,
            Message::EndpointChanged,
        ),
        auth_type_selector,
    ]
    .spacing(10);

    section = match form.auth_type {
        AuthType::Basic => section
            .push(labelled_input(
                "enter your username",
                &form.user_name,
                errors.get(AuthField::UserName),
                false,
                Message::UserNameChanged,
            ))
            .push(labelled_input(
                "enter your password",
                &form.password,
                errors.get(AuthField::Password),
                true,
                Message::PasswordChanged,
            )),
        AuthType::Bearer => section.push(labelled_input(
            "enter your token",
            &form.token,
            errors.get(AuthField::Token),
            false,
            Message::TokenChanged,
        )),
    };

    let actions = row![
        horizontal_space(),
        button(text("Cancel").size(13))
            .on_press(Message::AuthDialogClosed)
            .padding([6, 14])
            .style(style::subtle_button),
        button(text("Submit").size(13))
            .on_press(Message::AuthSubmitted)
            .padding([6, 14])
            .style(style::primary_button),
    ]
    .spacing(8);

    container(section.push(actions))
        .padding(20)
        .max_width(520)
        .width(Length::Fill)
        .style(|_| style::surface_style(style::SURFACE_1, 10.0))
        .into()
}

fn labelled_input<'a>(
    placeholder: &'a str,
    value: &'a str,
    error: Option<&'a str>,
    secure: bool,
    on_input: fn(String) -> Message,
) -> Element<'a, Message> {
    let input = text_input(placeholder, value)
        .on_input(on_input)
        .secure(secure)
        .padding(10)
        .width(Length::Fill);

    let input = if error.is_some() {
        input.style(style::invalid_input_style)
    } else {
        input.style(style::input_style)
    };

    match error {
        Some(error) => column![input, text(error).size(11).color(style::DANGER)]
            .spacing(4)
            .into(),
        None => input.into(),
    }
}
