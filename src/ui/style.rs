use iced::widget::{button, checkbox, container, pick_list, progress_bar, text_input};
use iced::{Background, Border, Color, Theme};

use crate::notify::Severity;

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color {
        r: r as f32 / 255.0,
        g: g as f32 / 255.0,
        b: b as f32 / 255.0,
        a: 1.0,
    }
}

pub const BG: Color = rgb(18, 21, 27);
pub const SURFACE_0: Color = rgb(20, 24, 32);
pub const SURFACE_1: Color = rgb(25, 30, 38);
pub const SURFACE_2: Color = rgb(31, 37, 46);
pub const SURFACE_3: Color = rgb(37, 45, 56);
pub const BORDER: Color = rgb(48, 58, 70);
pub const TEXT: Color = rgb(230, 236, 244);
pub const TEXT_MUTED: Color = rgb(132, 145, 160);
pub const PRIMARY: Color = rgb(67, 160, 71);
pub const PRIMARY_HOVER: Color = rgb(86, 180, 90);
pub const DANGER: Color = rgb(213, 0, 0);
pub const WARNING: Color = rgb(242, 196, 15);
pub const INFO: Color = rgb(82, 167, 244);

pub fn app_theme() -> Theme {
    Theme::custom(
        "SCIM2 Console".to_string(),
        iced::theme::Palette {
            background: BG,
            text: TEXT,
            primary: PRIMARY,
            success: PRIMARY,
            danger: DANGER,
        },
    )
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => DANGER,
        Severity::Info => INFO,
    }
}

/// Colour for a per-test status value as reported by the suite.
pub fn status_color(status: &str) -> Color {
    match status.to_ascii_lowercase().as_str() {
        "1" | "success" | "passed" | "pass" => PRIMARY,
        "0" | "failed" | "fail" | "error" => DANGER,
        "2" | "skipped" | "skip" => WARNING,
        _ => TEXT_MUTED,
    }
}

pub fn surface_style(color: Color, border_radius: f32) -> container::Style {
    container::Style::default()
        .background(Background::Color(color))
        .color(TEXT)
        .border(Border {
            radius: border_radius.into(),
            width: 1.0,
            color: BORDER,
        })
}

pub fn flat_surface_style(color: Color) -> container::Style {
    container::Style::default()
        .background(Background::Color(color))
        .color(TEXT)
}

pub fn toast_style(severity: Severity) -> container::Style {
    let accent = severity_color(severity);
    container::Style::default()
        .background(Background::Color(SURFACE_2))
        .color(TEXT)
        .border(Border {
            radius: 8.0.into(),
            width: 1.0,
            color: accent,
        })
}

fn filled_button(bg: Color, text_color: Color, border: Color, radius: f32) -> button::Style {
    button::Style {
        background: Some(Background::Color(bg)),
        text_color,
        border: Border {
            radius: radius.into(),
            width: 1.0,
            color: border,
        },
        shadow: Default::default(),
    }
}

pub fn primary_button(_theme: &Theme, status: button::Status) -> button::Style {
    match status {
        button::Status::Active | button::Status::Pressed => filled_button(PRIMARY, BG, PRIMARY, 10.0),
        button::Status::Hovered => filled_button(PRIMARY_HOVER, BG, PRIMARY_HOVER, 10.0),
        button::Status::Disabled => filled_button(SURFACE_3, TEXT_MUTED, SURFACE_3, 10.0),
    }
}

pub fn subtle_button(_theme: &Theme, status: button::Status) -> button::Style {
    let bg = match status {
        button::Status::Active => SURFACE_2,
        button::Status::Hovered | button::Status::Pressed => SURFACE_3,
        button::Status::Disabled => SURFACE_1,
    };
    let text_color = if matches!(status, button::Status::Disabled) {
        TEXT_MUTED
    } else {
        TEXT
    };
    filled_button(bg, text_color, BORDER, 8.0)
}

pub fn ghost_button(_theme: &Theme, status: button::Status) -> button::Style {
    let bg = match status {
        button::Status::Hovered | button::Status::Pressed => SURFACE_2,
        button::Status::Active | button::Status::Disabled => SURFACE_1,
    };
    filled_button(bg, TEXT_MUTED, BORDER, 6.0)
}

/// The key button turns red until credentials have been submitted.
pub fn key_button(missing: bool) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |theme, status| {
        let base = ghost_button(theme, status);
        button::Style {
            text_color: if missing { DANGER } else { TEXT },
            ..base
        }
    }
}

pub fn checkbox_style(_theme: &Theme, status: checkbox::Status) -> checkbox::Style {
    let (checked, hovered) = match status {
        checkbox::Status::Active { is_checked } => (is_checked, false),
        checkbox::Status::Hovered { is_checked } => (is_checked, true),
        checkbox::Status::Disabled { is_checked } => (is_checked, false),
    };

    checkbox::Style {
        background: Background::Color(if checked { PRIMARY } else { SURFACE_1 }),
        icon_color: BG,
        border: Border {
            radius: 4.0.into(),
            width: 1.0,
            color: if hovered || checked { PRIMARY } else { BORDER },
        },
        text_color: Some(TEXT),
    }
}

pub fn input_style(_theme: &Theme, status: text_input::Status) -> text_input::Style {
    let base = text_input::Style {
        background: Background::Color(SURFACE_1),
        border: Border {
            radius: 8.0.into(),
            width: 1.0,
            color: BORDER,
        },
        icon: TEXT_MUTED,
        placeholder: TEXT_MUTED,
        value: TEXT,
        selection: Color::from_rgba(0.26, 0.63, 0.28, 0.35),
    };

    let border_color = match status {
        text_input::Status::Active | text_input::Status::Disabled => BORDER,
        text_input::Status::Hovered => SURFACE_3,
        text_input::Status::Focused => PRIMARY,
    };
    text_input::Style {
        border: Border {
            color: border_color,
            ..base.border
        },
        ..base
    }
}

pub fn invalid_input_style(theme: &Theme, status: text_input::Status) -> text_input::Style {
    let base = input_style(theme, status);
    text_input::Style {
        border: Border {
            color: DANGER,
            ..base.border
        },
        ..base
    }
}

pub fn pick_list_style(_theme: &Theme, status: pick_list::Status) -> pick_list::Style {
    let border_color = match status {
        pick_list::Status::Active => BORDER,
        pick_list::Status::Hovered | pick_list::Status::Opened => PRIMARY,
    };

    pick_list::Style {
        text_color: TEXT,
        background: Background::Color(SURFACE_1),
        placeholder_color: TEXT_MUTED,
        handle_color: TEXT_MUTED,
        border: Border {
            radius: 8.0.into(),
            width: 1.0,
            color: border_color,
        },
    }
}

pub fn progress_style(_theme: &Theme) -> progress_bar::Style {
    progress_bar::Style {
        background: Background::Color(SURFACE_2),
        bar: Background::Color(PRIMARY),
        border: Border {
            radius: 4.0.into(),
            width: 0.0,
            color: Color::TRANSPARENT,
        },
    }
}
