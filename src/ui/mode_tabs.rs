//! Capability tabs

use iced::widget::{button, container, row, text};
use iced::{Background, Border, Color, Element, Padding};

use super::theme::DarkTheme;
use crate::shell::Mode;

pub fn view<'a, Message: Clone + 'a>(
    current: Mode,
    on_select: fn(Mode) -> Message,
) -> Element<'a, Message> {
    let tabs = Mode::TABS.into_iter().map(|mode| {
        let selected = mode == current;
        button(text(mode.label()).size(14))
            .on_press(on_select(mode))
            .padding(Padding::from([10.0, 16.0]))
            .style(move |_theme, status| {
                let (background, text_color) = match (selected, status) {
                    (true, _) => (DarkTheme::SURFACE_HIGHLIGHT, DarkTheme::PRIMARY),
                    (false, button::Status::Hovered) => (DarkTheme::SURFACE, DarkTheme::TEXT),
                    (false, _) => (Color::TRANSPARENT, DarkTheme::TEXT_MUTED),
                };
                button::Style {
                    background: Some(Background::Color(background)),
                    text_color,
                    border: Border::default().rounded(8),
                    ..Default::default()
                }
            })
            .into()
    });

    container(row(tabs).spacing(4))
        .padding(6)
        .style(|_theme| container::Style {
            background: Some(Background::Color(DarkTheme::SURFACE)),
            border: Border::default().rounded(12),
            ..Default::default()
        })
        .into()
}
