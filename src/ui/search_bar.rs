//! Query input with submit button

use iced::widget::{button, container, row, text, text_input};
use iced::{Background, Border, Color, Element, Length, Padding};

use super::theme::DarkTheme;

/// Search bar component. Enter and the button only submit when `can_submit`.
pub fn view<'a, Message: Clone + 'a>(
    value: &str,
    placeholder: &str,
    loading: bool,
    can_submit: bool,
    on_input: impl Fn(String) -> Message + 'a,
    on_submit: Message,
) -> Element<'a, Message> {
    let input = text_input(placeholder, value)
        .on_input(on_input)
        .padding(Padding::new(16.0))
        .size(18)
        .style(|_theme, _status| text_input::Style {
            background: Background::Color(Color::TRANSPARENT),
            border: Border::default(),
            icon: DarkTheme::TEXT_MUTED,
            placeholder: DarkTheme::TEXT_PLACEHOLDER,
            value: DarkTheme::TEXT,
            selection: DarkTheme::SELECTION,
        });
    let input = if can_submit {
        input.on_submit(on_submit.clone())
    } else {
        input
    };

    let send = button(text(if loading { "Working..." } else { "Send" }).size(15))
        .on_press_maybe(can_submit.then_some(on_submit))
        .padding(Padding::from([10.0, 18.0]))
        .style(|_theme, status| {
            let background = match status {
                button::Status::Disabled => Color {
                    a: 0.5,
                    ..DarkTheme::PRIMARY
                },
                button::Status::Hovered | button::Status::Pressed => DarkTheme::QUOTE_ACCENT,
                button::Status::Active => DarkTheme::PRIMARY,
            };
            button::Style {
                background: Some(Background::Color(background)),
                text_color: Color::WHITE,
                border: Border::default().rounded(12),
                ..Default::default()
            }
        });

    container(
        row![input, send]
            .spacing(8)
            .align_y(iced::Alignment::Center),
    )
    .padding(Padding::from([4.0, 8.0]))
    .width(Length::Fill)
    .style(|_theme| container::Style {
        background: Some(Background::Color(DarkTheme::SURFACE)),
        border: Border {
            color: DarkTheme::BORDER,
            width: 1.0,
            radius: 16.0.into(),
        },
        ..Default::default()
    })
    .into()
}
