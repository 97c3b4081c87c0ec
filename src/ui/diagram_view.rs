//! Mind map display

use iced::widget::{container, svg, text};
use iced::{Background, Border, Element, Length};

use super::theme::DarkTheme;
use crate::diagram::{DiagramOutput, RENDER_FAILED};

/// Display state of the mind map pane. A new result always starts from
/// `Rendering`, so an older diagram is never left on screen.
#[derive(Debug, Clone, Default)]
pub enum DiagramState {
    #[default]
    Empty,
    Rendering,
    Ready(svg::Handle),
    Failed,
}

impl DiagramState {
    pub fn from_output(output: DiagramOutput) -> Self {
        match output {
            DiagramOutput::Svg(markup) => DiagramState::Ready(svg::Handle::from_memory(markup.into_bytes())),
            DiagramOutput::Failed => DiagramState::Failed,
        }
    }

    /// Text shown instead of a diagram, if any
    pub fn message(&self) -> Option<&'static str> {
        match self {
            DiagramState::Empty | DiagramState::Ready(_) => None,
            DiagramState::Rendering => Some("Rendering mind map..."),
            DiagramState::Failed => Some(RENDER_FAILED),
        }
    }
}

pub fn view<'a, Message: 'a>(state: &'a DiagramState) -> Element<'a, Message> {
    let body: Element<'a, Message> = match state {
        DiagramState::Ready(handle) => svg(handle.clone()).width(Length::Fill).into(),
        DiagramState::Failed => container(text(RENDER_FAILED).size(15).color(DarkTheme::ERROR))
            .padding(16)
            .into(),
        other => text(other.message().unwrap_or_default())
            .size(14)
            .color(DarkTheme::TEXT_MUTED)
            .into(),
    };

    container(body)
        .width(Length::Fill)
        .center_x(Length::Fill)
        .padding(16)
        .style(|_theme| container::Style {
            background: Some(Background::Color(DarkTheme::DIAGRAM_SURFACE)),
            border: Border::default().rounded(8),
            ..Default::default()
        })
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_render_shows_fallback_text() {
        let state = DiagramState::from_output(DiagramOutput::Failed);
        assert!(matches!(state, DiagramState::Failed));
        assert_eq!(state.message(), Some("Failed to render graph. Invalid syntax?"));
    }

    #[test]
    fn test_rendered_svg_has_no_message() {
        let state = DiagramState::from_output(DiagramOutput::Svg("<svg></svg>".to_string()));
        assert!(matches!(state, DiagramState::Ready(_)));
        assert_eq!(state.message(), None);
    }
}
