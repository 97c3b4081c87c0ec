//! Theme configuration

use iced::Color;

/// Dark theme colors
pub struct DarkTheme;

impl DarkTheme {
    pub const BACKGROUND: Color = Color::from_rgb(0.09, 0.09, 0.11);
    pub const SURFACE: Color = Color::from_rgb(0.12, 0.12, 0.14);
    pub const SURFACE_HIGHLIGHT: Color = Color::from_rgb(0.18, 0.18, 0.22);
    pub const BORDER: Color = Color::from_rgb(0.25, 0.25, 0.28);
    pub const PRIMARY: Color = Color::from_rgb(0.4, 0.55, 1.0);
    pub const TEXT: Color = Color::from_rgb(0.95, 0.95, 0.95);
    pub const TEXT_BODY: Color = Color::from_rgb(0.83, 0.83, 0.85);
    pub const TEXT_MUTED: Color = Color::from_rgb(0.55, 0.55, 0.6);
    pub const TEXT_PLACEHOLDER: Color = Color::from_rgb(0.4, 0.4, 0.45);
    pub const SELECTION: Color = Color::from_rgb(0.2, 0.25, 0.35);

    pub const ERROR: Color = Color::from_rgb(0.97, 0.44, 0.44);
    pub const ERROR_SURFACE: Color = Color::from_rgba(0.5, 0.11, 0.11, 0.2);
    pub const ERROR_BORDER: Color = Color::from_rgba(0.5, 0.11, 0.11, 0.5);
    pub const AMBER: Color = Color::from_rgb(0.96, 0.62, 0.04);
    pub const GREEN: Color = Color::from_rgb(0.13, 0.77, 0.37);

    // Markdown
    pub const QUOTE_ACCENT: Color = Color::from_rgb(0.23, 0.51, 0.96);
    pub const QUOTE_SURFACE: Color = Color::from_rgba(0.12, 0.23, 0.54, 0.1);
    pub const INLINE_CODE_SURFACE: Color = Color::from_rgb(0.15, 0.15, 0.16);
    pub const CODE_SURFACE: Color = Color::from_rgb(0.04, 0.04, 0.05);
    pub const CODE_TEXT: Color = Color::from_rgb(0.98, 0.98, 0.98);
    pub const TABLE_HEADER: Color = Color::from_rgb(0.15, 0.15, 0.16);
    pub const TABLE_STRIPE: Color = Color::from_rgba(0.15, 0.15, 0.16, 0.2);

    /// Diagrams are drawn with the neutral Mermaid theme on a light card
    pub const DIAGRAM_SURFACE: Color = Color::from_rgb(0.98, 0.98, 0.98);
}
