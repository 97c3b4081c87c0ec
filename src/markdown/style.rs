//! Per-element styles for rendered Markdown
//!
//! One function per element kind. Views compose these explicitly instead of
//! merging ad-hoc attributes.

use iced::Color;

use crate::ui::theme::DarkTheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Normal,
    Semibold,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub color: Color,
    pub weight: Weight,
    pub italic: bool,
    pub monospace: bool,
    pub underline: bool,
}

impl TextStyle {
    const fn body(size: f32, color: Color) -> Self {
        Self {
            size,
            color,
            weight: Weight::Normal,
            italic: false,
            monospace: false,
            underline: false,
        }
    }
}

/// Vertical space around a block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub top: f32,
    pub bottom: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStyle {
    pub background: Option<Color>,
    pub border_color: Color,
    pub border_width: f32,
    pub radius: f32,
    /// `[vertical, horizontal]`
    pub padding: [f32; 2],
    /// Accent bar drawn on the leading edge (block quotes)
    pub accent: Option<Color>,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            background: None,
            border_color: Color::TRANSPARENT,
            border_width: 0.0,
            radius: 0.0,
            padding: [0.0, 0.0],
            accent: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub text: TextStyle,
    pub frame: BoxStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InlineCodeStyle {
    pub text: TextStyle,
    pub background: Color,
    pub border_color: Color,
}

pub fn heading(level: u8) -> TextStyle {
    let (size, weight) = match level {
        1 => (30.0, Weight::Bold),
        2 => (24.0, Weight::Semibold),
        3 => (20.0, Weight::Semibold),
        _ => (18.0, Weight::Semibold),
    };
    TextStyle {
        weight,
        ..TextStyle::body(size, DarkTheme::TEXT)
    }
}

pub fn heading_spacing(level: u8) -> Spacing {
    match level {
        1 | 2 => Spacing { top: 32.0, bottom: 16.0 },
        _ => Spacing { top: 24.0, bottom: 12.0 },
    }
}

pub fn paragraph() -> TextStyle {
    TextStyle::body(15.0, DarkTheme::TEXT_BODY)
}

pub fn paragraph_spacing() -> Spacing {
    Spacing { top: 16.0, bottom: 0.0 }
}

pub fn list_spacing() -> Spacing {
    Spacing { top: 16.0, bottom: 16.0 }
}

pub const LIST_INDENT: f32 = 24.0;
pub const LIST_ITEM_GAP: f32 = 8.0;

/// Bullet or number shown before item `index` of a list
pub fn list_marker(start: Option<u64>, index: usize, checked: Option<bool>) -> String {
    let marker = match start {
        Some(first) => format!("{}.", first + index as u64),
        None => "•".to_string(),
    };
    match checked {
        Some(true) => format!("{} ☑", marker),
        Some(false) => format!("{} ☐", marker),
        None => marker,
    }
}

pub fn block_quote() -> BoxStyle {
    BoxStyle {
        background: Some(DarkTheme::QUOTE_SURFACE),
        radius: 4.0,
        padding: [8.0, 24.0],
        accent: Some(DarkTheme::QUOTE_ACCENT),
        ..BoxStyle::default()
    }
}

pub fn block_quote_text() -> TextStyle {
    TextStyle {
        italic: true,
        ..paragraph()
    }
}

pub fn inline_code() -> InlineCodeStyle {
    InlineCodeStyle {
        text: TextStyle {
            weight: Weight::Semibold,
            monospace: true,
            ..TextStyle::body(14.0, DarkTheme::TEXT)
        },
        background: DarkTheme::INLINE_CODE_SURFACE,
        border_color: DarkTheme::BORDER,
    }
}

pub fn code_block() -> BoxStyle {
    BoxStyle {
        background: Some(DarkTheme::CODE_SURFACE),
        border_color: DarkTheme::BORDER,
        border_width: 1.0,
        radius: 8.0,
        padding: [16.0, 16.0],
        accent: None,
    }
}

pub fn code_block_text() -> TextStyle {
    TextStyle {
        monospace: true,
        ..TextStyle::body(14.0, DarkTheme::CODE_TEXT)
    }
}

pub fn link() -> TextStyle {
    TextStyle {
        weight: Weight::Semibold,
        underline: true,
        ..TextStyle::body(15.0, DarkTheme::PRIMARY)
    }
}

pub fn image_frame() -> BoxStyle {
    BoxStyle {
        border_color: DarkTheme::BORDER,
        border_width: 1.0,
        radius: 8.0,
        padding: [12.0, 12.0],
        ..BoxStyle::default()
    }
}

pub fn rule_color() -> Color {
    DarkTheme::BORDER
}

pub fn rule_spacing() -> Spacing {
    Spacing { top: 32.0, bottom: 32.0 }
}

/// Scrollable frame wrapping every table
pub fn table_frame() -> BoxStyle {
    BoxStyle {
        border_color: DarkTheme::BORDER,
        border_width: 1.0,
        radius: 8.0,
        ..BoxStyle::default()
    }
}

pub fn header_cell() -> CellStyle {
    CellStyle {
        text: TextStyle {
            weight: Weight::Bold,
            ..TextStyle::body(14.0, DarkTheme::TEXT)
        },
        frame: BoxStyle {
            background: Some(DarkTheme::TABLE_HEADER),
            border_color: DarkTheme::BORDER,
            border_width: 1.0,
            padding: [12.0, 16.0],
            ..BoxStyle::default()
        },
    }
}

/// Body cell in zero-based body row `row`; every second row is striped
pub fn body_cell(row: usize) -> CellStyle {
    CellStyle {
        text: TextStyle::body(14.0, DarkTheme::TEXT_BODY),
        frame: BoxStyle {
            background: (row % 2 == 1).then_some(DarkTheme::TABLE_STRIPE),
            border_color: DarkTheme::BORDER,
            border_width: 1.0,
            padding: [12.0, 16.0],
            ..BoxStyle::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_sizes_decrease() {
        let sizes: Vec<f32> = (1..=4).map(|level| heading(level).size).collect();
        assert!(sizes.windows(2).all(|pair| pair[0] > pair[1]));
        assert_eq!(heading(6), heading(4));
    }

    #[test]
    fn test_header_cells_differ_from_body_cells() {
        assert_ne!(header_cell(), body_cell(0));
        assert_ne!(header_cell(), body_cell(1));
        assert_eq!(header_cell().text.weight, Weight::Bold);
    }

    #[test]
    fn test_body_rows_are_zebra_striped() {
        assert_eq!(body_cell(0).frame.background, None);
        assert!(body_cell(1).frame.background.is_some());
        assert_eq!(body_cell(2), body_cell(0));
    }

    #[test]
    fn test_inline_and_block_code_differ() {
        assert!(inline_code().text.monospace);
        assert!(code_block_text().monospace);
        assert_ne!(Some(inline_code().background), code_block().background);
    }

    #[test]
    fn test_list_markers() {
        assert_eq!(list_marker(None, 3, None), "•");
        assert_eq!(list_marker(Some(1), 0, None), "1.");
        assert_eq!(list_marker(Some(4), 2, None), "6.");
        assert_eq!(list_marker(None, 0, Some(true)), "• ☑");
    }
}
