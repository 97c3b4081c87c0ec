//! Syntax highlighting for fenced code blocks

use iced::Color;
use once_cell::sync::Lazy;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::ui::theme::DarkTheme;

// Loaded once, shared by every render
static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// Fixed dark theme for every code block
pub const THEME_NAME: &str = "base16-ocean.dark";

#[derive(Debug, Clone, PartialEq)]
pub struct HighlightSpan {
    pub text: String,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
}

impl HighlightSpan {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            color: DarkTheme::CODE_TEXT,
            bold: false,
            italic: false,
        }
    }
}

fn theme() -> Option<&'static Theme> {
    THEME_SET
        .themes
        .get(THEME_NAME)
        .or_else(|| THEME_SET.themes.values().next())
}

/// Declared language first, then first-line detection (shebangs etc.),
/// then plain text
pub fn resolve_syntax(code: &str, language: Option<&str>) -> &'static SyntaxReference {
    language
        .and_then(|lang| SYNTAX_SET.find_syntax_by_token(lang))
        .or_else(|| {
            code.lines()
                .next()
                .and_then(|line| SYNTAX_SET.find_syntax_by_first_line(line))
        })
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text())
}

/// Highlight `code` line by line. Line endings are stripped from the spans.
pub fn highlight(code: &str, language: Option<&str>) -> Vec<Vec<HighlightSpan>> {
    let Some(theme) = theme() else {
        return code.lines().map(|line| vec![HighlightSpan::plain(line)]).collect();
    };

    let syntax = resolve_syntax(code, language);
    let mut highlighter = HighlightLines::new(syntax, theme);

    LinesWithEndings::from(code)
        .map(|line| match highlighter.highlight_line(line, &SYNTAX_SET) {
            Ok(ranges) => ranges
                .into_iter()
                .filter_map(|(style, text)| {
                    let text = text.trim_end_matches(['\n', '\r']);
                    (!text.is_empty()).then(|| HighlightSpan {
                        text: text.to_string(),
                        color: Color::from_rgba8(
                            style.foreground.r,
                            style.foreground.g,
                            style.foreground.b,
                            style.foreground.a as f32 / 255.0,
                        ),
                        bold: style.font_style.contains(FontStyle::BOLD),
                        italic: style.font_style.contains(FontStyle::ITALIC),
                    })
                })
                .collect(),
            Err(e) => {
                tracing::debug!("highlighting failed, falling back to plain text: {}", e);
                vec![HighlightSpan::plain(line.trim_end_matches(['\n', '\r']))]
            }
        })
        .collect()
}
