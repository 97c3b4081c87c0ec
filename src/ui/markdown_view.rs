//! Lays out a parsed Markdown [`Document`] as iced widgets

use iced::widget::text::Span;
use iced::widget::{
    column, container, rich_text, row, rule, scrollable, span, text, vertical_rule, Space,
};
use iced::{alignment, border, font, Background, Border, Element, Font, Length, Padding};
use pulldown_cmark::Alignment;

use crate::markdown::style::{self, BoxStyle, CellStyle, Spacing, TextStyle, Weight};
use crate::markdown::{Block, CodeBlock, Document, Inline, ListItem, Table};

pub fn view<'a, Message: Clone + 'a>(
    document: &'a Document,
    on_link: fn(String) -> Message,
) -> Element<'a, Message> {
    column(document.blocks.iter().map(|b| block(b, on_link)))
        .width(Length::Fill)
        .into()
}

fn block<'a, Message: Clone + 'a>(block: &'a Block, on_link: fn(String) -> Message) -> Element<'a, Message> {
    match block {
        Block::Heading { level, content } => spaced(
            inline_flow(content, style::heading(*level), on_link),
            style::heading_spacing(*level),
        ),
        Block::Paragraph(content) => spaced(
            inline_flow(content, style::paragraph(), on_link),
            style::paragraph_spacing(),
        ),
        Block::List { start, items } => spaced(list(*start, items, on_link), style::list_spacing()),
        Block::BlockQuote(blocks) => spaced(quote(blocks, on_link), Spacing { top: 24.0, bottom: 0.0 }),
        Block::Code(code) => spaced(code_block(code, on_link), Spacing { top: 24.0, bottom: 16.0 }),
        Block::Table(table) => spaced(table_view(table, on_link), Spacing { top: 24.0, bottom: 24.0 }),
        Block::Rule => spaced(
            container(Space::with_height(1.0))
                .width(Length::Fill)
                .style(|_theme| container::Style {
                    background: Some(Background::Color(style::rule_color())),
                    ..Default::default()
                })
                .into(),
            style::rule_spacing(),
        ),
    }
}

fn spaced<'a, Message: 'a>(content: Element<'a, Message>, spacing: Spacing) -> Element<'a, Message> {
    column![
        Space::with_height(spacing.top),
        content,
        Space::with_height(spacing.bottom)
    ]
    .into()
}

fn font_for(style: &TextStyle) -> Font {
    let base = if style.monospace { Font::MONOSPACE } else { Font::DEFAULT };
    Font {
        weight: match style.weight {
            Weight::Normal => font::Weight::Normal,
            Weight::Semibold => font::Weight::Semibold,
            Weight::Bold => font::Weight::Bold,
        },
        style: if style.italic {
            font::Style::Italic
        } else {
            font::Style::Normal
        },
        ..base
    }
}

fn box_style(frame: BoxStyle) -> container::Style {
    container::Style {
        background: frame.background.map(Background::Color),
        border: Border {
            color: frame.border_color,
            width: frame.border_width,
            radius: frame.radius.into(),
        },
        ..Default::default()
    }
}

fn styled<'a>(fragment: &'a str, style: &TextStyle) -> Span<'a, String> {
    span(fragment)
        .font(font_for(style))
        .size(style.size)
        .color(style.color)
        .underline(style.underline)
}

/// Rich text emits its link type as the message; map it onto the caller's
fn linked<'a, Message: 'a>(
    spans: Vec<Span<'a, String>>,
    on_link: fn(String) -> Message,
) -> Element<'a, Message> {
    Element::from(rich_text(spans)).map(on_link)
}

/// Spans for a run of inline content. Images are handled by [`inline_flow`].
fn spans<'a>(inlines: &'a [Inline], base: TextStyle) -> Vec<Span<'a, String>> {
    inlines
        .iter()
        .filter_map(|inline| match inline {
            Inline::Text { text, style: inline_style, link } => {
                let mut text_style = match link {
                    Some(_) => TextStyle {
                        size: base.size,
                        ..style::link()
                    },
                    None => base,
                };
                if inline_style.strong {
                    text_style.weight = Weight::Bold;
                }
                if inline_style.emphasis {
                    text_style.italic = true;
                }
                let s = styled(text, &text_style).strikethrough(inline_style.strikethrough);
                Some(match link {
                    Some(url) => s.link(url.clone()),
                    None => s,
                })
            }
            Inline::Code { code, link } => {
                let code_style = style::inline_code();
                let s = styled(code, &code_style.text)
                    .background(code_style.background)
                    .border(Border {
                        color: code_style.border_color,
                        width: 1.0,
                        radius: border::Radius::from(4.0),
                    })
                    .padding(Padding::from([0.0, 4.0]));
                Some(match link {
                    Some(url) => s.link(url.clone()),
                    None => s,
                })
            }
            Inline::SoftBreak => Some(styled(" ", &base)),
            Inline::LineBreak => Some(styled("\n", &base)),
            Inline::Image { .. } => None,
        })
        .collect()
}

/// Text runs as rich text, with images broken out into framed cards
fn inline_flow<'a, Message: Clone + 'a>(
    inlines: &'a [Inline],
    base: TextStyle,
    on_link: fn(String) -> Message,
) -> Element<'a, Message> {
    let mut parts: Vec<Element<'a, Message>> = Vec::new();
    let mut run_start = 0;

    for (i, inline) in inlines.iter().enumerate() {
        if let Inline::Image { url, alt, link } = inline {
            if run_start < i {
                parts.push(linked(spans(&inlines[run_start..i], base), on_link));
            }
            parts.push(image_card(url, alt, link.as_deref(), on_link));
            run_start = i + 1;
        }
    }
    if run_start < inlines.len() || parts.is_empty() {
        parts.push(linked(spans(&inlines[run_start..], base), on_link));
    }

    if parts.len() == 1 {
        parts.remove(0)
    } else {
        column(parts).spacing(8).into()
    }
}

/// Framed caption for an image. Clicking opens the enclosing link target,
/// or the image itself when it is not wrapped in a link.
fn image_card<'a, Message: Clone + 'a>(
    url: &'a str,
    alt: &'a str,
    link: Option<&'a str>,
    on_link: fn(String) -> Message,
) -> Element<'a, Message> {
    let caption = if alt.is_empty() { url } else { alt };
    let target = link.unwrap_or(url);
    let link_style = style::link();
    let muted = style::paragraph();
    let frame = style::image_frame();

    container(linked(
        vec![
            styled("Image: ", &muted),
            styled(caption, &link_style).link(target.to_string()),
        ],
        on_link,
    ))
    .padding(Padding::from(frame.padding))
    .style(move |_theme| box_style(frame))
    .into()
}

fn list<'a, Message: Clone + 'a>(
    start: Option<u64>,
    items: &'a [ListItem],
    on_link: fn(String) -> Message,
) -> Element<'a, Message> {
    let body = style::paragraph();
    column(items.iter().enumerate().map(|(index, item)| {
        row![
            text(style::list_marker(start, index, item.checked))
                .size(body.size)
                .color(body.color)
                .width(Length::Shrink),
            column(item.blocks.iter().map(|b| list_item_block(b, on_link))).width(Length::Fill)
        ]
        .spacing(8)
        .into()
    }))
    .spacing(style::LIST_ITEM_GAP)
    .padding(Padding {
        left: style::LIST_INDENT,
        ..Padding::ZERO
    })
    .into()
}

/// Paragraphs inside list items sit flush with the marker
fn list_item_block<'a, Message: Clone + 'a>(
    b: &'a Block,
    on_link: fn(String) -> Message,
) -> Element<'a, Message> {
    match b {
        Block::Paragraph(content) => inline_flow(content, style::paragraph(), on_link),
        other => block(other, on_link),
    }
}

fn quote<'a, Message: Clone + 'a>(
    blocks: &'a [Block],
    on_link: fn(String) -> Message,
) -> Element<'a, Message> {
    let frame = style::block_quote();
    let accent = frame.accent.unwrap_or(style::rule_color());
    let quote_text = style::block_quote_text();

    let content = column(blocks.iter().map(|b| match b {
        Block::Paragraph(content) => inline_flow(content, quote_text, on_link),
        other => block(other, on_link),
    }));

    container(
        row![
            vertical_rule(4).style(move |_theme| rule::Style {
                color: accent,
                width: 4,
                radius: 2.0.into(),
                fill_mode: rule::FillMode::Full,
            }),
            container(content).padding(Padding::from(frame.padding)).width(Length::Fill)
        ]
        .height(Length::Shrink),
    )
    .width(Length::Fill)
    .style(move |_theme| box_style(frame))
    .into()
}

fn code_block<'a, Message: Clone + 'a>(
    code: &'a CodeBlock,
    on_link: fn(String) -> Message,
) -> Element<'a, Message> {
    let frame = style::code_block();
    let code_text = style::code_block_text();

    let mut code_spans: Vec<Span<'a, String>> = Vec::new();
    for (i, line) in code.lines.iter().enumerate() {
        if i > 0 {
            code_spans.push(styled("\n", &code_text));
        }
        for piece in line {
            let piece_style = TextStyle {
                color: piece.color,
                weight: if piece.bold { Weight::Bold } else { Weight::Normal },
                italic: piece.italic,
                ..code_text
            };
            code_spans.push(styled(&piece.text, &piece_style));
        }
    }

    container(
        scrollable(container(linked(code_spans, on_link)).padding(Padding::from(frame.padding)))
            .direction(scrollable::Direction::Horizontal(scrollable::Scrollbar::default())),
    )
    .width(Length::Fill)
    .style(move |_theme| box_style(frame))
    .into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Header,
    /// Zero-based index among body rows
    Body(usize),
}

#[derive(Debug, Clone)]
pub struct CellLayout<'a> {
    pub content: &'a [Inline],
    pub style: CellStyle,
    pub alignment: Alignment,
}

#[derive(Debug, Clone)]
pub struct RowLayout<'a> {
    pub kind: RowKind,
    pub cells: Vec<CellLayout<'a>>,
}

#[derive(Debug, Clone)]
pub struct TableLayout<'a> {
    pub frame: BoxStyle,
    /// Wide tables scroll sideways inside their frame
    pub horizontal_scroll: bool,
    pub column_widths: Vec<f32>,
    pub rows: Vec<RowLayout<'a>>,
}

const MIN_COLUMN_WIDTH: f32 = 80.0;
const MAX_COLUMN_WIDTH: f32 = 320.0;

/// Resolve styles and column sizes for a table. Header and body cells take
/// separate style paths.
pub fn table_layout(table: &Table) -> TableLayout<'_> {
    let columns = table
        .rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(table.header.len()))
        .max()
        .unwrap_or(0);

    let mut column_widths = vec![MIN_COLUMN_WIDTH; columns];
    for cells in std::iter::once(&table.header).chain(table.rows.iter()) {
        for (i, cell) in cells.iter().enumerate() {
            let chars = Inline::plain_text(cell).chars().count() as f32;
            let width = (chars * 8.0 + 32.0).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
            column_widths[i] = column_widths[i].max(width);
        }
    }

    let mut rows = vec![RowLayout {
        kind: RowKind::Header,
        cells: lay_out(&table.header, columns, &table.alignments, style::header_cell()),
    }];
    rows.extend(table.rows.iter().enumerate().map(|(index, cells)| RowLayout {
        kind: RowKind::Body(index),
        cells: lay_out(cells, columns, &table.alignments, style::body_cell(index)),
    }));

    TableLayout {
        frame: style::table_frame(),
        horizontal_scroll: true,
        column_widths,
        rows,
    }
}

fn lay_out<'t>(
    cells: &'t [Vec<Inline>],
    columns: usize,
    alignments: &[Alignment],
    cell_style: CellStyle,
) -> Vec<CellLayout<'t>> {
    (0..columns)
        .map(|i| CellLayout {
            content: cells.get(i).map(Vec::as_slice).unwrap_or(&[]),
            style: cell_style,
            alignment: alignments.get(i).copied().unwrap_or(Alignment::None),
        })
        .collect()
}

fn table_view<'a, Message: Clone + 'a>(
    table: &'a Table,
    on_link: fn(String) -> Message,
) -> Element<'a, Message> {
    let TableLayout {
        frame,
        horizontal_scroll,
        column_widths,
        rows,
    } = table_layout(table);

    let grid = column(rows.into_iter().map(|table_row| {
        row(table_row
            .cells
            .into_iter()
            .zip(column_widths.iter().copied())
            .map(|(cell, width)| {
                let cell_style = cell.style;
                container(linked(spans(cell.content, cell_style.text), on_link))
                    .width(Length::Fixed(width))
                    .height(Length::Fill)
                    .padding(Padding::from(cell_style.frame.padding))
                    .align_x(match cell.alignment {
                        Alignment::Center => alignment::Horizontal::Center,
                        Alignment::Right => alignment::Horizontal::Right,
                        Alignment::Left | Alignment::None => alignment::Horizontal::Left,
                    })
                    .style(move |_theme| box_style(cell_style.frame))
                    .into()
            }))
        .height(Length::Shrink)
        .into()
    }));

    let body: Element<'a, Message> = if horizontal_scroll {
        scrollable(grid)
            .direction(scrollable::Direction::Horizontal(scrollable::Scrollbar::default()))
            .into()
    } else {
        grid.into()
    };

    container(body)
        .width(Length::Fill)
        .style(move |_theme| box_style(frame))
        .into()
}
