//! Markdown document model
//!
//! Backend results are Markdown (GFM). They are parsed once into a
//! [`Document`] when they arrive; `ui::markdown_view` lays the document out
//! using the per-element styles in [`style`].

pub mod highlight;
pub mod style;

use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag};

use highlight::HighlightSpan;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, content: Vec<Inline> },
    Paragraph(Vec<Inline>),
    List { start: Option<u64>, items: Vec<ListItem> },
    BlockQuote(Vec<Block>),
    Code(CodeBlock),
    Table(Table),
    Rule,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListItem {
    /// Task list state, `None` for plain items
    pub checked: Option<bool>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub code: String,
    pub lines: Vec<Vec<HighlightSpan>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub alignments: Vec<Alignment>,
    pub header: Vec<Vec<Inline>>,
    pub rows: Vec<Vec<Vec<Inline>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InlineStyle {
    pub strong: bool,
    pub emphasis: bool,
    pub strikethrough: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text {
        text: String,
        style: InlineStyle,
        link: Option<String>,
    },
    /// Inline code span; block code never appears here
    Code { code: String, link: Option<String> },
    /// `link` is the target of an enclosing link, if any
    Image {
        url: String,
        alt: String,
        link: Option<String>,
    },
    SoftBreak,
    LineBreak,
}

impl Inline {
    /// Text content without markup, used for table sizing and tests
    pub fn plain_text(inlines: &[Inline]) -> String {
        let mut out = String::new();
        for inline in inlines {
            match inline {
                Inline::Text { text, .. } => out.push_str(text),
                Inline::Code { code, .. } => out.push_str(code),
                Inline::Image { alt, .. } => out.push_str(alt),
                Inline::SoftBreak => out.push(' '),
                Inline::LineBreak => out.push('\n'),
            }
        }
        out
    }
}

/// Parse GFM Markdown (tables, strikethrough, task lists)
pub fn parse(text: &str) -> Document {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut builder = Builder::default();
    for event in Parser::new_ext(text, options) {
        builder.event(event);
    }
    Document {
        blocks: builder.finish(),
    }
}

/// Open containers while walking the event stream. Events are well nested,
/// so every `End` closes the top frame.
#[derive(Debug)]
enum Frame {
    Paragraph(Vec<Inline>),
    Heading { level: u8, content: Vec<Inline> },
    BlockQuote(Vec<Block>),
    List { start: Option<u64>, items: Vec<ListItem> },
    Item { item: ListItem, pending: Vec<Inline> },
    Code { language: Option<String>, code: String },
    Table(Table),
    TableHead(Vec<Vec<Inline>>),
    TableRow(Vec<Vec<Inline>>),
    TableCell(Vec<Inline>),
    Strong,
    Emphasis,
    Strikethrough,
    Link(String),
    Image {
        url: String,
        alt: String,
        link: Option<String>,
    },
    Skip,
}

#[derive(Debug, Default)]
struct Builder {
    blocks: Vec<Block>,
    stack: Vec<Frame>,
}

impl Builder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => {
                if let Some(Frame::Code { code, .. }) = self.stack.last_mut() {
                    code.push_str(&text);
                } else {
                    self.push_text(text.into_string());
                }
            }
            Event::Code(code) => {
                let link = self.current_link();
                self.push_inline(Inline::Code {
                    code: code.into_string(),
                    link,
                });
            }
            Event::SoftBreak => self.push_inline(Inline::SoftBreak),
            Event::HardBreak => self.push_inline(Inline::LineBreak),
            Event::Rule => self.push_block(Block::Rule),
            Event::TaskListMarker(checked) => {
                if let Some(Frame::Item { item, .. }) = self
                    .stack
                    .iter_mut()
                    .rev()
                    .find(|f| matches!(f, Frame::Item { .. }))
                {
                    item.checked = Some(checked);
                }
            }
            Event::FootnoteReference(label) => self.push_text(format!("[{}]", label)),
            // Raw HTML is not rendered
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => Frame::Paragraph(Vec::new()),
            Tag::Heading { level, .. } => Frame::Heading {
                level: level as u8,
                content: Vec::new(),
            },
            Tag::BlockQuote(_) => Frame::BlockQuote(Vec::new()),
            Tag::CodeBlock(kind) => Frame::Code {
                language: match kind {
                    CodeBlockKind::Fenced(info) => fence_language(&info),
                    CodeBlockKind::Indented => None,
                },
                code: String::new(),
            },
            Tag::List(start) => Frame::List {
                start,
                items: Vec::new(),
            },
            Tag::Item => Frame::Item {
                item: ListItem::default(),
                pending: Vec::new(),
            },
            Tag::Table(alignments) => Frame::Table(Table {
                alignments,
                ..Table::default()
            }),
            Tag::TableHead => Frame::TableHead(Vec::new()),
            Tag::TableRow => Frame::TableRow(Vec::new()),
            Tag::TableCell => Frame::TableCell(Vec::new()),
            Tag::Emphasis => Frame::Emphasis,
            Tag::Strong => Frame::Strong,
            Tag::Strikethrough => Frame::Strikethrough,
            Tag::Link { dest_url, .. } => Frame::Link(dest_url.into_string()),
            Tag::Image { dest_url, .. } => Frame::Image {
                url: dest_url.into_string(),
                alt: String::new(),
                link: self.current_link(),
            },
            _ => Frame::Skip,
        };
        self.stack.push(frame);
    }

    fn end(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame {
            Frame::Paragraph(content) => self.push_block(Block::Paragraph(content)),
            Frame::Heading { level, content } => self.push_block(Block::Heading { level, content }),
            Frame::BlockQuote(blocks) => self.push_block(Block::BlockQuote(blocks)),
            Frame::List { start, items } => self.push_block(Block::List { start, items }),
            Frame::Item { mut item, pending } => {
                if !pending.is_empty() {
                    item.blocks.push(Block::Paragraph(pending));
                }
                if let Some(Frame::List { items, .. }) = self.stack.last_mut() {
                    items.push(item);
                }
            }
            Frame::Code { language, code } => {
                let lines = highlight::highlight(&code, language.as_deref());
                self.push_block(Block::Code(CodeBlock {
                    language,
                    code,
                    lines,
                }));
            }
            Frame::Table(table) => self.push_block(Block::Table(table)),
            Frame::TableHead(cells) => {
                if let Some(Frame::Table(table)) = self.stack.last_mut() {
                    table.header = cells;
                }
            }
            Frame::TableRow(cells) => {
                if let Some(Frame::Table(table)) = self.stack.last_mut() {
                    table.rows.push(cells);
                }
            }
            Frame::TableCell(content) => match self.stack.last_mut() {
                Some(Frame::TableHead(cells)) | Some(Frame::TableRow(cells)) => cells.push(content),
                _ => {}
            },
            Frame::Image { url, alt, link } => self.push_inline(Inline::Image { url, alt, link }),
            Frame::Strong
            | Frame::Emphasis
            | Frame::Strikethrough
            | Frame::Link(_)
            | Frame::Skip => {}
        }
    }

    fn current_style(&self) -> InlineStyle {
        let mut style = InlineStyle::default();
        for frame in &self.stack {
            match frame {
                Frame::Strong => style.strong = true,
                Frame::Emphasis => style.emphasis = true,
                Frame::Strikethrough => style.strikethrough = true,
                _ => {}
            }
        }
        style
    }

    fn current_link(&self) -> Option<String> {
        self.stack.iter().rev().find_map(|frame| match frame {
            Frame::Link(url) => Some(url.clone()),
            _ => None,
        })
    }

    fn push_text(&mut self, text: String) {
        let style = self.current_style();
        let link = self.current_link();
        self.push_inline(Inline::Text { text, style, link });
    }

    /// Append to the nearest container that holds inline content
    fn push_inline(&mut self, inline: Inline) {
        for frame in self.stack.iter_mut().rev() {
            match frame {
                Frame::Strong
                | Frame::Emphasis
                | Frame::Strikethrough
                | Frame::Link(_) => continue,
                Frame::Image { alt, .. } => {
                    if let Inline::Text { text, .. } | Inline::Code { code: text, .. } = &inline {
                        alt.push_str(text);
                    }
                    return;
                }
                Frame::Paragraph(content)
                | Frame::Heading { content, .. }
                | Frame::TableCell(content)
                | Frame::Item {
                    pending: content, ..
                } => {
                    content.push(inline);
                    return;
                }
                _ => return,
            }
        }
    }

    /// Append to the nearest container that holds blocks, or the document
    fn push_block(&mut self, block: Block) {
        for frame in self.stack.iter_mut().rev() {
            match frame {
                Frame::BlockQuote(blocks) => {
                    blocks.push(block);
                    return;
                }
                Frame::Item { item, pending } => {
                    if !pending.is_empty() {
                        item.blocks.push(Block::Paragraph(std::mem::take(pending)));
                    }
                    item.blocks.push(block);
                    return;
                }
                Frame::Skip => return,
                _ => continue,
            }
        }
        self.blocks.push(block);
    }

    fn finish(self) -> Vec<Block> {
        self.blocks
    }
}

/// Language token of a fence info string (` ```rust,ignore ` -> `rust`)
fn fence_language(info: &str) -> Option<String> {
    info.split(|c: char| c.is_whitespace() || c == ',')
        .next()
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text {
            text: s.to_string(),
            style: InlineStyle::default(),
            link: None,
        }
    }

    #[test]
    fn test_heading_levels() {
        let doc = parse("# One\n## Two\n### Three\n#### Four");
        let levels: Vec<u8> = doc
            .blocks
            .iter()
            .map(|b| match b {
                Block::Heading { level, .. } => *level,
                other => panic!("unexpected block {:?}", other),
            })
            .collect();
        assert_eq!(levels, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_inline_styles() {
        let doc = parse("plain **bold** *it* ~~gone~~");
        let Block::Paragraph(content) = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(content[0], text("plain "));
        assert!(matches!(&content[1], Inline::Text { style, .. } if style.strong));
        assert!(matches!(&content[3], Inline::Text { style, .. } if style.emphasis));
        assert!(matches!(&content[5], Inline::Text { text, style, .. } if style.strikethrough && text == "gone"));
    }

    #[test]
    fn test_inline_code_is_not_block_code() {
        let doc = parse("Use `cargo test` here.\n\n```rust\nfn main() {}\n```");
        let Block::Paragraph(content) = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(content
            .iter()
            .any(|i| matches!(i, Inline::Code { code, .. } if code == "cargo test")));

        let Block::Code(block) = &doc.blocks[1] else {
            panic!("expected code block");
        };
        assert_eq!(block.language.as_deref(), Some("rust"));
        assert_eq!(block.code, "fn main() {}\n");
        assert_eq!(block.lines.len(), 1);
    }

    #[test]
    fn test_indented_code_has_no_language() {
        let doc = parse("text\n\n    let x = 1;\n");
        assert!(matches!(&doc.blocks[1], Block::Code(CodeBlock { language: None, .. })));
    }

    #[test]
    fn test_links_carry_destination() {
        let doc = parse("See [the docs](https://docs.rs) now");
        let Block::Paragraph(content) = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(matches!(
            &content[1],
            Inline::Text { text, link: Some(url), .. } if text == "the docs" && url == "https://docs.rs"
        ));
        assert!(matches!(&content[2], Inline::Text { link: None, .. }));
    }

    #[test]
    fn test_image_alt_text() {
        let doc = parse("![a *diagram*](https://img.example/x.png)");
        let Block::Paragraph(content) = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(
            content[0],
            Inline::Image {
                url: "https://img.example/x.png".to_string(),
                alt: "a diagram".to_string(),
                link: None,
            }
        );
    }

    #[test]
    fn test_linked_image_keeps_outer_target() {
        let doc = parse("[![badge](https://img.example/ci.svg)](https://ci.example/build)");
        let Block::Paragraph(content) = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(content.len(), 1);
        assert_eq!(
            content[0],
            Inline::Image {
                url: "https://img.example/ci.svg".to_string(),
                alt: "badge".to_string(),
                link: Some("https://ci.example/build".to_string()),
            }
        );
    }

    #[test]
    fn test_lists_and_tasks() {
        let doc = parse("1. first\n2. second\n\n- [x] done\n- [ ] todo\n");
        let Block::List { start, items } = &doc.blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(*start, Some(1));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].blocks, vec![Block::Paragraph(vec![text("first")])]);

        let Block::List { start, items } = &doc.blocks[1] else {
            panic!("expected list");
        };
        assert_eq!(*start, None);
        assert_eq!(items[0].checked, Some(true));
        assert_eq!(items[1].checked, Some(false));
    }

    #[test]
    fn test_nested_list_inside_item() {
        let doc = parse("- outer\n  - inner\n");
        let Block::List { items, .. } = &doc.blocks[0] else {
            panic!("expected list");
        };
        assert!(matches!(items[0].blocks[0], Block::Paragraph(_)));
        assert!(matches!(items[0].blocks[1], Block::List { .. }));
    }

    #[test]
    fn test_block_quote_and_rule() {
        let doc = parse("> quoted\n\n---\n");
        assert_eq!(
            doc.blocks[0],
            Block::BlockQuote(vec![Block::Paragraph(vec![text("quoted")])])
        );
        assert_eq!(doc.blocks[1], Block::Rule);
    }

    #[test]
    fn test_table() {
        let doc = parse("| Lang | Speed |\n|:-----|------:|\n| Rust | fast |\n| Go | fast |\n");
        let Block::Table(table) = &doc.blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.alignments, vec![Alignment::Left, Alignment::Right]);
        assert_eq!(Inline::plain_text(&table.header[0]), "Lang");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(Inline::plain_text(&table.rows[1][0]), "Go");
    }

    #[test]
    fn test_raw_html_is_dropped() {
        let doc = parse("<div>raw</div>\n\nafter");
        assert_eq!(doc.blocks, vec![Block::Paragraph(vec![text("after")])]);
    }

    #[test]
    fn test_fence_language() {
        assert_eq!(fence_language("rust,ignore"), Some("rust".to_string()));
        assert_eq!(fence_language("python title=x"), Some("python".to_string()));
        assert_eq!(fence_language(""), None);
    }
}
