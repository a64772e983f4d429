//! Markdown AST construction
//!
//! Walks the `pulldown-cmark` event stream (CommonMark + GFM tables + math)
//! and builds the owned block/inline tree consumed by the classifier. The
//! grammar itself is fully delegated to the parser; this module only folds
//! the flat event stream back into nested nodes.

use pulldown_cmark::{Alignment, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Inline content of a paragraph, heading or table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    /// Inline code span. Rendered as plain text in the output document.
    Code(String),
    /// A math span. `display` distinguishes `$$...$$` from `$...$`.
    Math { display: bool, source: String },
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Link { url: String, children: Vec<Inline> },
}

/// Per-column alignment carried from the source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellAlign {
    None,
    Left,
    Center,
    Right,
}

/// One list item; items hold full blocks so equations and sub-lists can live
/// inside a single item.
#[derive(Debug, Clone, PartialEq)]
pub struct MdListItem {
    pub children: Vec<MdNode>,
}

/// A block-level Markdown node.
#[derive(Debug, Clone, PartialEq)]
pub enum MdNode {
    Heading {
        depth: u8,
        children: Vec<Inline>,
    },
    Paragraph {
        children: Vec<Inline>,
    },
    CodeBlock {
        text: String,
    },
    List {
        ordered: bool,
        items: Vec<MdListItem>,
    },
    Table {
        align: Vec<CellAlign>,
        head: Vec<Vec<Inline>>,
        rows: Vec<Vec<Vec<Inline>>>,
    },
    BlockQuote {
        children: Vec<MdNode>,
    },
    ThematicBreak,
}

/// Parse a Markdown string into the block tree.
pub fn parse_markdown(markdown: &str) -> Vec<MdNode> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_MATH);
    let parser = Parser::new_ext(markdown, options);

    let mut builder = AstBuilder::new();
    for event in parser {
        builder.process(event);
    }
    builder.finish()
}

/// Open inline formatting frame; the parent buffer is parked here until the
/// matching end tag arrives.
enum SpanFrame {
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Link { url: String, parent: Vec<Inline> },
    /// Content that is parsed but not rendered (image alt text).
    Discard(Vec<Inline>),
}

struct ListFrame {
    ordered: bool,
    items: Vec<MdListItem>,
}

struct AstBuilder {
    /// Block containers; index 0 is the document, further entries are open
    /// blockquotes and list items.
    containers: Vec<Vec<MdNode>>,
    inlines: Vec<Inline>,
    span_stack: Vec<SpanFrame>,
    heading: Option<u8>,

    in_code_block: bool,
    code_text: String,

    list_stack: Vec<ListFrame>,

    table_align: Vec<CellAlign>,
    table_head: Vec<Vec<Inline>>,
    table_rows: Vec<Vec<Vec<Inline>>>,
    current_row: Vec<Vec<Inline>>,
    in_table_head: bool,
}

impl AstBuilder {
    fn new() -> Self {
        AstBuilder {
            containers: vec![Vec::new()],
            inlines: Vec::new(),
            span_stack: Vec::new(),
            heading: None,
            in_code_block: false,
            code_text: String::new(),
            list_stack: Vec::new(),
            table_align: Vec::new(),
            table_head: Vec::new(),
            table_rows: Vec::new(),
            current_row: Vec::new(),
            in_table_head: false,
        }
    }

    fn push_node(&mut self, node: MdNode) {
        if let Some(container) = self.containers.last_mut() {
            container.push(node);
        }
    }

    /// Wrap pending inline content into a paragraph. Needed at every block
    /// boundary because tight list items emit their text without paragraph
    /// tags.
    fn flush_inlines(&mut self) {
        if !self.inlines.is_empty() {
            let children = std::mem::take(&mut self.inlines);
            self.push_node(MdNode::Paragraph { children });
        }
    }

    fn process(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(end) => self.end_tag(end),

            Event::Text(text) => {
                if self.in_code_block {
                    self.code_text.push_str(&text);
                } else {
                    self.inlines.push(Inline::Text(text.into_string()));
                }
            }
            Event::Code(code) => {
                self.inlines.push(Inline::Code(code.into_string()));
            }
            Event::InlineMath(math) => {
                self.inlines.push(Inline::Math {
                    display: false,
                    source: math.into_string(),
                });
            }
            Event::DisplayMath(math) => {
                self.inlines.push(Inline::Math {
                    display: true,
                    source: math.into_string(),
                });
            }
            Event::SoftBreak | Event::HardBreak => {
                self.inlines.push(Inline::Text(" ".to_string()));
            }
            Event::Rule => {
                self.flush_inlines();
                self.push_node(MdNode::ThematicBreak);
            }
            // Inline HTML degrades to literal text; block HTML is dropped.
            Event::InlineHtml(html) => {
                self.inlines.push(Inline::Text(html.into_string()));
            }
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush_inlines();
                self.heading = Some(heading_depth(level));
            }
            Tag::Paragraph => {}
            Tag::CodeBlock(_) => {
                self.flush_inlines();
                self.in_code_block = true;
                self.code_text.clear();
            }
            Tag::List(first_item) => {
                self.flush_inlines();
                self.list_stack.push(ListFrame {
                    ordered: first_item.is_some(),
                    items: Vec::new(),
                });
            }
            Tag::Item => {
                self.containers.push(Vec::new());
            }
            Tag::BlockQuote(_) => {
                self.flush_inlines();
                self.containers.push(Vec::new());
            }
            Tag::Table(aligns) => {
                self.flush_inlines();
                self.table_align = aligns.iter().map(cell_align).collect();
                self.table_head.clear();
                self.table_rows.clear();
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.current_row.clear();
            }
            Tag::TableRow => {
                self.current_row.clear();
            }
            Tag::TableCell => {
                self.inlines.clear();
            }
            Tag::Strong => {
                self.span_stack
                    .push(SpanFrame::Strong(std::mem::take(&mut self.inlines)));
            }
            Tag::Emphasis => {
                self.span_stack
                    .push(SpanFrame::Emphasis(std::mem::take(&mut self.inlines)));
            }
            Tag::Link { dest_url, .. } => {
                self.span_stack.push(SpanFrame::Link {
                    url: dest_url.into_string(),
                    parent: std::mem::take(&mut self.inlines),
                });
            }
            Tag::Image { .. } => {
                self.span_stack
                    .push(SpanFrame::Discard(std::mem::take(&mut self.inlines)));
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, end: TagEnd) {
        match end {
            TagEnd::Heading(_) => {
                let children = std::mem::take(&mut self.inlines);
                let depth = self.heading.take().unwrap_or(1);
                self.push_node(MdNode::Heading { depth, children });
            }
            TagEnd::Paragraph => {
                let children = std::mem::take(&mut self.inlines);
                if !children.is_empty() {
                    self.push_node(MdNode::Paragraph { children });
                }
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                let text = std::mem::take(&mut self.code_text);
                self.push_node(MdNode::CodeBlock {
                    text: text.trim_end_matches('\n').to_string(),
                });
            }
            TagEnd::List(_) => {
                if let Some(frame) = self.list_stack.pop() {
                    self.push_node(MdNode::List {
                        ordered: frame.ordered,
                        items: frame.items,
                    });
                }
            }
            TagEnd::Item => {
                self.flush_inlines();
                let children = self.containers.pop().unwrap_or_default();
                if let Some(frame) = self.list_stack.last_mut() {
                    frame.items.push(MdListItem { children });
                }
            }
            TagEnd::BlockQuote(_) => {
                self.flush_inlines();
                let children = self.containers.pop().unwrap_or_default();
                self.push_node(MdNode::BlockQuote { children });
            }
            TagEnd::Table => {
                let align = std::mem::take(&mut self.table_align);
                let head = std::mem::take(&mut self.table_head);
                let rows = std::mem::take(&mut self.table_rows);
                self.push_node(MdNode::Table { align, head, rows });
            }
            TagEnd::TableHead => {
                self.in_table_head = false;
                self.table_head = std::mem::take(&mut self.current_row);
            }
            TagEnd::TableRow => {
                if !self.in_table_head {
                    let row = std::mem::take(&mut self.current_row);
                    self.table_rows.push(row);
                }
            }
            TagEnd::TableCell => {
                let cell = std::mem::take(&mut self.inlines);
                self.current_row.push(cell);
            }
            TagEnd::Strong => {
                let children = std::mem::take(&mut self.inlines);
                if let Some(SpanFrame::Strong(mut parent)) = self.span_stack.pop() {
                    parent.push(Inline::Strong(children));
                    self.inlines = parent;
                }
            }
            TagEnd::Emphasis => {
                let children = std::mem::take(&mut self.inlines);
                if let Some(SpanFrame::Emphasis(mut parent)) = self.span_stack.pop() {
                    parent.push(Inline::Emphasis(children));
                    self.inlines = parent;
                }
            }
            TagEnd::Link => {
                let children = std::mem::take(&mut self.inlines);
                if let Some(SpanFrame::Link { url, mut parent }) = self.span_stack.pop() {
                    parent.push(Inline::Link { url, children });
                    self.inlines = parent;
                }
            }
            TagEnd::Image => {
                // Alt text is parsed as inline content but not rendered.
                self.inlines.clear();
                if let Some(SpanFrame::Discard(parent)) = self.span_stack.pop() {
                    self.inlines = parent;
                }
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<MdNode> {
        self.flush_inlines();
        self.containers.swap_remove(0)
    }
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn cell_align(align: &Alignment) -> CellAlign {
    match align {
        Alignment::None => CellAlign::None,
        Alignment::Left => CellAlign::Left,
        Alignment::Center => CellAlign::Center,
        Alignment::Right => CellAlign::Right,
    }
}
