//! Inline/block content classification
//!
//! Single forward pass over the Markdown AST with one-element lookback merge
//! logic, correcting the structural quirks of AI-assistant output before
//! assembly:
//!
//! - a paragraph whose sole child is a math span becomes a display equation
//!   (assistants routinely emit multi-line equations as inline math inside
//!   their own paragraph)
//! - adjacent lists of the same kind are merged back into one logical list
//!   (upstream parsers split a list around embedded block content)
//! - math-only paragraphs and code blocks that trail a still-open list are
//!   reattached to the last item

use crate::core::markdown::{CellAlign, Inline, MdNode};

/// A classified, assembly-ready block.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading {
        depth: u8,
        children: Vec<Inline>,
    },
    Paragraph {
        children: Vec<Inline>,
    },
    /// A display equation; holds the raw LaTeX source, compiled at assembly.
    DisplayEquation {
        latex: String,
    },
    List {
        ordered: bool,
        items: Vec<ListItem>,
    },
    Table {
        align: Vec<CellAlign>,
        head: Vec<Vec<Inline>>,
        rows: Vec<Vec<Vec<Inline>>>,
    },
    CodeBlock {
        text: String,
    },
    BlockQuote {
        children: Vec<Block>,
    },
    ThematicBreak,
}

/// A list item holding classified blocks, so equations and sub-lists can
/// nest inside one item.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub blocks: Vec<Block>,
}

struct ListAcc {
    ordered: bool,
    items: Vec<ListItem>,
}

/// Classify a Markdown AST into assembly-ready blocks.
pub fn classify(nodes: Vec<MdNode>) -> Vec<Block> {
    let mut out = Vec::new();
    let mut acc: Option<ListAcc> = None;

    for node in nodes {
        match node {
            MdNode::List { ordered, items } => {
                let items: Vec<ListItem> = items
                    .into_iter()
                    .map(|item| ListItem {
                        blocks: classify(item.children),
                    })
                    .collect();
                let same_kind = matches!(&acc, Some(open) if open.ordered == ordered);
                if same_kind {
                    if let Some(open) = acc.as_mut() {
                        open.items.extend(items);
                    }
                } else {
                    flush(&mut acc, &mut out);
                    acc = Some(ListAcc { ordered, items });
                }
            }

            MdNode::Paragraph { children } => {
                if let Some(latex) = math_only(&children) {
                    if let Some(block) =
                        attach_to_open_list(&mut acc, Block::DisplayEquation { latex })
                    {
                        flush(&mut acc, &mut out);
                        out.push(block);
                    }
                } else {
                    flush(&mut acc, &mut out);
                    out.push(Block::Paragraph { children });
                }
            }

            MdNode::CodeBlock { text } => {
                if let Some(block) = attach_to_open_list(&mut acc, Block::CodeBlock { text }) {
                    flush(&mut acc, &mut out);
                    out.push(block);
                }
            }

            MdNode::Heading { depth, children } => {
                flush(&mut acc, &mut out);
                out.push(Block::Heading { depth, children });
            }

            MdNode::Table { align, head, rows } => {
                flush(&mut acc, &mut out);
                out.push(Block::Table { align, head, rows });
            }

            MdNode::BlockQuote { children } => {
                flush(&mut acc, &mut out);
                out.push(Block::BlockQuote {
                    children: classify(children),
                });
            }

            MdNode::ThematicBreak => {
                flush(&mut acc, &mut out);
                out.push(Block::ThematicBreak);
            }
        }
    }

    flush(&mut acc, &mut out);
    out
}

/// Append a block to the last item of the open list accumulator. Hands the
/// block back when no list is open.
fn attach_to_open_list(acc: &mut Option<ListAcc>, block: Block) -> Option<Block> {
    match acc.as_mut().and_then(|open| open.items.last_mut()) {
        Some(item) => {
            item.blocks.push(block);
            None
        }
        None => Some(block),
    }
}

fn flush(acc: &mut Option<ListAcc>, out: &mut Vec<Block>) {
    if let Some(open) = acc.take() {
        if !open.items.is_empty() {
            out.push(Block::List {
                ordered: open.ordered,
                items: open.items,
            });
        }
    }
}

/// The LaTeX source when a paragraph consists of exactly one math span.
fn math_only(children: &[Inline]) -> Option<String> {
    match children {
        [Inline::Math { source, .. }] => Some(source.clone()),
        _ => None,
    }
}
