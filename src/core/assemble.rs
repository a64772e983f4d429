//! Document assembly
//!
//! Transforms classified blocks into the document object model, invoking the
//! LaTeX compiler for every math span. Layout constants (indents, spacing,
//! fonts) are in twips and half-points.

use crate::core::classify::{Block, ListItem};
use crate::core::latex::compile;
use crate::core::markdown::{CellAlign, Inline};
use crate::docx::{
    DocBlock, DocCell, DocParagraph, DocRow, DocRun, DocTable, Justify, ParagraphProps, TextRun,
};

const HEADING_SPACING_BEFORE: u32 = 240;
const HEADING_SPACING_AFTER: u32 = 120;
const PARAGRAPH_SPACING_AFTER: u32 = 200;
const EQUATION_SPACING: u32 = 200;
const LIST_ITEM_SPACING: u32 = 100;
const LIST_INDENT: u32 = 720;
const LIST_CONT_INDENT: u32 = 1440;
const QUOTE_INDENT: u32 = 720;

const CODE_FONT: &str = "Courier New";
const CODE_SIZE: u32 = 20;

/// Assemble classified blocks into document blocks.
pub fn assemble(blocks: &[Block]) -> Vec<DocBlock> {
    let mut out = Vec::new();
    for block in blocks {
        assemble_block(block, &mut out);
    }
    out
}

fn assemble_block(block: &Block, out: &mut Vec<DocBlock>) {
    match block {
        Block::Heading { depth, children } => {
            out.push(DocBlock::Paragraph(DocParagraph {
                props: ParagraphProps {
                    heading: Some(*depth),
                    spacing_before: Some(HEADING_SPACING_BEFORE),
                    spacing_after: Some(HEADING_SPACING_AFTER),
                    ..Default::default()
                },
                children: inline_runs(children, false),
            }));
        }

        Block::Paragraph { children } => {
            let runs = inline_runs(children, false);
            if !runs.is_empty() {
                out.push(DocBlock::Paragraph(DocParagraph {
                    props: ParagraphProps {
                        spacing_after: Some(PARAGRAPH_SPACING_AFTER),
                        ..Default::default()
                    },
                    children: runs,
                }));
            }
        }

        Block::DisplayEquation { latex } => {
            out.push(DocBlock::Paragraph(DocParagraph {
                props: ParagraphProps {
                    justify: Some(Justify::Center),
                    spacing_before: Some(EQUATION_SPACING),
                    spacing_after: Some(EQUATION_SPACING),
                    ..Default::default()
                },
                children: vec![DocRun::Math(compile(latex))],
            }));
        }

        Block::List { ordered, items } => assemble_list(*ordered, items, out),

        Block::Table { align, head, rows } => assemble_table(align, head, rows, out),

        Block::BlockQuote { children } => {
            for inner in assemble(children) {
                match inner {
                    DocBlock::Paragraph(mut p) => {
                        p.props.indent_left = Some(QUOTE_INDENT);
                        p.props.spacing_after = Some(PARAGRAPH_SPACING_AFTER);
                        out.push(DocBlock::Paragraph(p));
                    }
                    other => out.push(other),
                }
            }
        }

        Block::ThematicBreak => {
            out.push(DocBlock::Paragraph(DocParagraph {
                props: ParagraphProps {
                    bottom_border: true,
                    spacing_before: Some(PARAGRAPH_SPACING_AFTER),
                    spacing_after: Some(PARAGRAPH_SPACING_AFTER),
                    ..Default::default()
                },
                children: Vec::new(),
            }));
        }

        Block::CodeBlock { text } => {
            out.push(DocBlock::Paragraph(code_paragraph(
                text,
                None,
                PARAGRAPH_SPACING_AFTER,
            )));
        }
    }
}

fn assemble_list(ordered: bool, items: &[ListItem], out: &mut Vec<DocBlock>) {
    let mut number = 1;
    for item in items {
        let marker = if ordered {
            format!("{}. ", number)
        } else {
            "• ".to_string()
        };
        let mut is_first = true;

        for block in &item.blocks {
            match block {
                Block::Paragraph { children } => {
                    let runs = inline_runs(children, false);
                    if runs.is_empty() && !is_first {
                        continue;
                    }
                    let mut para_runs = Vec::new();
                    if is_first {
                        para_runs.push(DocRun::Text(TextRun::new(marker.clone())));
                    }
                    para_runs.extend(runs);
                    out.push(DocBlock::Paragraph(DocParagraph {
                        props: ParagraphProps {
                            indent_left: Some(if is_first { LIST_INDENT } else { LIST_CONT_INDENT }),
                            spacing_after: Some(LIST_ITEM_SPACING),
                            ..Default::default()
                        },
                        children: para_runs,
                    }));
                    is_first = false;
                }

                Block::DisplayEquation { latex } => {
                    out.push(DocBlock::Paragraph(indented_equation(latex)));
                    is_first = false;
                }

                // Assistants habitually mis-fence equations as code; inside a
                // list item a code block with math-significant characters is
                // recovered as an equation.
                Block::CodeBlock { text } => {
                    if looks_like_math(text) {
                        out.push(DocBlock::Paragraph(indented_equation(text)));
                    } else {
                        out.push(DocBlock::Paragraph(code_paragraph(
                            text,
                            Some(LIST_CONT_INDENT),
                            LIST_ITEM_SPACING,
                        )));
                    }
                    is_first = false;
                }

                Block::List {
                    ordered: nested_ordered,
                    items: nested_items,
                } => {
                    assemble_list(*nested_ordered, nested_items, out);
                    is_first = false;
                }

                other => {
                    assemble_block(other, out);
                    is_first = false;
                }
            }
        }

        // An empty item still prints its marker.
        if is_first {
            out.push(DocBlock::Paragraph(DocParagraph {
                props: ParagraphProps {
                    indent_left: Some(LIST_INDENT),
                    spacing_after: Some(LIST_ITEM_SPACING),
                    ..Default::default()
                },
                children: vec![DocRun::Text(TextRun::new(marker))],
            }));
        }

        number += 1;
    }
}

fn assemble_table(
    align: &[CellAlign],
    head: &[Vec<Inline>],
    rows: &[Vec<Vec<Inline>>],
    out: &mut Vec<DocBlock>,
) {
    let columns = align
        .len()
        .max(head.len())
        .max(rows.iter().map(|r| r.len()).max().unwrap_or(0));
    if columns == 0 {
        return;
    }

    let mut doc_rows = Vec::with_capacity(rows.len() + 1);
    doc_rows.push(table_row(head, align, columns, true));
    for row in rows {
        doc_rows.push(table_row(row, align, columns, false));
    }

    out.push(DocBlock::Table(DocTable {
        columns,
        rows: doc_rows,
    }));

    // Spacer so following content does not stick to the table.
    out.push(DocBlock::Paragraph(DocParagraph {
        props: ParagraphProps {
            spacing_after: Some(PARAGRAPH_SPACING_AFTER),
            ..Default::default()
        },
        children: Vec::new(),
    }));
}

/// Build one table row, padding short rows up to `columns` cells.
fn table_row(cells: &[Vec<Inline>], align: &[CellAlign], columns: usize, header: bool) -> DocRow {
    let empty = Vec::new();
    let mut out_cells = Vec::with_capacity(columns);
    for i in 0..columns {
        let content = cells.get(i).unwrap_or(&empty);
        let justify = match align.get(i) {
            Some(CellAlign::Center) => Justify::Center,
            Some(CellAlign::Right) => Justify::Right,
            _ => Justify::Left,
        };
        out_cells.push(DocCell {
            content: DocParagraph {
                props: ParagraphProps {
                    justify: Some(justify),
                    ..Default::default()
                },
                children: inline_runs(content, header),
            },
        });
    }
    DocRow { cells: out_cells }
}

/// Convert inline content to document runs, compiling math spans.
fn inline_runs(children: &[Inline], force_bold: bool) -> Vec<DocRun> {
    let mut runs = Vec::new();
    for child in children {
        match child {
            Inline::Text(text) => runs.push(DocRun::Text(TextRun {
                text: text.clone(),
                bold: force_bold,
                ..Default::default()
            })),
            // Inline code renders as plain text in the document.
            Inline::Code(text) => runs.push(DocRun::Text(TextRun {
                text: text.clone(),
                bold: force_bold,
                ..Default::default()
            })),
            Inline::Math { source, .. } => runs.push(DocRun::Math(compile(source))),
            Inline::Strong(children) => {
                for sub in children {
                    match sub {
                        Inline::Text(text) => runs.push(DocRun::Text(TextRun {
                            text: text.clone(),
                            bold: true,
                            ..Default::default()
                        })),
                        Inline::Math { source, .. } => runs.push(DocRun::Math(compile(source))),
                        other => runs.extend(inline_runs(std::slice::from_ref(other), true)),
                    }
                }
            }
            Inline::Emphasis(children) => {
                for sub in children {
                    match sub {
                        Inline::Text(text) => runs.push(DocRun::Text(TextRun {
                            text: text.clone(),
                            bold: force_bold,
                            italics: true,
                            ..Default::default()
                        })),
                        Inline::Math { source, .. } => runs.push(DocRun::Math(compile(source))),
                        other => {
                            runs.extend(inline_runs(std::slice::from_ref(other), force_bold))
                        }
                    }
                }
            }
            // Link targets are dropped; only the text content renders.
            Inline::Link { children, .. } => runs.extend(inline_runs(children, force_bold)),
        }
    }
    runs
}

/// A left-aligned equation paragraph as it appears inside a list item.
fn indented_equation(latex: &str) -> DocParagraph {
    DocParagraph {
        props: ParagraphProps {
            justify: Some(Justify::Left),
            indent_left: Some(LIST_CONT_INDENT),
            spacing_before: Some(LIST_ITEM_SPACING),
            spacing_after: Some(LIST_ITEM_SPACING),
            ..Default::default()
        },
        children: vec![DocRun::Math(compile(latex))],
    }
}

fn code_paragraph(text: &str, indent: Option<u32>, spacing: u32) -> DocParagraph {
    DocParagraph {
        props: ParagraphProps {
            indent_left: indent,
            spacing_before: Some(spacing),
            spacing_after: Some(spacing),
            ..Default::default()
        },
        children: vec![DocRun::Text(TextRun {
            text: text.to_string(),
            font: Some(CODE_FONT),
            size: Some(CODE_SIZE),
            ..Default::default()
        })],
    }
}

/// Whether a mis-fenced code block is really an equation.
fn looks_like_math(text: &str) -> bool {
    text.contains('\\') || text.chars().any(|c| matches!(c, '^' | '_' | '{' | '}'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classify::classify;
    use crate::core::markdown::parse_markdown;
    use crate::core::node::MathNode;

    fn assemble_str(markdown: &str) -> Vec<DocBlock> {
        assemble(&classify(parse_markdown(markdown)))
    }

    fn first_text(block: &DocBlock) -> &str {
        match block {
            DocBlock::Paragraph(p) => match &p.children[0] {
                DocRun::Text(run) => &run.text,
                other => panic!("expected text run, got {:?}", other),
            },
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_heading_paragraph() {
        let blocks = assemble_str("## Section\n");
        match &blocks[0] {
            DocBlock::Paragraph(p) => {
                assert_eq!(p.props.heading, Some(2));
                assert_eq!(p.props.spacing_before, Some(HEADING_SPACING_BEFORE));
            }
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_display_equation_is_centered() {
        let blocks = assemble_str("$$x^2$$\n");
        match &blocks[0] {
            DocBlock::Paragraph(p) => {
                assert_eq!(p.props.justify, Some(Justify::Center));
                assert!(matches!(p.children[0], DocRun::Math(_)));
            }
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_list_markers_and_indents() {
        let blocks = assemble_str("1. one\n2. two\n");
        assert_eq!(first_text(&blocks[0]), "1. ");
        assert_eq!(first_text(&blocks[1]), "2. ");
        match &blocks[0] {
            DocBlock::Paragraph(p) => assert_eq!(p.props.indent_left, Some(LIST_INDENT)),
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_bullet_marker() {
        let blocks = assemble_str("- point\n");
        assert_eq!(first_text(&blocks[0]), "• ");
    }

    #[test]
    fn test_equation_in_list_item_indented_without_marker() {
        let blocks = assemble_str("1. item\n\n   $E=mc^2$\n");
        assert_eq!(blocks.len(), 2);
        match &blocks[1] {
            DocBlock::Paragraph(p) => {
                assert_eq!(p.props.indent_left, Some(LIST_CONT_INDENT));
                assert_eq!(p.props.justify, Some(Justify::Left));
                assert!(matches!(p.children[0], DocRun::Math(_)));
            }
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_misfenced_math_code_block_in_list_is_compiled() {
        let blocks = assemble_str("1. item\n\n```\n\\frac{1}{2}\n```\n");
        match &blocks[1] {
            DocBlock::Paragraph(p) => match &p.children[0] {
                DocRun::Math(nodes) => {
                    assert!(matches!(nodes[0], MathNode::Fraction { .. }));
                }
                other => panic!("expected math run, got {:?}", other),
            },
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_code_block_in_list_stays_code() {
        let blocks = assemble_str("1. item\n\n```\nplain words\n```\n");
        match &blocks[1] {
            DocBlock::Paragraph(p) => match &p.children[0] {
                DocRun::Text(run) => {
                    assert_eq!(run.font, Some(CODE_FONT));
                    assert_eq!(run.size, Some(CODE_SIZE));
                }
                other => panic!("expected code text run, got {:?}", other),
            },
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_table_header_bold_body_plain() {
        let blocks = assemble_str("| a | b |\n|---|---|\n| 1 | 2 |\n");
        match &blocks[0] {
            DocBlock::Table(table) => {
                assert_eq!(table.columns, 2);
                assert_eq!(table.rows.len(), 2);
                for cell in &table.rows[0].cells {
                    match &cell.content.children[0] {
                        DocRun::Text(run) => assert!(run.bold),
                        other => panic!("expected text run, got {:?}", other),
                    }
                }
                for cell in &table.rows[1].cells {
                    match &cell.content.children[0] {
                        DocRun::Text(run) => assert!(!run.bold),
                        other => panic!("expected text run, got {:?}", other),
                    }
                }
            }
            other => panic!("expected table, got {:?}", other),
        }
        // spacer paragraph follows the table
        assert!(matches!(blocks[1], DocBlock::Paragraph(_)));
    }

    #[test]
    fn test_ragged_table_rows_padded() {
        let blocks = assemble_str("| a | b | c |\n|---|---|---|\n| 1 |\n");
        match &blocks[0] {
            DocBlock::Table(table) => {
                assert_eq!(table.columns, 3);
                assert_eq!(table.rows[1].cells.len(), 3);
                assert!(table.rows[1].cells[2].content.children.is_empty());
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_table_column_alignment() {
        let blocks = assemble_str("| a | b |\n|:-:|--:|\n| 1 | 2 |\n");
        match &blocks[0] {
            DocBlock::Table(table) => {
                let row = &table.rows[1];
                assert_eq!(row.cells[0].content.props.justify, Some(Justify::Center));
                assert_eq!(row.cells[1].content.props.justify, Some(Justify::Right));
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_blockquote_reindents_paragraphs() {
        let blocks = assemble_str("> quoted words\n");
        match &blocks[0] {
            DocBlock::Paragraph(p) => assert_eq!(p.props.indent_left, Some(QUOTE_INDENT)),
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_thematic_break_is_bottom_border() {
        let blocks = assemble_str("---\n");
        match &blocks[0] {
            DocBlock::Paragraph(p) => {
                assert!(p.props.bottom_border);
                assert!(p.children.is_empty());
            }
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_bold_and_italic_runs() {
        let blocks = assemble_str("**bold** and *italic*\n");
        match &blocks[0] {
            DocBlock::Paragraph(p) => {
                match &p.children[0] {
                    DocRun::Text(run) => {
                        assert_eq!(run.text, "bold");
                        assert!(run.bold);
                    }
                    other => panic!("expected text run, got {:?}", other),
                }
                let italic = p.children.iter().any(|r| match r {
                    DocRun::Text(run) => run.italics,
                    _ => false,
                });
                assert!(italic);
            }
            other => panic!("expected paragraph, got {:?}", other),
        }
    }
}
