//! DOCX document model and serialization
//!
//! An in-memory object model for the generated document (paragraphs carrying
//! text runs and equation objects, plus tables), serialized into a
//! Word-compatible OPC package:
//! - `omml`: equation trees to Office Math Markup
//! - `document`: the `word/document.xml` part
//! - `package`: zip packaging, styles, relationships, document properties

pub mod document;
pub mod omml;
pub mod package;

pub use package::write_package;

use crate::core::node::MathNode;

/// Paragraph justification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Left,
    Center,
    Right,
}

impl Justify {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Justify::Left => "left",
            Justify::Center => "center",
            Justify::Right => "right",
        }
    }
}

/// Paragraph-level formatting. All measurements are in twips; run sizes are
/// half-points, matching the underlying WordprocessingML units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphProps {
    /// Heading level 1-6; styled via the `HeadingN` styles.
    pub heading: Option<u8>,
    pub justify: Option<Justify>,
    pub indent_left: Option<u32>,
    pub spacing_before: Option<u32>,
    pub spacing_after: Option<u32>,
    /// A single bottom border, used for thematic breaks.
    pub bottom_border: bool,
}

/// A literal text run with character formatting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italics: bool,
    pub font: Option<&'static str>,
    /// Font size in half-points.
    pub size: Option<u32>,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        TextRun {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// One paragraph child: either a text run or a native equation object.
#[derive(Debug, Clone, PartialEq)]
pub enum DocRun {
    Text(TextRun),
    Math(Vec<MathNode>),
}

/// A paragraph with formatting and runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocParagraph {
    pub props: ParagraphProps,
    pub children: Vec<DocRun>,
}

impl DocParagraph {
    pub fn new(children: Vec<DocRun>) -> Self {
        DocParagraph {
            props: ParagraphProps::default(),
            children,
        }
    }
}

/// A table cell: one paragraph, cell width derived from the column count.
#[derive(Debug, Clone, PartialEq)]
pub struct DocCell {
    pub content: DocParagraph,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocRow {
    pub cells: Vec<DocCell>,
}

/// A full-width table; all rows are padded to `columns` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct DocTable {
    pub columns: usize,
    pub rows: Vec<DocRow>,
}

/// A top-level structural block.
#[derive(Debug, Clone, PartialEq)]
pub enum DocBlock {
    Paragraph(DocParagraph),
    Table(DocTable),
}

/// The assembled document, finalized once and serialized once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocxDocument {
    pub blocks: Vec<DocBlock>,
}
