//! # chat2docx
//!
//! Convert Markdown copied from AI chat assistants into Word documents with
//! native, editable equations.
//!
//! ## Features
//!
//! - **Native equations**: LaTeX math is compiled into OMML equation
//!   objects, not images or styled text
//! - **Assistant-aware**: per-source preprocessors repair the list, table
//!   and math-delimiter quirks of Gemini and ChatGPT output
//! - **Total math compiler**: malformed LaTeX degrades to plain text,
//!   never to a crash
//! - **Full pipeline**: headings, lists (with equations inside items),
//!   tables, blockquotes, code blocks
//! - **WASM support**: compiles to WebAssembly for browser usage
//!
//! ## Usage
//!
//! ```rust
//! use chat2docx::{generate_docx, GenerateOptions};
//!
//! let markdown = "# Informe\n\n$$E = mc^2$$\n";
//! let bytes = generate_docx(markdown, &GenerateOptions::default()).unwrap();
//! assert!(bytes.starts_with(b"PK"));
//! ```
//!
//! Compiling a math span on its own:
//!
//! ```rust
//! use chat2docx::{compile, MathNode};
//!
//! let nodes = compile(r"\frac{1}{2}");
//! assert!(matches!(nodes[0], MathNode::Fraction { .. }));
//! ```

/// Core conversion modules
pub mod core;

/// Data layer - static symbol mappings
pub mod data;

/// DOCX object model and serialization
pub mod docx;

/// Assistant-specific source preprocessors
pub mod preprocess;

/// Utility modules
pub mod utils;

/// WASM bindings (feature-gated)
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export the pipeline stages
pub use core::assemble::assemble;
pub use core::classify::{classify, Block, ListItem};
pub use core::latex::compile;
pub use core::markdown::{parse_markdown, CellAlign, Inline, MdNode};
pub use core::node::{BarPosition, MathNode};

// Re-export the document model and serializer
pub use docx::{write_package, DocBlock, DocParagraph, DocRun, DocxDocument, TextRun};

// Re-export preprocessing
pub use preprocess::{preprocess, AiSource};

// Re-export errors
pub use utils::error::{GenerateError, GenerateResult};

/// Conventional output file name used by hosts when saving the package.
pub const OUTPUT_FILE_NAME: &str = "documento.docx";

/// Options for one document-generation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Which assistant the input was copied from.
    pub source: AiSource,
    /// Enable the heuristic CSV/TSV-to-table conversion.
    pub csv_tables: bool,
}

/// Build the in-memory document for a Markdown string.
///
/// Fails only when the input yields no content at all; every construct-level
/// problem (unsupported LaTeX, ragged tables, broken lists) is repaired or
/// degraded locally instead.
pub fn markdown_to_document(
    markdown: &str,
    options: &GenerateOptions,
) -> GenerateResult<DocxDocument> {
    let processed = preprocess(markdown, options.source, options.csv_tables);
    let blocks = classify(parse_markdown(&processed));
    if blocks.is_empty() {
        return Err(GenerateError::EmptyDocument);
    }
    Ok(DocxDocument {
        blocks: assemble(&blocks),
    })
}

/// Convert a Markdown string into `.docx` package bytes.
///
/// # Arguments
/// * `markdown` - the raw assistant output
/// * `options` - source selection and heuristics
///
/// # Returns
/// The bytes of a Word-compatible `.docx` file.
pub fn generate_docx(markdown: &str, options: &GenerateOptions) -> GenerateResult<Vec<u8>> {
    let document = markdown_to_document(markdown, options)?;
    write_package(&document)
}
