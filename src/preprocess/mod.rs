//! Source preprocessors
//!
//! Per-assistant text transforms applied before Markdown parsing. Every
//! transform is idempotent on already-correct input and only ever adds
//! structure (blank lines, table pipes, corrected list numbers).

pub mod chatgpt;
pub mod gemini;
pub mod lists;

use lazy_static::lazy_static;
use regex::Regex;

pub use chatgpt::preprocess_chatgpt;
pub use gemini::preprocess_gemini;
pub use lists::preprocess_lists;

/// Which assistant the Markdown was copied from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiSource {
    /// Gemini output: `$$` math, broken tables and list numbering.
    #[default]
    Gemini,
    /// ChatGPT output: bracket/paren math delimiters.
    ChatGpt,
}

impl AiSource {
    /// Parse a source name as passed by hosts ("gemini" / "chatgpt").
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "gemini" => Some(AiSource::Gemini),
            "chatgpt" => Some(AiSource::ChatGpt),
            _ => None,
        }
    }
}

lazy_static! {
    static ref MISSING_BLANK_BEFORE: Regex = Regex::new(r"([^\n])\n(\$\$)").unwrap();
    static ref MISSING_BLANK_AFTER: Regex = Regex::new(r"(\$\$)\n([^\n])").unwrap();
}

/// Run the full preprocessing pipeline for the given source.
pub fn preprocess(markdown: &str, source: AiSource, csv_tables: bool) -> String {
    let processed = match source {
        AiSource::ChatGpt => preprocess_chatgpt(markdown),
        AiSource::Gemini => preprocess_gemini(markdown, csv_tables),
    };
    let processed = preprocess_lists(&processed);
    ensure_display_math_spacing(&processed)
}

/// Display math needs blank lines around it to parse as its own paragraph.
fn ensure_display_math_spacing(markdown: &str) -> String {
    let processed = MISSING_BLANK_BEFORE.replace_all(markdown, "${1}\n\n${2}");
    MISSING_BLANK_AFTER
        .replace_all(&processed, "${1}\n\n${2}")
        .into_owned()
}
