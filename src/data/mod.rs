//! Data layer - static mappings
//!
//! Static symbol data used by the LaTeX math compiler:
//! - Symbol mappings (Greek letters, operators, arrows, spacing)
//! - Named math function set

pub mod symbols;

pub use symbols::{is_function_name, lookup, FUNCTION_NAMES, SYMBOLS};
