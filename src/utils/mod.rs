//! Utility modules

pub mod error;

pub use error::{GenerateError, GenerateResult};
