//! Error handling for document generation
//!
//! A single error type covers the one input-level failure (a document that
//! yields no content) and the environment-level serialization failures. The
//! compiler and classifier themselves are total and never error.

use std::fmt;

/// Document generation error.
#[derive(Debug, Clone)]
pub enum GenerateError {
    /// The input produced no content blocks; generating would write a
    /// misleading empty file, so the call fails fast instead.
    EmptyDocument,
    /// Invalid input (bad option value, etc.).
    InvalidInput { message: String },
    /// XML serialization error.
    Serialize { message: String },
    /// IO or packaging error.
    IoError { message: String },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::EmptyDocument => {
                write!(f, "Document is empty: no content to convert")
            }
            GenerateError::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)
            }
            GenerateError::Serialize { message } => {
                write!(f, "Serialization error: {}", message)
            }
            GenerateError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for GenerateError {}

impl From<std::io::Error> for GenerateError {
    fn from(err: std::io::Error) -> Self {
        GenerateError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<quick_xml::Error> for GenerateError {
    fn from(err: quick_xml::Error) -> Self {
        GenerateError::Serialize {
            message: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for GenerateError {
    fn from(err: zip::result::ZipError) -> Self {
        GenerateError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type for generation operations.
pub type GenerateResult<T> = Result<T, GenerateError>;

// Convenience constructors
impl GenerateError {
    pub fn invalid(message: impl Into<String>) -> Self {
        GenerateError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn serialize(message: impl Into<String>) -> Self {
        GenerateError::Serialize {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_display() {
        let err = GenerateError::EmptyDocument;
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_invalid_input_display() {
        let err = GenerateError::invalid("unknown source");
        assert!(err.to_string().contains("Invalid input"));
        assert!(err.to_string().contains("unknown source"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: GenerateError = io.into();
        assert!(matches!(err, GenerateError::IoError { .. }));
    }
}
