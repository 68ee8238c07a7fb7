//! Error types for deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid user input (empty title and content, bad upload).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An AI or image provider was unreachable or returned something unusable.
    #[error("Upstream provider error: {0}")]
    Upstream(String),

    /// A PDF could not be parsed.
    #[error("Failed to parse PDF content: {0}")]
    PdfParse(String),

    /// A PDF parsed but carried no extractable text.
    #[error("No text could be extracted from the PDF")]
    NoText,
}

impl Error {
    /// Whether this error comes from text extraction rather than user input.
    pub fn is_extraction(&self) -> bool {
        matches!(self, Self::PdfParse(_) | Self::NoText)
    }
}
