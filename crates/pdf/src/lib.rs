//! PDF text extraction backend for the deck generator.
//!
//! Parses uploaded PDFs with `lopdf` and returns their text, page count and
//! document info.

pub mod parser;

pub use parser::{PdfDocument, PdfParser, MAX_PDF_BYTES};
