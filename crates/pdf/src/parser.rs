//! PDF file parser implementation.

use deck_core::{Error, Result};
use lopdf::{Dictionary, Document, Object};
use serde::Serialize;
use serde_json::{Map, Value};
use unicode_normalization::UnicodeNormalization;

/// Largest upload accepted for extraction (10 MB).
pub const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

/// How far into the file the `%PDF-` header may appear.
const HEADER_SEARCH_BYTES: usize = 1024;

/// Text and metadata extracted from a PDF.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdfDocument {
    /// Text of all pages, separated by blank lines.
    pub text: String,

    /// Number of pages.
    pub pages: usize,

    /// `PDFFormatVersion` plus the string entries of the Info dictionary.
    pub info: Map<String, Value>,
}

/// Parser for PDF files.
pub struct PdfParser;

impl PdfParser {
    /// Create a new PDF parser.
    pub fn new() -> Self {
        Self
    }

    /// Check whether `bytes` start like a PDF file.
    pub fn looks_like_pdf(bytes: &[u8]) -> bool {
        let head = &bytes[..bytes.len().min(HEADER_SEARCH_BYTES)];
        head.windows(5).any(|w| w == b"%PDF-")
    }

    /// Parse a PDF held in memory.
    ///
    /// Pages whose text cannot be decoded count as empty. Fails with
    /// [`Error::PdfParse`] if the bytes are not a readable PDF and with
    /// [`Error::NoText`] if no page yields any text.
    pub fn parse(&self, bytes: &[u8]) -> Result<PdfDocument> {
        if !Self::looks_like_pdf(bytes) {
            return Err(Error::PdfParse("missing %PDF header".to_string()));
        }

        let doc = Document::load_mem(bytes).map_err(|e| Error::PdfParse(e.to_string()))?;

        let pages = doc.get_pages();
        let mut page_texts = Vec::with_capacity(pages.len());

        for &number in pages.keys() {
            match doc.extract_text(&[number]) {
                Ok(text) => page_texts.push(text.trim_end().to_string()),
                Err(e) => {
                    log::warn!("Failed to extract text from page {} (continuing): {}", number, e);
                }
            }
        }

        let text = clean_text(&page_texts.join("\n\n"));
        log::debug!("Extracted {} chars from {} pages", text.len(), pages.len());

        if text.trim().is_empty() {
            return Err(Error::NoText);
        }

        Ok(PdfDocument {
            text,
            pages: pages.len(),
            info: read_info(&doc),
        })
    }
}

impl Default for PdfParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize extracted text.
///
/// Applies NFKC (folding ligatures such as `ﬁ`), unifies line endings and
/// trims trailing whitespace from each line.
fn clean_text(raw: &str) -> String {
    let normalized: String = raw.nfkc().collect();

    normalized
        .replace("\r\n", "\n")
        .replace(['\r', '\x0C'], "\n")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Collect the version and Info dictionary entries.
fn read_info(doc: &Document) -> Map<String, Value> {
    let mut info = Map::new();
    info.insert(
        "PDFFormatVersion".to_string(),
        Value::String(doc.version.clone()),
    );

    if let Some(dict) = info_dictionary(doc) {
        for (key, value) in dict.iter() {
            if let Object::String(bytes, _) = value {
                info.insert(
                    String::from_utf8_lossy(key).into_owned(),
                    Value::String(decode_pdf_string(bytes)),
                );
            }
        }
    }

    info
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    let entry = doc.trailer.get(b"Info").ok()?;
    match entry.as_reference() {
        Ok(id) => doc.get_dictionary(id).ok(),
        Err(_) => entry.as_dict().ok(),
    }
}

/// Decode a PDF text string: UTF-16BE when it carries a byte order mark,
/// otherwise treated as UTF-8.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units).trim().to_string();
    }

    String::from_utf8_lossy(bytes).trim().to_string()
}
