//! Illustrative images for slides.
//!
//! Images come from a stock-photo provider when one answers; otherwise a
//! placeholder URL is generated. The placeholder colour is picked from the
//! first character of the search term, so the same term always gets the
//! same colours.

use serde::{Deserialize, Serialize};

/// Base URL of the placeholder image service.
pub const PLACEHOLDER_BASE_URL: &str = "https://placehold.co/800x600";

/// Background and text colours of a placeholder image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderTheme {
    /// Background colour, `#rrggbb`.
    pub bg_color: &'static str,
    /// Text colour, `#rrggbb`.
    pub text_color: &'static str,
}

/// Placeholder palette: blue, green, red, purple.
pub const PLACEHOLDER_THEMES: [PlaceholderTheme; 4] = [
    PlaceholderTheme {
        bg_color: "#f0f9ff",
        text_color: "#0c4a6e",
    },
    PlaceholderTheme {
        bg_color: "#f0fdf4",
        text_color: "#14532d",
    },
    PlaceholderTheme {
        bg_color: "#fef2f2",
        text_color: "#7f1d1d",
    },
    PlaceholderTheme {
        bg_color: "#faf5ff",
        text_color: "#581c87",
    },
];

/// Where a resolved image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    /// Pexels stock photo.
    Pexels,
    /// Generated placeholder.
    Placeholder,
}

/// Credit line for a stock photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribution {
    pub photographer: String,
    pub photographer_url: String,
    /// Display name of the photo site.
    pub source: String,
    /// Page of the photo on the photo site.
    pub source_url: String,
}

/// An image chosen for a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedImage {
    /// URL to display.
    #[serde(rename = "imageUrl")]
    pub url: String,

    /// Alt text.
    pub alt: String,

    pub source: ImageSource,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,

    /// Smaller alternatives from the same search.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thumbnails: Vec<String>,
}

impl ResolvedImage {
    /// A placeholder for `term` in the given colours.
    pub fn placeholder(term: &str, theme: PlaceholderTheme, timestamp_ms: i64) -> Self {
        Self {
            url: placeholder_url(term, theme, timestamp_ms),
            alt: term.to_string(),
            source: ImageSource::Placeholder,
            attribution: None,
            thumbnails: Vec::new(),
        }
    }
}

/// Pick a placeholder palette entry from the first character of `term`.
///
/// Uses the first UTF-16 code unit, so terms starting with the same
/// character always share colours. An empty term gets the first entry.
pub fn placeholder_theme_for(term: &str) -> PlaceholderTheme {
    let code = term.encode_utf16().next().unwrap_or(0) as usize;
    PLACEHOLDER_THEMES[code % PLACEHOLDER_THEMES.len()]
}

/// Build a placeholder image URL showing `term`.
///
/// The timestamp is appended as a cache buster.
pub fn placeholder_url(term: &str, theme: PlaceholderTheme, timestamp_ms: i64) -> String {
    format!(
        "{}/{}/{}?text={}&t={}",
        PLACEHOLDER_BASE_URL,
        theme.bg_color.trim_start_matches('#'),
        theme.text_color.trim_start_matches('#'),
        urlencoding::encode(term),
        timestamp_ms
    )
}

/// Google Images search page for `term`.
pub fn image_search_url(term: &str) -> String {
    format!(
        "https://www.google.com/search?q={}&tbm=isch",
        urlencoding::encode(term)
    )
}
