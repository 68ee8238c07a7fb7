//! Image resolution with placeholder fallback.

use deck_core::image::placeholder_theme_for;
use deck_core::ResolvedImage;

use crate::providers::pexels::{to_resolved_image, PexelsClient};

/// Find an image for `term`.
///
/// Tries Pexels when a client is configured. Any failure or empty result
/// degrades to a placeholder coloured by the term's first character.
pub async fn resolve_image(pexels: Option<&PexelsClient>, term: &str, timestamp_ms: i64) -> ResolvedImage {
    if let Some(client) = pexels {
        match client.search(term).await {
            Ok(photos) => {
                if let Some(image) = to_resolved_image(&photos) {
                    log::debug!("Found {} Pexels images for {:?}", photos.len(), term);
                    return image;
                }
                log::info!("No Pexels images found for {:?}, using placeholder", term);
            }
            Err(e) => log::warn!("Pexels lookup for {:?} failed: {}", term, e),
        }
    }

    placeholder_image(term, timestamp_ms)
}

/// The deterministic placeholder for `term`.
pub fn placeholder_image(term: &str, timestamp_ms: i64) -> ResolvedImage {
    ResolvedImage::placeholder(term, placeholder_theme_for(term), timestamp_ms)
}
