//! Pexels stock photo search.
//!
//! [Pexels API Documentation](https://www.pexels.com/api/documentation/)

use deck_core::{Attribution, Error, ImageSource, ResolvedImage, Result};
use serde::{Deserialize, Serialize};

use crate::config::{ServerConfig, DEFAULT_PEXELS_BASE_URL};

/// Photos requested per search.
const PER_PAGE: u32 = 10;

/// Photos kept after ranking.
const TOP_PHOTOS: usize = 3;

/// Client for the Pexels photo search API.
#[derive(Debug, Clone)]
pub struct PexelsClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

/// A photo as returned to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PexelsPhoto {
    pub id: u64,
    pub width: u64,
    pub height: u64,
    /// Page of the photo on pexels.com.
    pub url: String,
    pub photographer: String,
    pub photographer_url: String,
    pub src: PhotoSources,
    #[serde(default)]
    pub alt: String,
}

/// Rendered sizes of a photo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoSources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large2x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

impl PexelsPhoto {
    fn area(&self) -> u64 {
        self.width.saturating_mul(self.height)
    }

    /// Best display URL: `large2x`, then `large`, then `medium`.
    pub fn display_url(&self) -> Option<&str> {
        self.src
            .large2x
            .as_deref()
            .or(self.src.large.as_deref())
            .or(self.src.medium.as_deref())
    }
}

impl PexelsClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_PEXELS_BASE_URL.to_string(),
        }
    }

    /// Build a client from the server config, if a key is configured.
    pub fn from_config(config: &ServerConfig) -> Option<Self> {
        let key = config.pexels_api_key.as_ref()?;
        Some(Self::new(key.clone()).with_base_url(&config.pexels_base_url))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Search landscape photos for `term`.
    ///
    /// Returns the three largest results by pixel area, largest first. Empty
    /// alt text is replaced by the search term.
    pub async fn search(&self, term: &str) -> Result<Vec<PexelsPhoto>> {
        let per_page = PER_PAGE.to_string();
        let params = [
            ("query", term),
            ("per_page", per_page.as_str()),
            ("orientation", "landscape"),
        ];

        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .header("Authorization", &self.api_key)
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Pexels request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream(format!(
                "Pexels API responded with status: {}",
                status.as_u16()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Invalid Pexels response: {e}")))?;

        log::debug!("Pexels returned {} photos for {:?}", body.photos.len(), term);
        Ok(rank_photos(body.photos, term))
    }
}

/// Sort by area, keep the top results, and fill in missing alt text.
fn rank_photos(mut photos: Vec<PexelsPhoto>, term: &str) -> Vec<PexelsPhoto> {
    photos.sort_by_key(|p| std::cmp::Reverse(p.area()));
    photos.truncate(TOP_PHOTOS);
    for photo in &mut photos {
        if photo.alt.trim().is_empty() {
            photo.alt = term.to_string();
        }
    }
    photos
}

/// Turn ranked photos into the image shown on a slide.
///
/// Uses the first photo with a display URL; the others become thumbnails.
pub fn to_resolved_image(photos: &[PexelsPhoto]) -> Option<ResolvedImage> {
    let best = photos.first()?;
    let url = best.display_url()?;

    Some(ResolvedImage {
        url: url.to_string(),
        alt: best.alt.clone(),
        source: ImageSource::Pexels,
        attribution: Some(Attribution {
            photographer: best.photographer.clone(),
            photographer_url: best.photographer_url.clone(),
            source: "Pexels".to_string(),
            source_url: best.url.clone(),
        }),
        thumbnails: photos.iter().filter_map(|p| p.src.small.clone()).collect(),
    })
}
