//! Presentation view state.
//!
//! [`PresentationView`] owns everything the viewer mutates while a deck is
//! on screen: the current slide, per-slide images, loading flags and the
//! last error. Nothing else reads or writes this state directly; callers go
//! through the methods here and perform any network I/O themselves.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::export::{HtmlExporter, Theme};
use crate::image::{image_search_url, ResolvedImage};
use crate::types::Slide;

/// Delay added per slide index when scheduling image loads.
pub const IMAGE_LOAD_STAGGER: Duration = Duration::from_millis(300);

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKey {
    Left,
    Right,
}

/// An image lookup the caller should perform for a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// 0-based slide position.
    pub position: usize,
    /// Term to search for.
    pub search_term: String,
    /// How long to wait before sending the request.
    pub delay: Duration,
}

/// State of a deck being viewed.
#[derive(Debug, Clone)]
pub struct PresentationView {
    slides: Vec<Slide>,
    current: usize,
    images: BTreeMap<usize, ResolvedImage>,
    loading: BTreeSet<usize>,
    error: Option<String>,
    theme: Theme,
}

impl PresentationView {
    /// Start viewing `slides` at the first slide.
    pub fn new(slides: Vec<Slide>) -> Self {
        Self {
            slides,
            current: 0,
            images: BTreeMap::new(),
            loading: BTreeSet::new(),
            error: None,
            theme: Theme::default(),
        }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// 0-based position of the slide on screen.
    pub fn current_position(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.slides.get(self.current)
    }

    pub fn can_go_back(&self) -> bool {
        self.current > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.current + 1 < self.slides.len()
    }

    /// Move to the previous slide. Returns whether the position changed.
    pub fn previous(&mut self) -> bool {
        if self.can_go_back() {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Move to the next slide. Returns whether the position changed.
    pub fn next(&mut self) -> bool {
        if self.can_go_forward() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Jump to a slide. Out-of-range positions are ignored.
    pub fn go_to(&mut self, position: usize) -> bool {
        if position < self.slides.len() {
            self.current = position;
            true
        } else {
            false
        }
    }

    /// Arrow-key navigation.
    pub fn handle_key(&mut self, key: NavigationKey) -> bool {
        match key {
            NavigationKey::Left => self.previous(),
            NavigationKey::Right => self.next(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn image(&self, position: usize) -> Option<&ResolvedImage> {
        self.images.get(&position)
    }

    pub fn is_loading(&self, position: usize) -> bool {
        self.loading.contains(&position)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Image requests for every slide that has no image and is not loading.
    ///
    /// Requests are staggered by [`IMAGE_LOAD_STAGGER`] per slide index so the
    /// provider is not hit with a burst. Completions may arrive in any order.
    pub fn pending_image_loads(&self) -> Vec<ImageRequest> {
        self.slides
            .iter()
            .enumerate()
            .filter(|(pos, _)| !self.images.contains_key(pos) && !self.loading.contains(pos))
            .map(|(pos, slide)| ImageRequest {
                position: pos,
                search_term: slide.image_term.clone(),
                delay: IMAGE_LOAD_STAGGER * pos as u32,
            })
            .collect()
    }

    /// Mark a slide's image as loading.
    ///
    /// Returns the search term to look up, or `None` if the slide does not
    /// exist or a lookup is already in flight.
    pub fn begin_image_load(&mut self, position: usize) -> Option<String> {
        let term = self.slides.get(position)?.image_term.clone();
        if !self.loading.insert(position) {
            return None;
        }
        self.error = None;
        Some(term)
    }

    /// Store the image found for a slide.
    pub fn complete_image_load(&mut self, position: usize, image: ResolvedImage) {
        self.loading.remove(&position);
        if position < self.slides.len() {
            self.images.insert(position, image);
        }
    }

    /// Record a failed lookup and fall back to a placeholder in the theme's
    /// colours.
    pub fn fail_image_load(&mut self, position: usize, message: impl Into<String>, timestamp_ms: i64) {
        self.loading.remove(&position);
        let message = message.into();
        log::warn!("image lookup for slide {} failed: {}", position + 1, message);
        self.error = Some(message);

        if let Some(slide) = self.slides.get(position) {
            let image = ResolvedImage::placeholder(
                &slide.image_term,
                self.theme.placeholder_theme(),
                timestamp_ms,
            );
            self.images.insert(position, image);
        }
    }

    /// Drop the current slide's image and start a new lookup for it.
    pub fn refresh_current_image(&mut self) -> Option<String> {
        if self.loading.contains(&self.current) {
            return None;
        }
        self.images.remove(&self.current);
        self.begin_image_load(self.current)
    }

    /// Google Images search page for the current slide's term.
    pub fn image_search_url(&self) -> Option<String> {
        self.current_slide().map(|s| image_search_url(&s.image_term))
    }

    /// Export the deck with the images found so far.
    pub fn export_html(&self, timestamp_ms: i64) -> String {
        HtmlExporter::new()
            .with_theme(self.theme)
            .export(&self.slides, &self.images, timestamp_ms)
    }
}
