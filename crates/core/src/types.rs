//! Domain types for slides and the intermediate parsed document.

use serde::{Deserialize, Serialize};

/// Point used when a slide would otherwise have no bullets.
pub const FALLBACK_POINT: &str = "Key information for this slide";

/// A single slide in a generated deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// 1-based slide number.
    #[serde(rename = "slide")]
    pub index: usize,

    /// Display title.
    pub heading: String,

    /// Bullet points, in order.
    pub points: Vec<String>,

    /// Search term used to find an illustrative image.
    #[serde(rename = "image")]
    pub image_term: String,
}

impl Slide {
    /// Create a new slide.
    pub fn new(
        index: usize,
        heading: impl Into<String>,
        points: Vec<String>,
        image_term: impl Into<String>,
    ) -> Self {
        Self {
            index,
            heading: heading.into(),
            points,
            image_term: image_term.into(),
        }
    }

    /// Build a slide from loosely-shaped provider output.
    ///
    /// A missing heading becomes `Slide N`, a missing image term falls back to
    /// the heading, and an empty point list gets a single generic bullet.
    pub fn from_generated(
        index: usize,
        heading: Option<String>,
        points: Vec<String>,
        image_term: Option<String>,
    ) -> Self {
        let heading = heading
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| format!("Slide {index}"));

        let mut points: Vec<String> = points
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if points.is_empty() {
            points.push(FALLBACK_POINT.to_string());
        }

        let image_term = image_term
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| heading.clone());

        Self::new(index, heading, points, image_term)
    }
}

/// Renumber slides so indices are 1-based and contiguous.
pub fn renumber(slides: &mut [Slide]) {
    for (i, slide) in slides.iter_mut().enumerate() {
        slide.index = i + 1;
    }
}

/// How the user supplied the presentation source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMethod {
    /// Only a title was given.
    Title,
    /// Text extracted from an uploaded PDF.
    Pdf,
    /// Pasted free text. Unknown methods are treated as text.
    #[default]
    #[serde(other)]
    Text,
}

/// A heading with its bullet points, produced by the segmenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section heading.
    pub heading: String,

    /// Bullet points belonging to this section.
    pub points: Vec<String>,
}

impl Section {
    /// Create a section with no points yet.
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            points: Vec::new(),
        }
    }

    /// Create a section with the given points.
    pub fn with_points(heading: impl Into<String>, points: Vec<String>) -> Self {
        Self {
            heading: heading.into(),
            points,
        }
    }
}

/// Structured view of free text, before it becomes slides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Title candidate found near the top of the text.
    pub title: Option<String>,

    /// First substantial line before any heading, truncated to 150 chars.
    pub introduction: Option<String>,

    /// Sections in document order.
    pub sections: Vec<Section>,
}

impl ParsedDocument {
    /// Whether segmentation found no sections at all.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_serializes_with_wire_names() {
        let slide = Slide::new(1, "Intro", vec!["Point".to_string()], "intro");
        let json = serde_json::to_value(&slide).unwrap();

        assert_eq!(json["slide"], 1);
        assert_eq!(json["heading"], "Intro");
        assert_eq!(json["image"], "intro");
        assert!(json.get("image_term").is_none());
    }

    #[test]
    fn test_from_generated_fills_gaps() {
        let slide = Slide::from_generated(3, None, vec!["  ".to_string()], None);

        assert_eq!(slide.heading, "Slide 3");
        assert_eq!(slide.points, vec![FALLBACK_POINT]);
        assert_eq!(slide.image_term, "Slide 3");
    }

    #[test]
    fn test_from_generated_keeps_provided_values() {
        let slide = Slide::from_generated(
            1,
            Some("Solar Power".to_string()),
            vec!["Panels convert light".to_string()],
            Some("solar panels".to_string()),
        );

        assert_eq!(slide.heading, "Solar Power");
        assert_eq!(slide.points, vec!["Panels convert light"]);
        assert_eq!(slide.image_term, "solar panels");
    }

    #[test]
    fn test_renumber() {
        let mut slides = vec![
            Slide::new(7, "A", vec!["a".to_string()], "a"),
            Slide::new(2, "B", vec!["b".to_string()], "b"),
        ];
        renumber(&mut slides);

        assert_eq!(slides[0].index, 1);
        assert_eq!(slides[1].index, 2);
    }

    #[test]
    fn test_input_method_parsing() {
        let m: InputMethod = serde_json::from_str("\"title\"").unwrap();
        assert_eq!(m, InputMethod::Title);

        let m: InputMethod = serde_json::from_str("\"pdf\"").unwrap();
        assert_eq!(m, InputMethod::Pdf);

        let m: InputMethod = serde_json::from_str("\"text\"").unwrap();
        assert_eq!(m, InputMethod::Text);

        let m: InputMethod = serde_json::from_str("\"markdown\"").unwrap();
        assert_eq!(m, InputMethod::Text);
        assert_eq!(InputMethod::default(), InputMethod::Text);
    }
}
