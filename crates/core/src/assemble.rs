//! Assembly of bounded slide decks from titles and parsed documents.
//!
//! The assembler is the local fallback used when no AI provider answers.
//! Whatever it builds is cut to a fixed number of slides.

use crate::segment::TextSegmenter;
use crate::types::{renumber, InputMethod, ParsedDocument, Slide};

/// Default maximum number of slides in a deck.
pub const DEFAULT_MAX_SLIDES: usize = 4;

/// Default maximum number of points copied from a section.
pub const DEFAULT_MAX_POINTS: usize = 5;

/// Headings listed on the summary slide.
const SUMMARY_HEADINGS: usize = 3;

/// Heading used when neither the user nor the document supplies a title.
const DEFAULT_HEADING: &str = "Presentation";

/// Builds slide decks from a title or free text.
#[derive(Debug, Clone)]
pub struct SlideAssembler {
    /// Hard cap on the number of slides returned.
    max_slides: usize,

    /// Cap on points per section slide.
    max_points: usize,

    segmenter: TextSegmenter,
}

impl Default for SlideAssembler {
    fn default() -> Self {
        Self {
            max_slides: DEFAULT_MAX_SLIDES,
            max_points: DEFAULT_MAX_POINTS,
            segmenter: TextSegmenter::new(),
        }
    }
}

impl SlideAssembler {
    /// Create an assembler with the default limits (4 slides, 5 points).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of slides.
    pub fn with_max_slides(mut self, slides: usize) -> Self {
        self.max_slides = slides.max(1); // At least 1 slide
        self
    }

    /// Set the maximum number of points per section slide.
    pub fn with_max_points(mut self, points: usize) -> Self {
        self.max_points = points.max(1);
        self
    }

    /// The configured slide cap.
    pub fn max_slides(&self) -> usize {
        self.max_slides
    }

    /// Build a deck from whatever the user supplied.
    ///
    /// A title-only request gets the three-slide template, non-blank content
    /// is segmented, and anything else yields the placeholder slide.
    pub fn assemble(
        &self,
        title: Option<&str>,
        content: Option<&str>,
        method: InputMethod,
    ) -> Vec<Slide> {
        let title = title.map(str::trim).filter(|t| !t.is_empty());
        let content = content.filter(|c| !c.trim().is_empty());

        let slides = match (method, title, content) {
            (InputMethod::Title, Some(title), _) => self.from_title(title),
            (_, _, Some(content)) => {
                let document = self.segmenter.segment(content);
                self.from_document(&document, title)
            }
            _ => Vec::new(),
        };

        if slides.is_empty() {
            return vec![placeholder(title)];
        }

        self.limit(slides)
    }

    /// Three template slides about a title: intro, key points, conclusion.
    pub fn from_title(&self, title: &str) -> Vec<Slide> {
        let slides = vec![
            Slide::new(
                1,
                title,
                vec![
                    format!("Introduction to {title}"),
                    "Key concepts and definitions".to_string(),
                    "Overview of main topics".to_string(),
                ],
                title,
            ),
            Slide::new(
                2,
                "Key Points",
                vec![
                    format!("Main point 1 about {title}"),
                    format!("Main point 2 about {title}"),
                    format!("Main point 3 about {title}"),
                ],
                format!("{title} key points"),
            ),
            Slide::new(
                3,
                "Conclusion",
                vec![
                    format!("Summary of {title}"),
                    "Future directions".to_string(),
                    "Questions and discussion".to_string(),
                ],
                format!("{title} conclusion"),
            ),
        ];

        self.limit(slides)
    }

    /// Overview slide, one slide per section, then a summary.
    ///
    /// A supplied title wins over the one detected in the document.
    pub fn from_document(&self, document: &ParsedDocument, title: Option<&str>) -> Vec<Slide> {
        let mut slides = Vec::with_capacity(document.sections.len() + 2);

        let heading = title
            .or(document.title.as_deref())
            .unwrap_or(DEFAULT_HEADING);
        let image_term = document
            .title
            .as_deref()
            .or(title)
            .unwrap_or("presentation");

        slides.push(Slide::new(
            1,
            heading,
            vec![
                document
                    .introduction
                    .clone()
                    .unwrap_or_else(|| "Introduction".to_string()),
                "Key topics covered".to_string(),
                "Generated from content".to_string(),
            ],
            image_term,
        ));

        for (idx, section) in document.sections.iter().enumerate() {
            slides.push(Slide::new(
                idx + 2,
                section.heading.clone(),
                section.points.iter().take(self.max_points).cloned().collect(),
                section.heading.clone(),
            ));
        }

        if !document.sections.is_empty() {
            let mut points = vec!["Key takeaways".to_string()];
            points.extend(
                document
                    .sections
                    .iter()
                    .take(SUMMARY_HEADINGS)
                    .map(|s| s.heading.clone()),
            );
            slides.push(Slide::new(
                document.sections.len() + 2,
                "Summary",
                points,
                "summary",
            ));
        }

        self.limit(slides)
    }

    /// Apply the slide cap and renumber.
    pub fn limit(&self, mut slides: Vec<Slide>) -> Vec<Slide> {
        slides.truncate(self.max_slides);
        renumber(&mut slides);
        slides
    }
}

/// The single slide shown when there is nothing to build from.
pub fn placeholder(title: Option<&str>) -> Slide {
    Slide::new(
        1,
        title.unwrap_or(DEFAULT_HEADING),
        vec![
            "No content was provided".to_string(),
            "Please add more details to generate a complete presentation".to_string(),
            "You can edit this slide".to_string(),
        ],
        "empty presentation",
    )
}
