//! Core slide types, heuristic text segmentation, slide assembly,
//! placeholder images, view state, and HTML export for the deck generator.

pub mod assemble;
pub mod error;
pub mod export;
pub mod image;
pub mod segment;
pub mod types;
pub mod view;

pub use assemble::{SlideAssembler, DEFAULT_MAX_SLIDES};
pub use error::{Error, Result};
pub use export::{HtmlExporter, Theme};
pub use image::{Attribution, ImageSource, ResolvedImage};
pub use segment::TextSegmenter;
pub use types::{InputMethod, ParsedDocument, Section, Slide};
pub use view::PresentationView;
