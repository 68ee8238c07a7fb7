//! Heuristic segmentation of free text into slide sections.
//!
//! Used when no AI provider is available. Text goes through an ordered
//! pipeline of passes; the first pass that finds any sections wins and the
//! rest are skipped. Passes never merge their results.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::{ParsedDocument, Section};

/// Regex to strip a leading list marker from a body line.
static LIST_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-•*]\s*").unwrap());

/// Regex to split text into blank-line-delimited paragraphs.
static PARAGRAPH_BREAK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Regex to split text into sentences.
static SENTENCE_BREAK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+\s+").unwrap());

/// Regex capturing the leading sentence of a paragraph and the remainder.
static LEADING_SENTENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^.!?]+[.!?])\s*([\s\S]*)").unwrap());

/// Regex to strip terminal punctuation from a heading.
static TRAILING_PUNCTUATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+$").unwrap());

/// Number of leading non-blank lines searched for a title.
const TITLE_SCAN_LINES: usize = 5;

/// Headings and titles must be shorter than this.
const MAX_HEADING_CHARS: usize = 100;

/// Accepted point length range, in characters.
const POINT_CHARS: std::ops::Range<usize> = 15..200;

/// Lines must be longer than this to become the introduction.
const MIN_INTRO_CHARS: usize = 20;

/// Introductions and synthesized points are cut to this many characters.
const SNIPPET_CHARS: usize = 150;

/// Paragraphs shorter than this are ignored by the paragraph pass.
const MIN_PARAGRAPH_CHARS: usize = 30;

/// Maximum points taken from a paragraph or chunk.
const MAX_POINTS: usize = 5;

/// Window size of the chunk pass, in characters.
const CHUNK_CHARS: usize = 500;

/// Leading sentences longer than this get a generated chunk heading.
const MAX_CHUNK_HEADING_CHARS: usize = 50;

/// Point used for a chunk with no qualifying sentences.
const CHUNK_FALLBACK_POINT: &str = "Key information for this section";

/// A segmentation pass. `None` means the pass found no sections.
type SectionPass = fn(&str) -> Option<Vec<Section>>;

/// Passes in the order they are tried.
const PASSES: &[(&str, SectionPass)] = &[
    ("headings", heading_sections),
    ("paragraphs", paragraph_sections),
    ("chunks", chunk_sections),
];

/// Splits free text into a [`ParsedDocument`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSegmenter;

impl TextSegmenter {
    /// Create a new segmenter.
    pub fn new() -> Self {
        Self
    }

    /// Segment text into a title, introduction and sections.
    ///
    /// Never fails. Empty or whitespace-only text yields no sections.
    pub fn segment(&self, text: &str) -> ParsedDocument {
        let lines = non_blank_lines(text);

        let sections = PASSES
            .iter()
            .find_map(|(name, pass)| {
                let sections = pass(text)?;
                log::debug!("{} pass produced {} sections", name, sections.len());
                Some(sections)
            })
            .unwrap_or_default();

        ParsedDocument {
            title: detect_title(&lines),
            introduction: detect_introduction(&lines),
            sections,
        }
    }
}

/// Segment text with a default [`TextSegmenter`].
pub fn segment(text: &str) -> ParsedDocument {
    TextSegmenter::new().segment(text)
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn take_chars(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

fn is_point_length(text: &&str) -> bool {
    POINT_CHARS.contains(&char_len(text))
}

fn non_empty(sections: Vec<Section>) -> Option<Vec<Section>> {
    if sections.is_empty() {
        None
    } else {
        Some(sections)
    }
}

/// Trimmed, non-blank lines.
fn non_blank_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Whether a trimmed line looks like a heading.
///
/// Short, no trailing period, and either starting with an upper-case letter
/// or written entirely in upper case.
fn is_heading(line: &str) -> bool {
    if char_len(line) >= MAX_HEADING_CHARS || line.ends_with('.') {
        return false;
    }

    let starts_upper = line.chars().next().is_some_and(char::is_uppercase);
    starts_upper || line == line.to_uppercase()
}

fn detect_title(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .take(TITLE_SCAN_LINES)
        .find(|l| char_len(l) < MAX_HEADING_CHARS && !l.ends_with('.'))
        .map(|l| l.to_string())
}

/// First substantial line seen before any heading.
fn detect_introduction(lines: &[&str]) -> Option<String> {
    let line = lines
        .iter()
        .take_while(|l| !is_heading(l))
        .find(|l| char_len(l) > MIN_INTRO_CHARS)?;

    if char_len(line) > SNIPPET_CHARS {
        Some(format!("{}...", take_chars(line, SNIPPET_CHARS)))
    } else {
        Some(line.to_string())
    }
}

/// Heading lines open sections; the body lines after them become points.
fn heading_sections(text: &str) -> Option<Vec<Section>> {
    let mut sections = Vec::new();
    let mut current: Option<Section> = None;

    for line in non_blank_lines(text) {
        if is_heading(line) {
            if let Some(done) = current.take().filter(|s| !s.points.is_empty()) {
                sections.push(done);
            }
            current = Some(Section::new(line));
        } else if let Some(section) = current.as_mut() {
            let point = LIST_MARKER_REGEX.replace(line, "");
            let point = point.trim();
            if is_point_length(&point) {
                section.points.push(point.to_string());
            }
        }
    }

    if let Some(done) = current.filter(|s| !s.points.is_empty()) {
        sections.push(done);
    }

    non_empty(sections)
}

/// Sentences of `text` that fall in the point length range, capped.
fn sentence_points<'a>(sentences: impl Iterator<Item = &'a str>) -> Vec<String> {
    sentences
        .map(str::trim)
        .filter(is_point_length)
        .take(MAX_POINTS)
        .map(String::from)
        .collect()
}

/// Each paragraph's leading sentence is a heading, the rest its points.
fn paragraph_sections(text: &str) -> Option<Vec<Section>> {
    let sections = PARAGRAPH_BREAK_REGEX
        .split(text)
        .filter(|p| char_len(p.trim()) >= MIN_PARAGRAPH_CHARS)
        .filter_map(paragraph_section)
        .collect();

    non_empty(sections)
}

fn paragraph_section(paragraph: &str) -> Option<Section> {
    let caps = LEADING_SENTENCE_REGEX.captures(paragraph)?;

    let heading = TRAILING_PUNCTUATION_REGEX
        .replace(caps[1].trim(), "")
        .into_owned();
    if heading.is_empty() {
        return None;
    }

    let remainder = caps[2].trim();
    let mut points = sentence_points(SENTENCE_BREAK_REGEX.split(remainder));
    if points.is_empty() {
        points.push(format!("{}...", take_chars(remainder, SNIPPET_CHARS)));
    }

    Some(Section::with_points(heading, points))
}

/// Fixed-size windows over the raw text, one section per window.
fn chunk_sections(text: &str) -> Option<Vec<Section>> {
    let chars: Vec<char> = text.chars().collect();
    let sections = chars
        .chunks(CHUNK_CHARS)
        .enumerate()
        .filter_map(|(idx, chunk)| chunk_section(idx + 1, &chunk.iter().collect::<String>()))
        .collect();

    non_empty(sections)
}

fn chunk_section(number: usize, chunk: &str) -> Option<Section> {
    let sentences: Vec<&str> = SENTENCE_BREAK_REGEX
        .split(chunk)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    // Punctuation-only chunks split into nothing but still need a section.
    let Some((first, rest)) = sentences.split_first() else {
        if chunk.trim().is_empty() {
            return None;
        }
        return Some(Section::with_points(
            format!("Section {number}"),
            vec![CHUNK_FALLBACK_POINT.to_string()],
        ));
    };

    let heading = if char_len(first) > MAX_CHUNK_HEADING_CHARS {
        format!("Section {number}")
    } else {
        first.to_string()
    };

    let mut points = sentence_points(rest.iter().copied());
    if points.is_empty() {
        points.push(CHUNK_FALLBACK_POINT.to_string());
    }

    Some(Section::with_points(heading, points))
}
