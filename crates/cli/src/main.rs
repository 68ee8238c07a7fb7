//! CLI tool for turning text and PDF files into slide decks.

use anyhow::{Context, Result};
use clap::Parser;
use deck_core::{HtmlExporter, InputMethod, Slide, SlideAssembler, Theme, DEFAULT_MAX_SLIDES};
use deck_pdf::PdfParser;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Generate a slide deck from a title, text files, or PDFs.
#[derive(Parser, Debug)]
#[command(name = "deck-gen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file(s) (.txt, .md, or .pdf)
    #[arg(required_unless_present = "title")]
    input: Vec<PathBuf>,

    /// Presentation title (builds a title-only deck when no input is given)
    #[arg(short, long)]
    title: Option<String>,

    /// Maximum number of slides per deck
    #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_SLIDES)]
    max_slides: usize,

    /// Write an HTML export to this path instead of printing JSON
    #[arg(long)]
    html: Option<PathBuf>,

    /// Export theme (corporate, modern, dark, colorful)
    #[arg(long, default_value = "corporate")]
    theme: Theme,

    /// Write the PowerPoint-flavoured HTML variant
    #[arg(long, requires = "html")]
    office: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let assembler = SlideAssembler::new().with_max_slides(args.max_slides);

    let slides = if args.input.is_empty() {
        assembler.assemble(args.title.as_deref(), None, InputMethod::Title)
    } else {
        let mut texts = Vec::with_capacity(args.input.len());
        for input_path in &args.input {
            if args.verbose {
                eprintln!("Processing: {}", input_path.display());
            }
            texts.push(read_input(input_path)?);
        }
        let method = if args.input.iter().any(|p| is_pdf(p)) {
            InputMethod::Pdf
        } else {
            InputMethod::Text
        };
        assembler.assemble(args.title.as_deref(), Some(&texts.join("\n\n")), method)
    };

    if args.verbose {
        eprintln!("  Built {} slides", slides.len());
    }

    match &args.html {
        Some(path) => {
            let html = render_html(&slides, args.theme, args.office);
            fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))?;
            if args.verbose {
                eprintln!("Written to: {}", path.display());
            }
        }
        None => {
            let json = serde_json::to_string_pretty(&serde_json::json!({ "slides": slides }))?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Read the text of a single input file.
fn read_input(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to open {}", path.display()))?;

    if is_pdf(path) || PdfParser::looks_like_pdf(&bytes) {
        log::debug!("Parsing {} as PDF", path.display());
        let document = PdfParser::new()
            .parse(&bytes)
            .with_context(|| format!("Failed to extract text from {}", path.display()))?;
        log::debug!("Extracted {} pages", document.pages);
        return Ok(document.text);
    }

    String::from_utf8(bytes).with_context(|| format!("{} is not valid UTF-8 text", path.display()))
}

/// Render slides with placeholder images.
fn render_html(slides: &[Slide], theme: Theme, office: bool) -> String {
    let timestamp_ms = chrono::Utc::now().timestamp_millis();
    let exporter = HtmlExporter::new().with_theme(theme);
    let images = BTreeMap::new();

    if office {
        exporter.export_office(slides, &images, timestamp_ms)
    } else {
        exporter.export(slides, &images, timestamp_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(Path::new("report.PDF")));
        assert!(is_pdf(Path::new("dir/report.pdf")));
        assert!(!is_pdf(Path::new("notes.txt")));
        assert!(!is_pdf(Path::new("pdf")));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["deck-gen", "--title", "Rivers", "--theme", "dark"]).unwrap();

        assert_eq!(args.title.as_deref(), Some("Rivers"));
        assert_eq!(args.theme, Theme::Dark);
        assert_eq!(args.max_slides, DEFAULT_MAX_SLIDES);
        assert!(args.input.is_empty());
    }

    #[test]
    fn test_args_require_input_or_title() {
        assert!(Args::try_parse_from(["deck-gen"]).is_err());
        assert!(Args::try_parse_from(["deck-gen", "--theme", "neon", "a.txt"]).is_err());
    }

    #[test]
    fn test_render_html() {
        let slides = SlideAssembler::new().from_title("Rivers");
        let html = render_html(&slides, Theme::Modern, false);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Slide 3 / 3"));
        assert!(render_html(&slides, Theme::Modern, true).contains("PowerPoint.Slide"));
    }
}
