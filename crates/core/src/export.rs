//! Static HTML export of a slide deck.
//!
//! Produces a self-contained document with one 1280x720 slide per page,
//! inline-styled for the selected theme and ready to print to PDF.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::image::{placeholder_url, PlaceholderTheme, ResolvedImage};
use crate::types::Slide;
use crate::Error;

/// Visual theme of an exported deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Corporate,
    Modern,
    Dark,
    Colorful,
}

/// Colours and fonts of a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeStyle {
    pub name: &'static str,
    pub bg_color: &'static str,
    pub text_color: &'static str,
    pub accent_color: &'static str,
    pub header_bg: &'static str,
    pub font_family: &'static str,
    pub slide_gradient: &'static str,
    pub box_shadow: &'static str,
}

impl Theme {
    /// All themes, in display order.
    pub const ALL: [Theme; 4] = [Theme::Corporate, Theme::Modern, Theme::Dark, Theme::Colorful];

    /// Style values for this theme.
    pub fn style(self) -> ThemeStyle {
        match self {
            Theme::Corporate => ThemeStyle {
                name: "Corporate",
                bg_color: "#ffffff",
                text_color: "#333333",
                accent_color: "#0078d4",
                header_bg: "#f3f3f3",
                font_family: "'Segoe UI', sans-serif",
                slide_gradient: "linear-gradient(to bottom, #f9f9f9, #ffffff)",
                box_shadow: "0 4px 8px rgba(0, 0, 0, 0.05)",
            },
            Theme::Modern => ThemeStyle {
                name: "Modern",
                bg_color: "#f5f5f7",
                text_color: "#1d1d1f",
                accent_color: "#0071e3",
                header_bg: "#ffffff",
                font_family: "'SF Pro Display', 'Helvetica Neue', sans-serif",
                slide_gradient: "linear-gradient(to right, #f5f5f7, #fafafa)",
                box_shadow: "0 10px 20px rgba(0, 0, 0, 0.08)",
            },
            Theme::Dark => ThemeStyle {
                name: "Dark",
                bg_color: "#1e1e1e",
                text_color: "#e0e0e0",
                accent_color: "#75ddff",
                header_bg: "#252525",
                font_family: "'Roboto', sans-serif",
                slide_gradient: "linear-gradient(to bottom, #252525, #1e1e1e)",
                box_shadow: "0 8px 16px rgba(0, 0, 0, 0.3)",
            },
            Theme::Colorful => ThemeStyle {
                name: "Colorful",
                bg_color: "#ffffff",
                text_color: "#333333",
                accent_color: "#ff5722",
                header_bg: "#ffebee",
                font_family: "'Poppins', sans-serif",
                slide_gradient: "linear-gradient(135deg, #fff9c4 0%, #ffffff 100%)",
                box_shadow: "0 6px 12px rgba(255, 87, 34, 0.1)",
            },
        }
    }

    /// Placeholder colours matching this theme.
    pub fn placeholder_theme(self) -> PlaceholderTheme {
        let style = self.style();
        PlaceholderTheme {
            bg_color: style.bg_color,
            text_color: style.text_color,
        }
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "corporate" => Ok(Self::Corporate),
            "modern" => Ok(Self::Modern),
            "dark" => Ok(Self::Dark),
            "colorful" => Ok(Self::Colorful),
            other => Err(Error::InvalidInput(format!("unknown theme: {other}"))),
        }
    }
}

/// Renders decks to HTML.
#[derive(Debug, Clone, Default)]
pub struct HtmlExporter {
    theme: Theme,
}

impl HtmlExporter {
    /// Create an exporter with the corporate theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// The selected theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// URL for the slide at `position`, falling back to a themed placeholder.
    fn image_url(
        &self,
        position: usize,
        slide: &Slide,
        images: &BTreeMap<usize, ResolvedImage>,
        timestamp_ms: i64,
    ) -> String {
        images
            .get(&position)
            .map(|image| image.url.clone())
            .unwrap_or_else(|| {
                placeholder_url(&slide.image_term, self.theme.placeholder_theme(), timestamp_ms)
            })
    }

    /// Render a printable HTML document.
    ///
    /// `images` maps 0-based slide positions to resolved images; slides
    /// without one get a placeholder in the theme's colours.
    pub fn export(
        &self,
        slides: &[Slide],
        images: &BTreeMap<usize, ResolvedImage>,
        timestamp_ms: i64,
    ) -> String {
        let style = self.theme.style();
        let mut html = String::with_capacity(4096 + slides.len() * 1024);

        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Presentation</title>\n");
        html.push_str(&stylesheet(&style));
        html.push_str("</head>\n<body>\n");

        for (position, slide) in slides.iter().enumerate() {
            let image_url = self.image_url(position, slide, images, timestamp_ms);

            html.push_str(&format!(
                "<div class=\"slide-container\">\n<div class=\"slide\">\n\
                 <div class=\"slide-header\"><h1 class=\"slide-title\">{}</h1></div>\n\
                 <div class=\"slide-content\">\n<div class=\"slide-points\">\n<ul class=\"points-list\">\n",
                html_escape::encode_text(&slide.heading)
            ));
            for point in &slide.points {
                html.push_str(&format!("<li>{}</li>\n", html_escape::encode_text(point)));
            }
            html.push_str(&format!(
                "</ul>\n</div>\n<div class=\"slide-image\"><img src=\"{}\" alt=\"{}\"></div>\n</div>\n\
                 <div class=\"slide-number\">Slide {} / {}</div>\n<div class=\"footer\"></div>\n</div>\n</div>\n",
                html_escape::encode_double_quoted_attribute(&image_url),
                html_escape::encode_double_quoted_attribute(&slide.image_term),
                position + 1,
                slides.len()
            ));
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    /// Render HTML that Word and PowerPoint open as a presentation outline.
    pub fn export_office(
        &self,
        slides: &[Slide],
        images: &BTreeMap<usize, ResolvedImage>,
        timestamp_ms: i64,
    ) -> String {
        let mut html = String::from(
            "<html xmlns:v=\"urn:schemas-microsoft-com:vml\" \
             xmlns:o=\"urn:schemas-microsoft-com:office:office\" \
             xmlns:p=\"urn:schemas-microsoft-com:office:powerpoint\" \
             xmlns=\"http://www.w3.org/TR/REC-html40\">\n<head>\n\
             <meta http-equiv=Content-Type content=\"text/html; charset=utf-8\">\n\
             <meta name=ProgId content=PowerPoint.Slide>\n\
             <meta name=Generator content=\"Microsoft PowerPoint\">\n\
             <style>div.slide { page-break-after: always }</style>\n</head>\n<body>\n",
        );

        for (position, slide) in slides.iter().enumerate() {
            let image_url = self.image_url(position, slide, images, timestamp_ms);
            let points: String = slide
                .points
                .iter()
                .map(|p| format!("<li>{}</li>", html_escape::encode_text(p)))
                .collect();

            html.push_str(&format!(
                "<div class=\"slide\">\n<h1>{}</h1>\n<ul>{}</ul>\n<img src=\"{}\" alt=\"{}\" width=\"400\">\n</div>\n",
                html_escape::encode_text(&slide.heading),
                points,
                html_escape::encode_double_quoted_attribute(&image_url),
                html_escape::encode_double_quoted_attribute(&slide.image_term),
            ));
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}

fn stylesheet(style: &ThemeStyle) -> String {
    format!(
        r#"<style>
body {{ font-family: {font}; margin: 0; padding: 0; color: {text}; background-color: #f0f0f0; }}
.slide-container {{ width: 1280px; height: 720px; margin: 2rem auto; overflow: hidden; }}
.slide {{ width: 1280px; height: 720px; page-break-after: always; box-sizing: border-box; background: {gradient}; box-shadow: {shadow}; position: relative; overflow: hidden; }}
.slide-header {{ background-color: {header}; padding: 40px 60px 20px; }}
.slide-title {{ font-size: 44px; margin: 0; color: {accent}; font-weight: 700; }}
.slide-content {{ display: flex; padding: 20px 60px 40px; height: calc(100% - 120px); }}
.slide-points {{ flex: 1; padding-right: 40px; }}
.slide-image {{ flex: 1; display: flex; justify-content: center; align-items: center; padding: 20px; }}
.slide-image img {{ max-width: 100%; max-height: 500px; border-radius: 4px; box-shadow: 0 4px 20px rgba(0, 0, 0, 0.15); }}
.points-list {{ margin: 0; padding: 0; list-style-type: none; }}
.points-list li {{ margin-bottom: 24px; font-size: 28px; line-height: 1.4; position: relative; padding-left: 40px; }}
.points-list li:before {{ content: ""; position: absolute; left: 0; top: 14px; width: 12px; height: 12px; background-color: {accent}; border-radius: 50%; }}
.slide-number {{ position: absolute; bottom: 20px; right: 20px; font-size: 16px; color: {text}80; }}
.footer {{ position: absolute; bottom: 0; left: 0; right: 0; height: 16px; background-color: {accent}; }}
@media print {{
  body {{ background-color: white; }}
  .slide-container {{ margin: 0; }}
  .slide {{ page-break-after: always; margin: 0; box-shadow: none; }}
}}
</style>
"#,
        font = style.font_family,
        text = style.text_color,
        gradient = style.slide_gradient,
        shadow = style.box_shadow,
        header = style.header_bg,
        accent = style.accent_color,
    )
}
