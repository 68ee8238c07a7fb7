//! HTTP handlers.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use deck_core::{HtmlExporter, InputMethod, ResolvedImage, Slide, Theme};
use deck_pdf::{PdfDocument, PdfParser, MAX_PDF_BYTES};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::images::{placeholder_image, resolve_image};
use crate::AppState;

/// Multipart field carrying the uploaded PDF.
const PDF_FIELD: &str = "pdf";

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// ============================================================================
// Slides
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub input_method: InputMethod,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub slides: Vec<Slide>,
}

/// `POST /api/generate-slides`
pub async fn generate_slides(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = payload?;

    let title = request.title.as_deref().filter(|t| !t.trim().is_empty());
    let content = request.content.as_deref().filter(|c| !c.trim().is_empty());
    if title.is_none() && content.is_none() {
        return Err(ApiError::bad_request("Either title or content is required"));
    }

    log::info!(
        "Generating slides (method {:?}, {} chars of content)",
        request.input_method,
        content.map_or(0, str::len)
    );

    let slides = match &state.openrouter {
        Some(client) => match client.generate(title, content, request.input_method).await {
            Ok(slides) => slides,
            Err(e) => {
                log::warn!("OpenRouter failed, falling back to local processing: {}", e);
                state.assembler.assemble(title, content, request.input_method)
            }
        },
        None => {
            log::debug!("OpenRouter API key not configured, using local processing");
            state.assembler.assemble(title, content, request.input_method)
        }
    };

    Ok(Json(GenerateResponse { slides }))
}

// ============================================================================
// PDF extraction
// ============================================================================

/// `POST /api/extract-pdf`
///
/// Receiving and parsing the upload must finish within
/// [`AppState::pdf_timeout`].
pub async fn extract_pdf(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PdfDocument>, ApiError> {
    let multipart = multipart?;
    let document = with_timeout(state.pdf_timeout, read_and_parse_pdf(multipart)).await?;

    log::debug!("Extracted {} pages", document.pages);
    Ok(Json(document))
}

async fn read_and_parse_pdf(mut multipart: Multipart) -> Result<PdfDocument, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(PDF_FIELD) {
            continue;
        }

        let declared = field.content_type().map(str::to_ascii_lowercase);
        if let Some(declared) = declared.filter(|t| !t.is_empty()) {
            if !declared.contains("pdf") {
                return Err(ApiError::bad_request("Uploaded file is not a PDF")
                    .with_details(format!("Declared type: {declared}")));
            }
        }

        upload = Some(field.bytes().await?);
        break;
    }

    let bytes = upload.ok_or_else(|| ApiError::bad_request("No PDF file provided"))?;
    if bytes.len() > MAX_PDF_BYTES {
        return Err(ApiError::bad_request("File too large. Maximum size is 10MB"));
    }

    log::info!("Extracting text from {} byte PDF", bytes.len());

    let document = tokio::task::spawn_blocking(move || PdfParser::new().parse(&bytes))
        .await
        .map_err(|e| ApiError::internal("Failed to process PDF").with_details(e.to_string()))??;

    Ok(document)
}

/// Run `work`, failing with a 408 [`ApiError`] once `limit` has passed.
pub async fn with_timeout<T>(
    limit: Duration,
    work: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    match tokio::time::timeout(limit, work).await {
        Ok(result) => result,
        Err(_) => {
            log::warn!("Request gave up after {:?}", limit);
            Err(ApiError::new(StatusCode::REQUEST_TIMEOUT, "Request timed out")
                .with_details(format!("Processing took longer than {} seconds", limit.as_secs())))
        }
    }
}

// ============================================================================
// Images
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    pub search_term: Option<String>,
}

impl ImageRequest {
    fn term(self) -> Result<String, ApiError> {
        self.search_term
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::bad_request("Search term is required"))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    #[serde(flatten)]
    pub image: ResolvedImage,
    pub search_term: String,
    pub timestamp: i64,
}

/// `POST /api/image-service`
pub async fn image_service(
    State(state): State<AppState>,
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> Result<Json<ImageResponse>, ApiError> {
    let Json(request) = payload?;
    let term = request.term()?;
    let timestamp = now_ms();

    let image = resolve_image(state.pexels.as_ref(), &term, timestamp).await;

    Ok(Json(ImageResponse {
        image,
        search_term: term,
        timestamp,
    }))
}

/// `POST /api/pexels-images`
///
/// Provider problems are reported in the body with a 200 status so the
/// caller can fall back on its own.
pub async fn pexels_images(
    State(state): State<AppState>,
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let term = request.term()?;

    let Some(client) = &state.pexels else {
        log::debug!("Pexels API key not configured");
        return Ok(Json(json!({
            "error": "Pexels API key not configured",
            "searchTerm": term,
        })));
    };

    let body = match client.search(&term).await {
        Ok(photos) if !photos.is_empty() => json!({
            "photos": photos,
            "searchTerm": term,
            "source": "pexels",
        }),
        Ok(_) => json!({
            "error": "No images found on Pexels",
            "searchTerm": term,
        }),
        Err(e) => {
            log::warn!("Pexels search for {:?} failed: {}", term, e);
            json!({
                "error": "Failed to fetch images from Pexels",
                "details": e.to_string(),
                "searchTerm": term,
            })
        }
    };

    Ok(Json(body))
}

/// `POST /api/placeholder-image`
pub async fn placeholder(
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> Result<Json<ImageResponse>, ApiError> {
    let Json(request) = payload?;
    let term = request.term()?;
    let timestamp = now_ms();

    Ok(Json(ImageResponse {
        image: placeholder_image(&term, timestamp),
        search_term: term,
        timestamp,
    }))
}

// ============================================================================
// Export
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub slides: Vec<Slide>,
    pub theme: Option<String>,
    /// Resolved images keyed by 0-based slide position.
    #[serde(default)]
    pub images: BTreeMap<usize, ResolvedImage>,
    /// Render the PowerPoint-flavoured variant.
    #[serde(default)]
    pub office: bool,
}

/// `POST /api/export-html`
pub async fn export_html(
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    if request.slides.is_empty() {
        return Err(ApiError::bad_request("At least one slide is required"));
    }

    let theme = match request.theme.as_deref() {
        Some(name) => name.parse::<Theme>()?,
        None => Theme::default(),
    };

    let exporter = HtmlExporter::new().with_theme(theme);
    let html = if request.office {
        exporter.export_office(&request.slides, &request.images, now_ms())
    } else {
        exporter.export(&request.slides, &request.images, now_ms())
    };

    Ok(([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html))
}

// ============================================================================
// Health
// ============================================================================

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
