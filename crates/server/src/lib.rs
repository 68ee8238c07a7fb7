//! HTTP service for the deck generator.
//!
//! Routes:
//! - `POST /api/generate-slides` drafts a deck with OpenRouter, falling back
//!   to the local [`SlideAssembler`]
//! - `POST /api/extract-pdf` pulls text out of an uploaded PDF
//! - `POST /api/image-service` finds an image for a slide
//! - `POST /api/pexels-images` and `POST /api/placeholder-image` expose the
//!   two image sources directly
//! - `POST /api/export-html` renders a deck as a printable HTML document
//! - `GET /health`

pub mod config;
pub mod error;
pub mod images;
pub mod providers;
pub mod routes;

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use deck_core::SlideAssembler;
use deck_pdf::MAX_PDF_BYTES;
use tower_http::cors::{Any, CorsLayer};

pub use config::ServerConfig;
pub use error::ApiError;
use providers::{OpenRouterClient, PexelsClient};

/// Time allowed for a PDF upload to be received and parsed.
pub const PDF_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Slack above [`MAX_PDF_BYTES`] for multipart framing.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub openrouter: Option<OpenRouterClient>,
    pub pexels: Option<PexelsClient>,
    pub assembler: SlideAssembler,
    /// Deadline for receiving and parsing a PDF upload.
    pub pdf_timeout: Duration,
}

impl AppState {
    /// Build provider clients for whichever keys are configured.
    pub fn from_config(config: &ServerConfig) -> Self {
        let openrouter = OpenRouterClient::from_config(config);
        let pexels = PexelsClient::from_config(config);

        if openrouter.is_none() {
            log::warn!("OPENROUTER_API_KEY not set, slides will be generated locally");
        }
        if pexels.is_none() {
            log::warn!("PEXELS_API_KEY not set, placeholder images will be used");
        }

        Self {
            openrouter,
            pexels,
            assembler: SlideAssembler::new(),
            pdf_timeout: PDF_REQUEST_TIMEOUT,
        }
    }

    pub fn with_pdf_timeout(mut self, timeout: Duration) -> Self {
        self.pdf_timeout = timeout;
        self
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let extract_pdf = post(routes::extract_pdf)
        .layer::<_, Infallible>(DefaultBodyLimit::max(MAX_PDF_BYTES + MULTIPART_OVERHEAD_BYTES));

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/generate-slides", post(routes::generate_slides))
        .route("/api/extract-pdf", extract_pdf)
        .route("/api/image-service", post(routes::image_service))
        .route("/api/pexels-images", post(routes::pexels_images))
        .route("/api/placeholder-image", post(routes::placeholder))
        .route("/api/export-html", post(routes::export_html))
        .layer(cors)
        .with_state(state)
}
