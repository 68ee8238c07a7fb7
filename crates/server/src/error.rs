//! JSON error responses.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// An error returned to API clients as `{ error, details? }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    /// 400 with `message`.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 422 with `message`.
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// 500 with `message`.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<deck_core::Error> for ApiError {
    fn from(err: deck_core::Error) -> Self {
        use deck_core::Error;

        match err {
            Error::InvalidInput(msg) => Self::bad_request(msg),
            Error::PdfParse(details) => {
                Self::unprocessable("Failed to parse PDF content").with_details(details)
            }
            Error::NoText => Self::unprocessable("No text could be extracted from the PDF")
                .with_details("The PDF may be scanned images or protected against text extraction"),
            Error::Upstream(details) => {
                Self::internal("Upstream provider failed").with_details(details)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("Invalid JSON body").with_details(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::bad_request("Failed to parse form data").with_details(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::bad_request("File too large. Maximum size is 10MB");
        }
        Self::bad_request("Failed to parse form data").with_details(err.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            log::error!("{}: {}", self.message, self.details.as_deref().unwrap_or("-"));
        } else {
            log::debug!("Request rejected ({}): {}", self.status, self.message);
        }

        let body = ErrorBody {
            error: &self.message,
            details: self.details.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}
