//! Error types for the viewer's HTTP surface and binary.
//!
//! [`ViewerError`] is what handlers return; its
//! [`IntoResponse`](axum::response::IntoResponse) impl renders a JSON
//! `{ "error", "status" }` body. [`AppError`] is the binary's top-level
//! failure.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fieldgrid_core::{ConfigError, SourceError};
use fieldgrid_render::RenderError;

use crate::server::ServerError;

/// Errors that can occur while answering an operator request.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// No snapshot has been accepted yet, so there is nothing to show.
    #[error("no frame has been rendered yet")]
    NoFrame,

    /// The request path or body was rejected.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// PNG encoding of the surface failed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// A source could not be attached.
    #[error("source error: {0}")]
    Source(#[from] SourceError),
}

impl IntoResponse for ViewerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NoFrame => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) | Self::Source(SourceError::EmptyPlayback) => {
                StatusCode::BAD_REQUEST
            }
            Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Source(_) => StatusCode::BAD_GATEWAY,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Top-level errors of the `fieldgrid-viewer` binary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration or frames file could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The initial source could not be attached.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// The HTTP server failed to bind or serve.
    #[error("server error: {0}")]
    Server(#[from] ServerError),
}
