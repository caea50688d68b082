use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{page::PageError, readings::ReadingError, store::StoreError};

/// Which operation a storage failure happened in. Each endpoint keeps its own
/// failure body shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ListAll,
    Create,
    DeleteLast,
    Search,
}

impl Endpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ListAll => "list_all",
            Self::Create => "create",
            Self::DeleteLast => "delete_last",
            Self::Search => "search",
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("missing required query parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    #[error("invalid reading: {0}")]
    InvalidReading(#[from] ReadingError),

    #[error("{} failed: {source}", .endpoint.as_str())]
    Storage {
        endpoint: Endpoint,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Page(#[from] PageError),
}

impl ApiError {
    pub fn storage(endpoint: Endpoint) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Storage { endpoint, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingParameter(name) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("missing required query parameter: {name}") })),
            )
                .into_response(),
            Self::InvalidQuery(detail) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("invalid query string: {detail}") })),
            )
                .into_response(),
            Self::InvalidReading(e) => {
                metrics::counter!("billing_readings_rejected_total").increment(1);
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "success": false, "message": e.to_string() })),
                )
                    .into_response()
            }
            Self::Storage { endpoint, source } => {
                tracing::error!(endpoint = endpoint.as_str(), error = %source, "storage operation failed");
                metrics::counter!("billing_storage_errors_total", "endpoint" => endpoint.as_str())
                    .increment(1);

                let body = match endpoint {
                    Endpoint::ListAll => json!({ "error": "failed to query records" }),
                    Endpoint::Search => json!({ "error": "failed to search records" }),
                    Endpoint::Create => json!({ "success": false, "message": "failed to add record" }),
                    Endpoint::DeleteLast => json!({ "success": false }),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            Self::Page(PageError::Missing(path)) => {
                tracing::warn!(path = %path.display(), "page asset missing");
                (StatusCode::NOT_FOUND, "page not found").into_response()
            }
            Self::Page(e @ PageError::Unreadable { .. }) => {
                tracing::error!(error = %e, "failed to read page asset");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
