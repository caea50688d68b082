//! HTTP surface: routing, handlers and error mapping.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{page::PageAsset, readings::ReadingPolicy, store::RecordStore};

pub mod error;
pub mod routes;

pub use error::{ApiError, Endpoint};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub page: PageAsset,
    pub policy: ReadingPolicy,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, page: PageAsset, policy: ReadingPolicy) -> Self {
        Self {
            store,
            page,
            policy,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/user", get(routes::get_page))
        .route("/users", get(routes::list_all))
        .route("/addUser", post(routes::create))
        .route("/deleteLast", delete(routes::delete_last))
        .route("/search", get(routes::search))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
