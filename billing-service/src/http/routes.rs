use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        Query, State,
    },
    http::{header::CONTENT_TYPE, HeaderMap},
    response::Html,
    Json,
};
use billing_client::domain::{ElectricityRecord, NewElectricityRecord};
use serde::{Deserialize, Serialize};

use super::{
    error::{ApiError, Endpoint},
    AppState,
};
use crate::readings::{validate_reading, IncomingReading, ReadingError};

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<ElectricityRecord>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<ElectricityRecord>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub month: Option<String>,
}

/// GET /user
pub async fn get_page(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let body = state.page.load().await?;
    Ok(Html(body))
}

/// GET /users
pub async fn list_all(State(state): State<AppState>) -> Result<Json<UsersResponse>, ApiError> {
    metrics::counter!("billing_requests_total", "endpoint" => Endpoint::ListAll.as_str()).increment(1);

    let users = state
        .store
        .list_all()
        .await
        .map_err(ApiError::storage(Endpoint::ListAll))?;
    Ok(Json(UsersResponse { users }))
}

/// POST /addUser
///
/// A body not declared as JSON is read as `{}`, so it stores an all-NULL row
/// under the pass-through policy.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<CreatedResponse>, ApiError> {
    metrics::counter!("billing_requests_total", "endpoint" => Endpoint::Create.as_str()).increment(1);

    let body = body.map_err(|rejection| ReadingError::MalformedBody(rejection.body_text()))?;
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let reading = IncomingReading::from_body(content_type, &body)?;

    validate_reading(&reading, state.policy)?;

    let record: NewElectricityRecord = reading.into();
    let id = state
        .store
        .create(record)
        .await
        .map_err(ApiError::storage(Endpoint::Create))?;

    metrics::counter!("billing_records_created_total").increment(1);
    tracing::debug!(id, "record created");
    Ok(Json(CreatedResponse { success: true, id }))
}

/// DELETE /deleteLast
///
/// Succeeds whether or not a row was actually removed.
pub async fn delete_last(State(state): State<AppState>) -> Result<Json<DeletedResponse>, ApiError> {
    metrics::counter!("billing_requests_total", "endpoint" => Endpoint::DeleteLast.as_str()).increment(1);

    let removed = state
        .store
        .delete_last()
        .await
        .map_err(ApiError::storage(Endpoint::DeleteLast))?;

    metrics::counter!("billing_records_deleted_total").increment(removed);
    tracing::debug!(removed, "delete last");
    Ok(Json(DeletedResponse { success: true }))
}

/// GET /search?month=yyyy-mm
pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    metrics::counter!("billing_requests_total", "endpoint" => Endpoint::Search.as_str()).increment(1);

    let Query(params) = params.map_err(|rejection| ApiError::InvalidQuery(rejection.body_text()))?;

    let month = params
        .month
        .filter(|m| !m.is_empty())
        .ok_or(ApiError::MissingParameter("month"))?;

    let results = state
        .store
        .search_by_month(&month)
        .await
        .map_err(ApiError::storage(Endpoint::Search))?;
    Ok(Json(SearchResponse { results }))
}
