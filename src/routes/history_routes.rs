use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

use crate::core::constants::HISTORY_PAGE_SIZE;
use crate::core::error::{AnalyzerError, Result};
use crate::models::dto::{DetailItem, HistoryItem};
use crate::state::app_state::AppState;

#[derive(Deserialize, Debug, Default)]
pub struct HistoryQuery {
    #[serde(default)]
    pub page: u32,
}

/// =======================
/// ROUTER
/// =======================

pub fn history_routes(state: AppState) -> Router {
    Router::new()
        .route("/history", get(list_history))
        .route("/history/{id}", get(get_detail).delete(delete_record))
        .with_state(state)
}

/// =======================
/// HANDLERS
/// =======================

async fn list_history(
    State(state): State<AppState>,
    query: std::result::Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<HistoryItem>>> {
    let Query(query) = query?;
    debug!("History page {}", query.page);

    let records = {
        let store = state.store.lock().await;
        store.list(query.page, HISTORY_PAGE_SIZE)?
    };

    Ok(Json(records.iter().map(HistoryItem::from).collect()))
}

async fn get_detail(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<DetailItem>> {
    let Path(id) = id?;
    let record = {
        let store = state.store.lock().await;
        store.get(id)?
    };

    let record = record.ok_or(AnalyzerError::RecordNotFound(id))?;
    Ok(Json(DetailItem::from(&record)))
}

async fn delete_record(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<StatusCode> {
    let Path(id) = id?;
    state.store.lock().await.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
