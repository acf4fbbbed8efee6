// CSV statistics service
// Main library entry point

pub mod core;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

use axum::Router;

// Re-export main types
pub use crate::core::analyzer::{analyze, analyze_file};
pub use crate::core::error::{AnalyzerError, Result};
pub use crate::core::record::{AnalysisResult, FileMetadata, HistoryRecord};
pub use crate::core::store::HistoryStore;
pub use state::app_state::AppState;

/// Every HTTP route of the service, bound to one shared state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::info_routes::health_routes())
        .merge(routes::analyze_routes::analyze_routes(state.clone()))
        .merge(routes::history_routes::history_routes(state))
}
