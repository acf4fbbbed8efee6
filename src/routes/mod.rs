pub mod analyze_routes;
pub mod error_handler;
pub mod history_routes;
pub mod info_routes;
