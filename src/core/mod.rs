pub mod analyzer;
pub mod constants;
pub mod error;
pub mod record;
pub mod retain;
pub mod stats;
pub mod store;
