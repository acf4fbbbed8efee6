use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::constants::DEFAULT_MAX_UPLOAD_BYTES;
use crate::core::store::HistoryStore;

#[derive(Clone)]
pub struct AppState {
    // Append + retention and id assignment all happen under this one lock
    pub store: Arc<Mutex<HistoryStore>>,
    pub retain_dir: Arc<PathBuf>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(store: HistoryStore, retain_dir: PathBuf) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            retain_dir: Arc::new(retain_dir),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit;
        self
    }
}
