// Retained raw uploads: one uniquely named file per analysis

use crate::core::constants::{RETAINED_FILE_EXTENSION, RETAINED_FILE_PREFIX};
use crate::core::error::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

pub fn prepare_retain_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        info!("Created retain directory {}", dir.display());
    }
    Ok(())
}

pub fn new_retained_path(dir: &Path) -> PathBuf {
    dir.join(format!(
        "{}{}.{}",
        RETAINED_FILE_PREFIX,
        Uuid::new_v4(),
        RETAINED_FILE_EXTENSION
    ))
}

/// Best-effort removal. Returns whether a file was actually removed.
pub fn discard(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Retained file already gone: {}", path.display());
            false
        }
        Err(e) => {
            warn!("Could not remove retained file {}: {}", path.display(), e);
            false
        }
    }
}
