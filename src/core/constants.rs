// Constants shared by the engine, the store and the HTTP layer

// CSV layout: timestamp,value
pub const CSV_DELIMITER: char = ',';

// Only this declared content type is accepted for uploads
pub const CSV_CONTENT_TYPE: &str = "text/csv";

// Multipart field carrying the upload
pub const UPLOAD_FIELD: &str = "file";

// Most recent records kept by the history store
pub const RETENTION_LIMIT: u64 = 10;

// History listing page size
pub const HISTORY_PAGE_SIZE: u32 = 5;

// Retained uploads: tmp_<uuid>.csv
pub const RETAINED_FILE_PREFIX: &str = "tmp_";
pub const RETAINED_FILE_EXTENSION: &str = "csv";

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024; // 50 MiB
