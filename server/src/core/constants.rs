// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "CareLink";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "carelink";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".carelink";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "carelink.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "CARELINK_CONFIG";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "CARELINK_DEBUG";

/// Environment variable for server host
pub const ENV_HOST: &str = "CARELINK_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "CARELINK_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "CARELINK_LOG";

/// Environment variable to override the data directory
pub const ENV_DATA_DIR: &str = "CARELINK_DATA_DIR";

/// Environment variable for the SQLite database file
pub const ENV_DATABASE_PATH: &str = "CARELINK_DATABASE_PATH";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 8080;

/// API route prefix
pub const API_PREFIX: &str = "/api";

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "carelink.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -64000 = 64MB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// SQLite WAL auto-checkpoint threshold (pages, ~4MB at 1000)
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// WAL checkpoint interval in seconds (5 minutes)
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Pagination
// =============================================================================

/// Page size when the request does not set one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size a request may ask for
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Highest zero-indexed page number accepted
pub const MAX_PAGE: u32 = 100_000;

/// Most `sort` parameters accepted in one request
pub const MAX_SORT_FIELDS: usize = 5;

/// Total-count response header
pub const HEADER_TOTAL_COUNT: &str = "x-total-count";

// =============================================================================
// Request Body Limits
// =============================================================================

/// Default body limit for API requests (1 MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

// =============================================================================
// Shutdown
// =============================================================================

/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
