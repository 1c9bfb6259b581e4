//! Constants for session storage keys and directory names

/// Directory names
pub const APP_ROOT_DIR: &str = ".storefront-search";
pub const SESSIONS_DIR: &str = "sessions";

/// File names
pub const CONFIG_FILE: &str = "config.toml";
pub const SESSION_FILE_EXTENSION: &str = "json";

/// Session storage key holding the JSON-encoded recent search list
pub const RECENT_SEARCH_KEY: &str = "recent-search-key";

/// Maximum number of recent searches kept per session
pub const RECENT_SEARCH_LIMIT: usize = 5;

/// Byte budget of a browser session storage area
pub const DEFAULT_SESSION_QUOTA_BYTES: usize = 5 * 1024 * 1024;
