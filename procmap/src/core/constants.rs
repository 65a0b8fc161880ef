// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "procmap";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".procmap";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "procmap.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "PROCMAP_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "PROCMAP_LOG";

// =============================================================================
// Environment Variables - Remap
// =============================================================================

/// Environment variable for the dataset written to remapped data points
pub const ENV_DATASET: &str = "PROCMAP_DATASET";

/// Environment variable for the process scraper scope name
pub const ENV_SCRAPER: &str = "PROCMAP_SCRAPER";

/// Environment variable toggling process identity enrichment
pub const ENV_ENRICH: &str = "PROCMAP_ENRICH";

// =============================================================================
// Environment Variables - Output
// =============================================================================

/// Environment variable forcing the output encoding
pub const ENV_FORMAT: &str = "PROCMAP_FORMAT";

/// Environment variable for pretty-printed JSON output
pub const ENV_PRETTY: &str = "PROCMAP_PRETTY";

/// Environment variable for the output directory
pub const ENV_OUTPUT_DIR: &str = "PROCMAP_OUTPUT_DIR";
