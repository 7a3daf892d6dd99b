// EMS Log Filter - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "EMS Log Filter";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "EmsLogFilter";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Filtering
// =============================================================================

/// Hard upper bound on lines before/after a match.
///
/// Larger windows are clamped by the file bounds anyway; this only keeps
/// the numeric inputs and config values in a sensible range.
pub const MAX_CONTEXT_LINES: usize = 10_000;

/// Default number of context lines before a match.
pub const DEFAULT_LINES_BEFORE: usize = 0;

/// Default number of context lines after a match.
pub const DEFAULT_LINES_AFTER: usize = 0;

// =============================================================================
// Output
// =============================================================================

/// Infix between the source file stem and the timestamp in output names.
pub const OUTPUT_NAME_INFIX: &str = "_results_";

/// Extension of saved output files.
pub const OUTPUT_EXTENSION: &str = "txt";

/// chrono format string for the timestamp part of output file names.
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Number of numeric suffixes tried when the output name already exists.
pub const MAX_OUTPUT_NAME_ATTEMPTS: u32 = 1_000;

// =============================================================================
// Selection memory
// =============================================================================

/// Remembered checkbox state (line-delimited `key=true|false`).
pub const SELECTION_FILE_NAME: &str = "config.txt";

/// Recent checkbox states shown in the "Prev. Filters" dropdown.
pub const HISTORY_FILE_NAME: &str = "checkbox_states.json";

/// Number of previous checkbox states kept in the history.
pub const MAX_SELECTION_HISTORY: usize = 3;

// =============================================================================
// External editor
// =============================================================================

/// Default editor on Windows.
pub const WINDOWS_DEFAULT_EDITOR: &str = r"C:\Program Files\Notepad++\notepad++.exe";

/// Default opener on macOS.
pub const MACOS_DEFAULT_EDITOR: &str = "open";

/// Default opener on Linux and other Unix systems.
pub const UNIX_DEFAULT_EDITOR: &str = "xdg-open";

// =============================================================================
// UI defaults
// =============================================================================

/// Default number of key checkboxes per grid row.
pub const DEFAULT_CHECKBOX_COLUMNS: usize = 4;

/// Minimum configurable checkbox columns.
pub const MIN_CHECKBOX_COLUMNS: usize = 1;

/// Maximum configurable checkbox columns.
pub const MAX_CHECKBOX_COLUMNS: usize = 8;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a log line included in debug output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
