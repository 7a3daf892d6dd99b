// EMS Log Filter - platform/config.rs
//
// Platform-specific directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::KeySelectionMode;
use crate::util::constants;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for EMS Log Filter configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/emslogfilter/ or %APPDATA%\EmsLogFilter\config\).
    /// Holds config.toml and the remembered checkbox state.
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Use an explicit directory (CLI `--state-dir`).
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[filter]` section.
    pub filter: FilterSection,
    /// `[parsing]` section.
    pub parsing: ParsingSection,
    /// `[editor]` section.
    pub editor: EditorSection,
    /// `[ui]` section.
    pub ui: UiSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[filter]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct FilterSection {
    /// Initial lines-before value.
    pub lines_before: Option<usize>,
    /// Initial lines-after value.
    pub lines_after: Option<usize>,
    /// "project", "require" or "both".
    pub key_mode: Option<String>,
    /// Initial case-sensitivity of the text filter.
    pub case_sensitive: Option<bool>,
}

/// `[parsing]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ParsingSection {
    /// Key marking the start of the key=value section, e.g. "date".
    pub anchor_key: Option<String>,
}

/// `[editor]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct EditorSection {
    /// Editor executable (absolute path or a name on PATH).
    pub program: Option<String>,
    /// Extra arguments placed before the file path.
    pub args: Option<Vec<String>>,
    /// Set false to never launch an editor after saving.
    pub open_after_save: Option<bool>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Key checkboxes per grid row.
    pub checkbox_columns: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Filter --
    pub lines_before: usize,
    pub lines_after: usize,
    pub key_mode: KeySelectionMode,
    pub case_sensitive: bool,

    // -- Parsing --
    pub anchor_key: Option<String>,

    // -- Editor --
    /// Editor override; `None` uses the platform default.
    pub editor_program: Option<PathBuf>,
    pub editor_args: Vec<String>,
    pub open_after_save: bool,

    // -- UI --
    pub checkbox_columns: usize,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            lines_before: constants::DEFAULT_LINES_BEFORE,
            lines_after: constants::DEFAULT_LINES_AFTER,
            key_mode: KeySelectionMode::default(),
            case_sensitive: true,
            anchor_key: None,
            editor_program: None,
            editor_args: Vec::new(),
            open_after_save: true,
            checkbox_columns: constants::DEFAULT_CHECKBOX_COLUMNS,
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first run).
/// If the file is unparseable, returns defaults with a warning; the
/// application still starts but the user is informed.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let msg = format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let (config, mut field_warnings) = validate(raw);
    warnings.append(&mut field_warnings);

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}

/// Validate each raw field against named constants, accumulating all problems.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings = Vec::new();

    // -- Filter: context lines --
    for (name, value, slot) in [
        ("lines_before", raw.filter.lines_before, &mut config.lines_before),
        ("lines_after", raw.filter.lines_after, &mut config.lines_after),
    ] {
        if let Some(lines) = value {
            if lines <= constants::MAX_CONTEXT_LINES {
                *slot = lines;
            } else {
                warnings.push(format!(
                    "[filter] {name} = {lines} is out of range (0-{}). Using default (0).",
                    constants::MAX_CONTEXT_LINES,
                ));
            }
        }
    }

    // -- Filter: key_mode --
    if let Some(ref mode) = raw.filter.key_mode {
        match mode.parse::<KeySelectionMode>() {
            Ok(m) => config.key_mode = m,
            Err(e) => warnings.push(format!("[filter] key_mode: {e}. Using default (project).")),
        }
    }

    if let Some(case_sensitive) = raw.filter.case_sensitive {
        config.case_sensitive = case_sensitive;
    }

    // -- Parsing: anchor_key --
    // Empty means "no anchor".
    if let Some(anchor) = raw.parsing.anchor_key.filter(|a| !a.trim().is_empty()) {
        let anchor = anchor.trim().to_string();
        if anchor.chars().all(|c| c.is_alphanumeric() || c == '_') {
            config.anchor_key = Some(anchor);
        } else {
            warnings.push(format!(
                "[parsing] anchor_key = \"{anchor}\" must be a single word. Ignoring it.",
            ));
        }
    }

    // -- Editor --
    if let Some(program) = raw.editor.program {
        if !program.trim().is_empty() {
            config.editor_program = Some(PathBuf::from(program.trim()));
        }
    }
    if let Some(args) = raw.editor.args {
        config.editor_args = args;
    }
    if let Some(open) = raw.editor.open_after_save {
        config.open_after_save = open;
    }

    // -- UI: checkbox_columns --
    if let Some(cols) = raw.ui.checkbox_columns {
        if (constants::MIN_CHECKBOX_COLUMNS..=constants::MAX_CHECKBOX_COLUMNS).contains(&cols) {
            config.checkbox_columns = cols;
        } else {
            warnings.push(format!(
                "[ui] checkbox_columns = {cols} is out of range ({}-{}). Using default ({}).",
                constants::MIN_CHECKBOX_COLUMNS,
                constants::MAX_CHECKBOX_COLUMNS,
                constants::DEFAULT_CHECKBOX_COLUMNS,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &Path, content: &str) {
        std::fs::write(dir.join(constants::CONFIG_FILE_NAME), content).unwrap();
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_valid_config_applied() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            r#"
[filter]
lines_before = 2
lines_after = 5
key_mode = "require"
case_sensitive = false

[parsing]
anchor_key = "date"

[editor]
program = "/usr/bin/gedit"
args = ["--new-window"]

[ui]
checkbox_columns = 3

[logging]
level = "debug"
"#,
        );
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.lines_before, 2);
        assert_eq!(config.lines_after, 5);
        assert_eq!(config.key_mode, KeySelectionMode::Require);
        assert!(!config.case_sensitive);
        assert_eq!(config.anchor_key.as_deref(), Some("date"));
        assert_eq!(config.editor_program, Some(PathBuf::from("/usr/bin/gedit")));
        assert_eq!(config.editor_args, vec!["--new-window"]);
        assert_eq!(config.checkbox_columns, 3);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_warn_and_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "[filter]\nlines_after = 99999999\nkey_mode = \"sideways\"\n\
             [ui]\ncheckbox_columns = 0\n[parsing]\nanchor_key = \"da te\"\n",
        );
        let (config, warnings) = load_config(dir.path());
        assert_eq!(warnings.len(), 4, "{warnings:?}");
        assert_eq!(config.lines_after, constants::DEFAULT_LINES_AFTER);
        assert_eq!(config.key_mode, KeySelectionMode::Project);
        assert_eq!(config.checkbox_columns, constants::DEFAULT_CHECKBOX_COLUMNS);
        assert_eq!(config.anchor_key, None);
    }

    #[test]
    fn test_unparseable_config_warns() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "this is [not toml");
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);
    }
}
