// EMS Log Filter - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Every error keeps its cause so diagnostic logging shows the full chain.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all EMS Log Filter operations.
/// Errors are categorised by the action that produced them.
#[derive(Debug)]
pub enum LogFilterError {
    /// Loading or parsing the source log failed.
    Load(LoadError),

    /// Writing the filtered output failed.
    Save(SaveError),

    /// Opening the output in the external editor failed.
    Editor(EditorError),

    /// Configuration or selection memory could not be read.
    Config(ConfigError),
}

impl fmt::Display for LogFilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(e) => write!(f, "Load error: {e}"),
            Self::Save(e) => write!(f, "Save error: {e}"),
            Self::Editor(e) => write!(f, "Editor error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for LogFilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::Save(e) => Some(e),
            Self::Editor(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

/// Errors raised while reading and parsing the source log.
#[derive(Debug)]
pub enum LoadError {
    /// The log file is missing or unreadable.
    FileRead { path: PathBuf, source: io::Error },

    /// The log contained no non-blank lines.
    EmptyLog { path: Option<PathBuf> },
}

impl LoadError {
    /// Attach the source path to an `EmptyLog` produced by the pure parser.
    pub fn with_path(self, file: &std::path::Path) -> Self {
        match self {
            Self::EmptyLog { path: None } => Self::EmptyLog {
                path: Some(file.to_path_buf()),
            },
            other => other,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileRead { path, source } => {
                write!(f, "Cannot read '{}': {source}", path.display())
            }
            Self::EmptyLog { path: Some(path) } => {
                write!(f, "'{}' contains no log entries", path.display())
            }
            Self::EmptyLog { path: None } => write!(f, "Log contains no entries"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileRead { source, .. } => Some(source),
            Self::EmptyLog { .. } => None,
        }
    }
}

impl From<LoadError> for LogFilterError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

// ---------------------------------------------------------------------------
// Save errors
// ---------------------------------------------------------------------------

/// Errors raised while writing the filtered output.
#[derive(Debug)]
pub enum SaveError {
    /// The output path could not be created or written.
    FileWrite { path: PathBuf, source: io::Error },

    /// Every candidate output name already exists.
    NoFreeName { base: PathBuf, attempts: u32 },
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileWrite { path, source } => {
                write!(f, "Cannot write '{}': {source}", path.display())
            }
            Self::NoFreeName { base, attempts } => write!(
                f,
                "No free output name next to '{}' after {attempts} attempts",
                base.display()
            ),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileWrite { source, .. } => Some(source),
            Self::NoFreeName { .. } => None,
        }
    }
}

impl From<SaveError> for LogFilterError {
    fn from(e: SaveError) -> Self {
        Self::Save(e)
    }
}

// ---------------------------------------------------------------------------
// Editor errors
// ---------------------------------------------------------------------------

/// Errors raised when handing the output file to an external editor.
#[derive(Debug)]
pub enum EditorError {
    /// The editor executable does not exist.
    NotFound { program: PathBuf },

    /// The editor exists but could not be started.
    Launch { program: PathBuf, source: io::Error },
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { program } => {
                write!(f, "Editor '{}' was not found", program.display())
            }
            Self::Launch { program, source } => {
                write!(f, "Failed to launch '{}': {source}", program.display())
            }
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::Launch { source, .. } => Some(source),
        }
    }
}

impl From<EditorError> for LogFilterError {
    fn from(e: EditorError) -> Self {
        Self::Editor(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration and remembered selections.
#[derive(Debug)]
pub enum ConfigError {
    /// A line of the selection file is not `key=true` or `key=false`.
    InvalidSelection { line: usize, content: String },

    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// The selection history JSON is malformed.
    HistoryParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// I/O error reading or writing a config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSelection { line, content } => write!(
                f,
                "Selection line {line} ('{content}') is not of the form key=true|false"
            ),
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::HistoryParse { path, source } => {
                write!(f, "History parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidSelection { .. } => None,
            Self::TomlParse { source, .. } => Some(source),
            Self::HistoryParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for LogFilterError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for EMS Log Filter results.
pub type Result<T> = std::result::Result<T, LogFilterError>;
