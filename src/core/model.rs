// EMS Log Filter - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// =============================================================================
// Log Entry
// =============================================================================

/// One `key=value` token parsed from a log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub key: String,

    /// Value as written in the source, including surrounding quotes.
    pub value: String,
}

impl Field {
    /// The value with one pair of surrounding double quotes removed.
    pub fn unquoted(&self) -> &str {
        self.value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(&self.value)
    }

    /// The token as it appears in output (`key=value`).
    pub fn token(&self) -> String {
        format!("{}={}", self.key, self.value)
    }
}

/// A single log record. FortiClient EMS logs carry one record per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Zero-based position of the line in the source file.
    pub index: usize,

    /// One-based line number, for display and diagnostics.
    pub line_number: usize,

    /// Original line text without the line terminator.
    pub raw: String,

    /// Text preceding the key=value section (syslog header, `<189>` etc.).
    pub prefix: String,

    /// Parsed fields in first-seen order. Keys are unique.
    pub fields: Vec<Field>,
}

impl LogEntry {
    /// Build an entry with no fields yet.
    pub fn new(index: usize, raw: &str, prefix: &str) -> Self {
        Self {
            index,
            line_number: index + 1,
            raw: raw.to_string(),
            prefix: prefix.to_string(),
            fields: Vec::new(),
        }
    }

    /// Insert a field. A duplicate key overwrites the value in place.
    pub fn insert(&mut self, key: &str, value: &str) {
        match self.fields.iter_mut().find(|f| f.key == key) {
            Some(existing) => existing.value = value.to_string(),
            None => self.fields.push(Field {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Look up a field value by exact key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }

    /// True when the line was blank.
    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

// =============================================================================
// Key set
// =============================================================================

/// Distinct keys across a loaded file, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    ordered: Vec<String>,
    seen: HashSet<String>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key. Returns false if it was already present.
    pub fn insert(&mut self, key: &str) -> bool {
        if self.seen.contains(key) {
            return false;
        }
        self.seen.insert(key.to_string());
        self.ordered.push(key.to_string());
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ordered
    }
}

impl<'a> FromIterator<&'a str> for KeySet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = KeySet::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}

/// Output of parsing a whole file.
#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    /// One entry per physical line, in file order.
    pub entries: Vec<LogEntry>,

    /// All keys seen across `entries`.
    pub keys: KeySet,

    /// Tokens that looked like fields but were malformed (dangling quotes).
    pub malformed_tokens: usize,
}

// =============================================================================
// Filter criteria
// =============================================================================

/// Whether the filter text keeps or drops matching entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Keep entries containing the filter text.
    #[default]
    Include,

    /// Keep entries not containing the filter text ("Filter out").
    Exclude,
}

/// How the selected keys affect the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeySelectionMode {
    /// Every entry is eligible; lines are rewritten to show only selected keys.
    #[default]
    Project,

    /// Only entries carrying a selected key are eligible; lines are kept raw.
    Require,

    /// Eligibility of `Require` with the rendering of `Project`.
    Both,
}

impl KeySelectionMode {
    /// Returns all variants in display order.
    pub fn all() -> &'static [KeySelectionMode] {
        &[
            KeySelectionMode::Project,
            KeySelectionMode::Require,
            KeySelectionMode::Both,
        ]
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            KeySelectionMode::Project => "Show selected keys",
            KeySelectionMode::Require => "Entries with selected keys",
            KeySelectionMode::Both => "Both",
        }
    }

    pub fn requires_key(&self) -> bool {
        matches!(self, KeySelectionMode::Require | KeySelectionMode::Both)
    }

    pub fn projects(&self) -> bool {
        matches!(self, KeySelectionMode::Project | KeySelectionMode::Both)
    }
}

impl std::str::FromStr for KeySelectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "project" => Ok(Self::Project),
            "require" => Ok(Self::Require),
            "both" => Ok(Self::Both),
            other => Err(format!(
                "unknown key mode '{other}' (expected project, require or both)"
            )),
        }
    }
}

impl std::fmt::Display for KeySelectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            KeySelectionMode::Project => "project",
            KeySelectionMode::Require => "require",
            KeySelectionMode::Both => "both",
        })
    }
}

/// Immutable snapshot of everything the user chose for one save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Checked keys, in checkbox order.
    pub selected_keys: Vec<String>,

    /// Literal substring filter. `None` or empty disables the text filter.
    pub filter_text: Option<String>,

    pub filter_mode: FilterMode,

    /// Case-sensitive substring match (default true).
    pub case_sensitive: bool,

    pub lines_before: usize,

    pub lines_after: usize,

    pub key_mode: KeySelectionMode,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            selected_keys: Vec::new(),
            filter_text: None,
            filter_mode: FilterMode::Include,
            case_sensitive: true,
            lines_before: 0,
            lines_after: 0,
            key_mode: KeySelectionMode::Project,
        }
    }
}

impl FilterCriteria {
    /// The filter text if it is set and non-empty.
    pub fn active_filter_text(&self) -> Option<&str> {
        self.filter_text.as_deref().filter(|t| !t.is_empty())
    }
}

// =============================================================================
// Filter result
// =============================================================================

/// One line of the saved output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputLine {
    /// One-based source line this output line came from.
    pub line_number: usize,

    pub text: String,
}

/// Ordered output of a filter run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterResult {
    /// Output lines in source order, each source line at most once.
    pub lines: Vec<OutputLine>,

    /// Number of entries that passed the filters (context lines excluded).
    pub matched_entries: usize,
}

impl FilterResult {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Source line numbers in output order.
    pub fn line_numbers(&self) -> Vec<usize> {
        self.lines.iter().map(|l| l.line_number).collect()
    }
}
