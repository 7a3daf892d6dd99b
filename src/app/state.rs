// EMS Log Filter - app/state.rs
//
// Application state management. Holds the loaded log, checkbox state,
// filter inputs, and selection memory.
// Owned by the eframe::App implementation; every save takes an immutable
// snapshot of it (`criteria()` / `selection()`).

use crate::app::load::LoadedLog;
use crate::app::memory::SelectionMemory;
use crate::core::model::{FilterCriteria, FilterMode, KeySelectionMode};
use crate::core::parser::ParseConfig;
use crate::core::selection::KeySelection;
use crate::platform::config::AppConfig;
use std::path::PathBuf;

/// One key checkbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCheckbox {
    pub key: String,
    pub checked: bool,
}

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Validated config.toml values.
    pub config: AppConfig,

    /// Remembered checkbox state and history.
    pub memory: SelectionMemory,

    /// Currently loaded log (None before the first load).
    pub loaded: Option<LoadedLog>,

    /// One checkbox per key in the loaded file, in first-seen order.
    pub checkboxes: Vec<KeyCheckbox>,

    /// Filter text input.
    pub filter_text: String,

    /// "Filter out" toggle: exclude entries containing the text.
    pub filter_out: bool,

    pub case_sensitive: bool,

    pub lines_before: usize,

    pub lines_after: usize,

    pub key_mode: KeySelectionMode,

    /// Whether a load is in progress (UI disabled).
    pub loading: bool,

    /// File chosen in the dialog, waiting to be loaded.
    pub pending_load: Option<PathBuf>,

    /// Save button pressed; handled after the frame's panels are drawn.
    pub request_save: bool,

    /// Status message for the status bar.
    pub status_message: String,

    /// Non-fatal warnings (config problems, editor failures, ...).
    pub warnings: Vec<String>,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,
}

impl AppState {
    /// Create initial state from config and loaded selection memory.
    pub fn new(config: AppConfig, memory: SelectionMemory, debug_mode: bool) -> Self {
        Self {
            filter_text: String::new(),
            filter_out: false,
            case_sensitive: config.case_sensitive,
            lines_before: config.lines_before,
            lines_after: config.lines_after,
            key_mode: config.key_mode,
            config,
            memory,
            loaded: None,
            checkboxes: Vec::new(),
            loading: false,
            pending_load: None,
            request_save: false,
            status_message: "No file loaded".to_string(),
            warnings: Vec::new(),
            debug_mode,
        }
    }

    /// Parser settings derived from config.
    pub fn parse_config(&self) -> ParseConfig {
        ParseConfig {
            anchor_key: self.config.anchor_key.clone(),
        }
    }

    /// Replace the loaded log and rebuild the checkboxes, pre-checking the
    /// keys remembered from the last save.
    pub fn apply_loaded(&mut self, loaded: LoadedLog) {
        let remembered = self.memory.current();
        self.checkboxes = loaded
            .parsed
            .keys
            .iter()
            .map(|key| KeyCheckbox {
                key: key.to_string(),
                checked: remembered.is_checked(key),
            })
            .collect();

        self.status_message = format!(
            "Loaded {}: {} entries, {} keys",
            display_name(&loaded.path),
            loaded.parsed.entries.len(),
            loaded.parsed.keys.len()
        );
        if loaded.parsed.malformed_tokens > 0 {
            self.warnings.push(format!(
                "{} malformed key=value tokens were kept as plain values",
                loaded.parsed.malformed_tokens
            ));
        }
        self.loaded = Some(loaded);
        self.loading = false;
    }

    /// Name of the loaded file for the "FileName:" label.
    pub fn file_name(&self) -> Option<String> {
        self.loaded.as_ref().map(|l| display_name(&l.path))
    }

    /// Snapshot of the filter inputs for one save.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            selected_keys: self
                .checkboxes
                .iter()
                .filter(|c| c.checked)
                .map(|c| c.key.clone())
                .collect(),
            filter_text: Some(self.filter_text.clone()).filter(|t| !t.is_empty()),
            filter_mode: if self.filter_out {
                FilterMode::Exclude
            } else {
                FilterMode::Include
            },
            case_sensitive: self.case_sensitive,
            lines_before: self.lines_before,
            lines_after: self.lines_after,
            key_mode: self.key_mode,
        }
    }

    /// Selection to remember: the previous memory updated with every
    /// checkbox of the current file, so keys absent from this file keep
    /// their remembered state.
    pub fn selection(&self) -> KeySelection {
        let mut selection = self.memory.current().clone();
        for checkbox in &self.checkboxes {
            selection.set(&checkbox.key, checkbox.checked);
        }
        selection
    }

    /// Check or uncheck every key.
    pub fn set_all(&mut self, checked: bool) {
        for checkbox in &mut self.checkboxes {
            checkbox.checked = checked;
        }
    }

    /// Number of checked keys.
    pub fn checked_count(&self) -> usize {
        self.checkboxes.iter().filter(|c| c.checked).count()
    }

    /// Labels for the "Prev. Filters" dropdown, most recent first.
    pub fn history_labels(&self) -> Vec<String> {
        (1..=self.memory.history().len())
            .map(|n| format!("Last {n}"))
            .collect()
    }

    /// Apply the `n`-th most recent remembered selection to the checkboxes.
    /// Keys it does not mention are unchecked. Returns false if `n` is out of range.
    pub fn apply_history(&mut self, n: usize) -> bool {
        let Some(selection) = self.memory.recent(n).cloned() else {
            return false;
        };
        for checkbox in &mut self.checkboxes {
            checkbox.checked = selection.is_checked(&checkbox.key);
        }
        self.status_message = format!("Applied previous filter \"Last {}\"", n + 1);
        true
    }

    /// Whether "Save & View" can run.
    pub fn can_save(&self) -> bool {
        self.loaded.is_some() && !self.loading
    }

    /// Record a non-fatal failure: status bar plus warnings list.
    pub fn notify_error(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.status_message = message.clone();
        self.warnings.push(message);
    }
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
