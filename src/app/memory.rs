// EMS Log Filter - app/memory.rs
//
// Selection memory: remembers which key checkboxes were ticked between runs.
//
// Two files live in the config directory:
// - `config.txt`: the latest selection as `key=true|false` lines.
// - `checkbox_states.json`: the last few distinct selections, oldest first,
//   offered in the "Prev. Filters" dropdown.
//
// Load problems are never fatal: a malformed file is logged, reported as a
// warning and replaced by an empty selection. Writes are atomic.

use crate::core::selection::{decode_selection, encode_selection, KeySelection};
use crate::platform::fs::write_atomic;
use crate::util::constants::{HISTORY_FILE_NAME, MAX_SELECTION_HISTORY, SELECTION_FILE_NAME};
use crate::util::error::ConfigError;
use std::path::{Path, PathBuf};

/// Remembered checkbox state plus its short history.
#[derive(Debug, Clone)]
pub struct SelectionMemory {
    dir: PathBuf,

    /// Selection used to pre-check boxes after a load.
    current: KeySelection,

    /// Previous selections, oldest first, at most `MAX_SELECTION_HISTORY`.
    history: Vec<KeySelection>,

    /// What was last written; identical selections are not re-recorded.
    last_saved: Option<KeySelection>,
}

impl SelectionMemory {
    /// Load both files from `dir`. Returns the memory and non-fatal warnings.
    pub fn load(dir: &Path) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();

        let history = match load_history(&dir.join(HISTORY_FILE_NAME)) {
            Ok(h) => h,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring selection history");
                warnings.push(format!("{e}. Previous filters were reset."));
                Vec::new()
            }
        };

        let current = match load_selection(&dir.join(SELECTION_FILE_NAME)) {
            Ok(Some(selection)) => selection,
            Ok(None) => history.last().cloned().unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring remembered selection");
                warnings.push(format!("{e}. Remembered keys were reset."));
                KeySelection::new()
            }
        };

        tracing::debug!(
            dir = %dir.display(),
            remembered = current.len(),
            history = history.len(),
            "Selection memory loaded"
        );

        let last_saved = history.last().cloned();
        (
            Self {
                dir: dir.to_path_buf(),
                current,
                history,
                last_saved,
            },
            warnings,
        )
    }

    /// Selection to apply to freshly loaded keys.
    pub fn current(&self) -> &KeySelection {
        &self.current
    }

    /// Previous selections, oldest first.
    pub fn history(&self) -> &[KeySelection] {
        &self.history
    }

    /// The `n`-th most recent selection (0 = latest).
    pub fn recent(&self, n: usize) -> Option<&KeySelection> {
        self.history.iter().rev().nth(n)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist `selection`. Returns `Ok(false)` when it equals the last
    /// recorded selection and nothing was written.
    pub fn record(&mut self, selection: &KeySelection) -> Result<bool, ConfigError> {
        if self.last_saved.as_ref() == Some(selection) {
            tracing::debug!("Selection unchanged; skipping save");
            return Ok(false);
        }

        let selection_path = self.dir.join(SELECTION_FILE_NAME);
        write_atomic(&selection_path, encode_selection(selection).as_bytes()).map_err(|e| {
            ConfigError::Io {
                path: selection_path.clone(),
                source: e,
            }
        })?;

        let mut history = self.history.clone();
        history.push(selection.clone());
        if history.len() > MAX_SELECTION_HISTORY {
            history.drain(..history.len() - MAX_SELECTION_HISTORY);
        }

        let history_path = self.dir.join(HISTORY_FILE_NAME);
        let json = serde_json::to_string_pretty(&history).map_err(|e| ConfigError::HistoryParse {
            path: history_path.clone(),
            source: e,
        })?;
        write_atomic(&history_path, json.as_bytes()).map_err(|e| ConfigError::Io {
            path: history_path.clone(),
            source: e,
        })?;

        tracing::info!(
            keys = selection.len(),
            checked = selection.checked_keys().len(),
            history = history.len(),
            "Selection saved"
        );

        self.history = history;
        self.current = selection.clone();
        self.last_saved = Some(selection.clone());
        Ok(true)
    }
}

/// `Ok(None)` when the file does not exist.
fn load_selection(path: &Path) -> Result<Option<KeySelection>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => decode_selection(&text).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn load_history(path: &Path) -> Result<Vec<KeySelection>, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    let mut history: Vec<KeySelection> =
        serde_json::from_str(&text).map_err(|e| ConfigError::HistoryParse {
            path: path.to_path_buf(),
            source: e,
        })?;
    if history.len() > MAX_SELECTION_HISTORY {
        history.drain(..history.len() - MAX_SELECTION_HISTORY);
    }
    Ok(history)
}
