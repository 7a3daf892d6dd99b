// EMS Log Filter - app/headless.rs
//
// One-shot filtering from the command line: load, build the same snapshot
// the GUI would, and run the save action.

use crate::app::load::load_log_file;
use crate::app::memory::SelectionMemory;
use crate::app::workflow::{save_selected, SaveOutcome, SaveRequest};
use crate::core::model::{FilterCriteria, FilterMode, KeySelectionMode};
use crate::core::parser::ParseConfig;
use crate::core::selection::KeySelection;
use crate::platform::config::AppConfig;
use crate::platform::editor::OpenInEditor;
use crate::util::error::Result;
use std::path::PathBuf;

/// Command-line choices for a headless run. `None` falls back to config.toml.
#[derive(Debug, Clone, Default)]
pub struct HeadlessOptions {
    pub input: PathBuf,

    /// Keys to select. Empty uses the remembered selection.
    pub keys: Vec<String>,

    pub filter_text: Option<String>,
    pub exclude: bool,
    pub ignore_case: bool,
    pub lines_before: Option<usize>,
    pub lines_after: Option<usize>,
    pub key_mode: Option<KeySelectionMode>,
}

/// Load `options.input`, filter it, write the output file and open it.
pub fn run(
    options: &HeadlessOptions,
    config: &AppConfig,
    memory: &mut SelectionMemory,
    editor: &dyn OpenInEditor,
) -> Result<SaveOutcome> {
    let parse_config = ParseConfig {
        anchor_key: config.anchor_key.clone(),
    };
    let loaded = load_log_file(&options.input, &parse_config)?;

    for key in &options.keys {
        if !loaded.parsed.keys.contains(key) {
            tracing::warn!(key = %key, "Selected key does not occur in the log");
        }
    }

    // Same shape as the GUI: remembered state updated with this file's keys.
    let mut selection: KeySelection = memory.current().clone();
    if !options.keys.is_empty() {
        for key in loaded.parsed.keys.iter() {
            selection.set(key, options.keys.iter().any(|k| k == key));
        }
    }

    let selected_keys = if options.keys.is_empty() {
        loaded
            .parsed
            .keys
            .iter()
            .filter(|key| selection.is_checked(key))
            .map(str::to_string)
            .collect()
    } else {
        options.keys.clone()
    };

    let criteria = FilterCriteria {
        selected_keys,
        filter_text: options.filter_text.clone().filter(|t| !t.is_empty()),
        filter_mode: if options.exclude {
            FilterMode::Exclude
        } else {
            FilterMode::Include
        },
        case_sensitive: config.case_sensitive && !options.ignore_case,
        lines_before: options.lines_before.unwrap_or(config.lines_before),
        lines_after: options.lines_after.unwrap_or(config.lines_after),
        key_mode: options.key_mode.unwrap_or(config.key_mode),
    };
    tracing::debug!(?criteria, "Headless filter criteria");

    let request = SaveRequest {
        source: &loaded.path,
        entries: &loaded.parsed.entries,
        criteria: &criteria,
        selection: &selection,
        timestamp: chrono::Local::now(),
    };
    Ok(save_selected(&request, memory, editor)?)
}
