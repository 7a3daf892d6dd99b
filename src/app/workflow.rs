// EMS Log Filter - app/workflow.rs
//
// The "Save & View" action: filter, write a timestamped file, remember the
// checkbox state, and open the result in the editor.
//
// Only the output write is fatal. Remembering the selection and opening
// the editor are best effort; their failures are logged and reported in the
// outcome so the caller can show a notification.

use crate::app::memory::SelectionMemory;
use crate::core::export;
use crate::core::filter::build_output;
use crate::core::model::{FilterCriteria, LogEntry};
use crate::core::selection::KeySelection;
use crate::platform::editor::OpenInEditor;
use crate::util::error::{ConfigError, EditorError, SaveError};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Everything one save needs, captured at the moment the button is pressed.
pub struct SaveRequest<'a> {
    /// The loaded log file; the output is written next to it.
    pub source: &'a Path,
    pub entries: &'a [LogEntry],
    pub criteria: &'a FilterCriteria,
    /// Checkbox state to remember.
    pub selection: &'a KeySelection,
    pub timestamp: DateTime<Local>,
}

/// What a successful save did.
#[derive(Debug)]
pub struct SaveOutcome {
    pub path: PathBuf,
    pub lines_written: usize,
    pub entries_matched: usize,
    /// True if the selection differed from the last one and was written.
    pub selection_recorded: bool,
    pub memory_error: Option<ConfigError>,
    pub editor_error: Option<EditorError>,
}

impl SaveOutcome {
    /// One-line status message for the UI or terminal.
    pub fn summary(&self) -> String {
        let mut msg = format!(
            "Saved {} lines ({} matching entries) to {}",
            self.lines_written,
            self.entries_matched,
            self.path.display()
        );
        if let Some(e) = &self.memory_error {
            msg.push_str(&format!(". Checkbox state not saved: {e}"));
        }
        if let Some(e) = &self.editor_error {
            msg.push_str(&format!(". {e}"));
        }
        msg
    }
}

/// Run the full save action.
pub fn save_selected(
    request: &SaveRequest<'_>,
    memory: &mut SelectionMemory,
    editor: &dyn OpenInEditor,
) -> Result<SaveOutcome, SaveError> {
    let result = build_output(request.entries, request.criteria);
    let path = export::output_path(request.source, &request.timestamp)?;

    let file = std::fs::File::create(&path).map_err(|e| SaveError::FileWrite {
        path: path.clone(),
        source: e,
    })?;
    let lines_written = export::write_result(&result, file).map_err(|e| SaveError::FileWrite {
        path: path.clone(),
        source: e,
    })?;

    tracing::info!(
        output = %path.display(),
        lines = lines_written,
        matched = result.matched_entries,
        "Filtered output saved"
    );

    let (selection_recorded, memory_error) = match memory.record(request.selection) {
        Ok(recorded) => (recorded, None),
        Err(e) => {
            tracing::warn!(error = %e, "Could not remember checkbox state");
            (false, Some(e))
        }
    };

    let editor_error = editor.open(&path).err();

    Ok(SaveOutcome {
        path,
        lines_written,
        entries_matched: result.matched_entries,
        selection_recorded,
        memory_error,
        editor_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::{parse_entries, ParseConfig};
    use chrono::TimeZone;
    use std::cell::RefCell;

    /// Records the paths it was asked to open.
    #[derive(Default)]
    struct RecordingEditor {
        opened: RefCell<Vec<PathBuf>>,
        fail: bool,
    }

    impl OpenInEditor for RecordingEditor {
        fn open(&self, path: &Path) -> Result<(), EditorError> {
            self.opened.borrow_mut().push(path.to_path_buf());
            if self.fail {
                return Err(EditorError::NotFound {
                    program: PathBuf::from("notepad++.exe"),
                });
            }
            Ok(())
        }
    }

    fn timestamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 10, 0, 1).unwrap()
    }

    #[test]
    fn test_save_writes_file_records_selection_and_opens_editor() {
        let logs = tempfile::tempdir().unwrap();
        let state = tempfile::tempdir().unwrap();
        let source = logs.path().join("ems.log");
        let parsed = parse_entries(
            "time=1 srcname=PC1\ntime=2 srcname=PC2\ntime=3 srcname=PC1\n",
            &ParseConfig::default(),
        )
        .unwrap();
        let criteria = FilterCriteria {
            selected_keys: vec!["srcname".to_string()],
            filter_text: Some("PC2".to_string()),
            ..Default::default()
        };
        let selection: KeySelection = [("time", false), ("srcname", true)].into_iter().collect();
        let (mut memory, _) = SelectionMemory::load(state.path());
        let editor = RecordingEditor::default();

        let request = SaveRequest {
            source: &source,
            entries: &parsed.entries,
            criteria: &criteria,
            selection: &selection,
            timestamp: timestamp(),
        };
        let outcome = save_selected(&request, &mut memory, &editor).unwrap();

        assert_eq!(outcome.path, logs.path().join("ems_results_20240501_100001.txt"));
        assert_eq!(std::fs::read_to_string(&outcome.path).unwrap(), "srcname=PC2\n");
        assert_eq!(outcome.lines_written, 1);
        assert!(outcome.selection_recorded);
        assert!(outcome.editor_error.is_none());
        assert_eq!(editor.opened.borrow().as_slice(), [outcome.path.clone()]);
        assert_eq!(memory.current(), &selection);
    }

    #[test]
    fn test_editor_failure_is_not_fatal() {
        let logs = tempfile::tempdir().unwrap();
        let state = tempfile::tempdir().unwrap();
        let parsed = parse_entries("a=1\n", &ParseConfig::default()).unwrap();
        let (mut memory, _) = SelectionMemory::load(state.path());
        let editor = RecordingEditor {
            fail: true,
            ..Default::default()
        };
        let request = SaveRequest {
            source: &logs.path().join("ems.log"),
            entries: &parsed.entries,
            criteria: &FilterCriteria::default(),
            selection: &KeySelection::new(),
            timestamp: timestamp(),
        };
        let outcome = save_selected(&request, &mut memory, &editor).unwrap();
        assert!(outcome.path.exists());
        assert!(matches!(outcome.editor_error, Some(EditorError::NotFound { .. })));
        assert!(outcome.summary().contains("was not found"));
    }

    #[test]
    fn test_unwritable_output_is_file_write_error() {
        let state = tempfile::tempdir().unwrap();
        let parsed = parse_entries("a=1\n", &ParseConfig::default()).unwrap();
        let (mut memory, _) = SelectionMemory::load(state.path());
        let missing_dir = state.path().join("does").join("not").join("exist");
        let request = SaveRequest {
            source: &missing_dir.join("ems.log"),
            entries: &parsed.entries,
            criteria: &FilterCriteria::default(),
            selection: &KeySelection::new(),
            timestamp: timestamp(),
        };
        let err = save_selected(&request, &mut memory, &RecordingEditor::default()).unwrap_err();
        assert!(matches!(err, SaveError::FileWrite { .. }));
    }

    #[test]
    fn test_empty_result_still_saves_file() {
        let logs = tempfile::tempdir().unwrap();
        let state = tempfile::tempdir().unwrap();
        let parsed = parse_entries("a=1\n", &ParseConfig::default()).unwrap();
        let (mut memory, _) = SelectionMemory::load(state.path());
        let criteria = FilterCriteria {
            filter_text: Some("zzz".to_string()),
            ..Default::default()
        };
        let request = SaveRequest {
            source: &logs.path().join("ems.log"),
            entries: &parsed.entries,
            criteria: &criteria,
            selection: &KeySelection::new(),
            timestamp: timestamp(),
        };
        let outcome = save_selected(&request, &mut memory, &RecordingEditor::default()).unwrap();
        assert_eq!(outcome.lines_written, 0);
        assert_eq!(std::fs::read_to_string(&outcome.path).unwrap(), "");
    }
}
