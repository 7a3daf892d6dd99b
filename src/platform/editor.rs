// EMS Log Filter - platform/editor.rs
//
// Opening the saved output in an external editor.
//
// The save workflow only sees the `OpenInEditor` trait, so tests and the
// `--no-open` flag never depend on an installed application.
//
// Platform defaults:
// - **Windows**: Notepad++ at its standard install location.
// - **macOS**: `open`, which hands the file to the default text editor.
// - **Linux / other**: `xdg-open`.
//
// The editor is spawned detached; the UI never waits for it to exit.

use crate::platform::config::AppConfig;
use crate::util::constants;
use crate::util::error::EditorError;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Something that can show a saved file to the user.
pub trait OpenInEditor {
    fn open(&self, path: &Path) -> Result<(), EditorError>;
}

/// Launches an external program with the file path as the last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalEditor {
    pub program: PathBuf,

    /// Arguments placed before the file path.
    pub args: Vec<String>,
}

impl ExternalEditor {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// The platform's default editor.
    pub fn platform_default() -> Self {
        Self::new(default_program(), Vec::new())
    }
}

impl Default for ExternalEditor {
    fn default() -> Self {
        Self::platform_default()
    }
}

impl OpenInEditor for ExternalEditor {
    fn open(&self, path: &Path) -> Result<(), EditorError> {
        // An absolute program path can be checked up front; bare names are
        // resolved through PATH by the spawn itself.
        if self.program.is_absolute() && !self.program.exists() {
            tracing::warn!(program = %self.program.display(), "Editor not installed");
            return Err(EditorError::NotFound {
                program: self.program.clone(),
            });
        }

        match Command::new(&self.program).args(&self.args).arg(path).spawn() {
            Ok(child) => {
                tracing::info!(
                    program = %self.program.display(),
                    file = %path.display(),
                    pid = child.id(),
                    "Opened output in editor"
                );
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(program = %self.program.display(), error = %e, "Editor not found");
                Err(EditorError::NotFound {
                    program: self.program.clone(),
                })
            }
            Err(e) => {
                tracing::warn!(program = %self.program.display(), error = %e, "Editor launch failed");
                Err(EditorError::Launch {
                    program: self.program.clone(),
                    source: e,
                })
            }
        }
    }
}

/// Does nothing. Used for `--no-open`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEditor;

impl OpenInEditor for NoEditor {
    fn open(&self, path: &Path) -> Result<(), EditorError> {
        tracing::debug!(file = %path.display(), "Editor launch disabled");
        Ok(())
    }
}

/// Editor chosen by config.toml, or `NoEditor` when opening is disabled.
pub fn configured_editor(config: &AppConfig, disabled: bool) -> Box<dyn OpenInEditor + Send> {
    if disabled || !config.open_after_save {
        return Box::new(NoEditor);
    }
    match &config.editor_program {
        Some(program) => Box::new(ExternalEditor::new(program.clone(), config.editor_args.clone())),
        None => Box::new(ExternalEditor::platform_default()),
    }
}

fn default_program() -> &'static str {
    if cfg!(target_os = "windows") {
        constants::WINDOWS_DEFAULT_EDITOR
    } else if cfg!(target_os = "macos") {
        constants::MACOS_DEFAULT_EDITOR
    } else {
        constants::UNIX_DEFAULT_EDITOR
    }
}
