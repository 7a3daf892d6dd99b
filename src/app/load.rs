// EMS Log Filter - app/load.rs
//
// Loading a log file: read, parse, and hand the result to the UI.
//
// Architecture:
//   - `load_log_file` is the synchronous operation (used by headless mode
//     and tests).
//   - `LoadManager` lives on the UI thread and runs `load_log_file` on a
//     single background thread so large files do not freeze the window.
//   - Results come back as `LoadProgress` messages over an mpsc channel.
//
// There is no cancellation: a load runs to completion and the UI stays
// disabled until it does. Starting a new load drops the old receiver, so a
// stale result is discarded.

use crate::core::model::ParsedLog;
use crate::core::parser::{self, ParseConfig};
use crate::platform::fs::read_file_lossy;
use crate::util::error::LoadError;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// A parsed file and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedLog {
    pub path: PathBuf,
    pub parsed: ParsedLog,
    pub duration: Duration,
}

/// Messages sent from the load thread to the UI.
#[derive(Debug)]
pub enum LoadProgress {
    Completed(LoadedLog),
    Failed { path: PathBuf, error: LoadError },
}

/// Read and parse `path`.
pub fn load_log_file(path: &Path, config: &ParseConfig) -> Result<LoadedLog, LoadError> {
    let started = Instant::now();
    let content = read_file_lossy(path).map_err(|e| LoadError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let parsed = parser::parse_entries(&content, config).map_err(|e| e.with_path(path))?;
    let duration = started.elapsed();

    tracing::info!(
        file = %path.display(),
        entries = parsed.entries.len(),
        keys = parsed.keys.len(),
        malformed_tokens = parsed.malformed_tokens,
        elapsed_ms = duration.as_millis() as u64,
        "Log file loaded"
    );

    Ok(LoadedLog {
        path: path.to_path_buf(),
        parsed,
        duration,
    })
}

/// Runs a load on a background thread.
pub struct LoadManager {
    progress_rx: Option<mpsc::Receiver<LoadProgress>>,
}

impl LoadManager {
    pub fn new() -> Self {
        Self { progress_rx: None }
    }

    /// Start loading `path`. Spawns a background thread immediately.
    pub fn start_load(&mut self, path: PathBuf, config: ParseConfig) {
        let (tx, rx) = mpsc::channel();
        self.progress_rx = Some(rx);

        tracing::info!(file = %path.display(), "Load started");
        std::thread::spawn(move || {
            let msg = match load_log_file(&path, &config) {
                Ok(loaded) => LoadProgress::Completed(loaded),
                Err(error) => LoadProgress::Failed { path, error },
            };
            // Receiver dropped means the UI moved on; nothing to report.
            let _ = tx.send(msg);
        });
    }

    /// True while a load has been started and has not reported back.
    pub fn is_loading(&self) -> bool {
        self.progress_rx.is_some()
    }

    /// Poll without blocking. Returns the result once, when it arrives.
    pub fn poll(&mut self) -> Option<LoadProgress> {
        let rx = self.progress_rx.as_ref()?;
        match rx.try_recv() {
            Ok(msg) => {
                self.progress_rx = None;
                Some(msg)
            }
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                tracing::error!("Load thread exited without a result");
                self.progress_rx = None;
                None
            }
        }
    }
}

impl Default for LoadManager {
    fn default() -> Self {
        Self::new()
    }
}
