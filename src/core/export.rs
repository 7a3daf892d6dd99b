// EMS Log Filter - core/export.rs
//
// Plain-text output of a filter run and the timestamped output file name.
// Core layer: writes to any Write trait object; only `output_path` looks
// at the filesystem, to avoid clobbering an existing file.

use crate::core::model::FilterResult;
use crate::util::constants;
use crate::util::error::SaveError;
use chrono::{DateTime, TimeZone};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Write every output line followed by `\n`. Returns the number of lines.
pub fn write_result<W: Write>(result: &FilterResult, writer: W) -> io::Result<usize> {
    let mut writer = io::BufWriter::new(writer);
    for line in &result.lines {
        writer.write_all(line.text.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(result.lines.len())
}

/// Output file name for `source` saved at `timestamp`, without collision check.
///
/// `logs/ems.log` at 2024-05-01 10:00:01 -> `logs/ems_results_20240501_100001.txt`.
pub fn output_file_name<Tz: TimeZone>(source: &Path, timestamp: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "log".to_string());
    let dir = source.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!(
        "{stem}{}{}.{}",
        constants::OUTPUT_NAME_INFIX,
        timestamp.format(constants::OUTPUT_TIMESTAMP_FORMAT),
        constants::OUTPUT_EXTENSION
    ))
}

/// Output path next to `source`, adding `_1`, `_2`, ... if the name is taken.
pub fn output_path<Tz: TimeZone>(source: &Path, timestamp: &DateTime<Tz>) -> Result<PathBuf, SaveError>
where
    Tz::Offset: std::fmt::Display,
{
    let base = output_file_name(source, timestamp);
    if !base.exists() {
        return Ok(base);
    }

    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    for n in 1..=constants::MAX_OUTPUT_NAME_ATTEMPTS {
        let candidate = base.with_file_name(format!("{stem}_{n}.{}", constants::OUTPUT_EXTENSION));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }
    Err(SaveError::NoFreeName {
        base,
        attempts: constants::MAX_OUTPUT_NAME_ATTEMPTS,
    })
}
