use crate::error::{GitContextError, Result};
use chrono::{DateTime, Local, Timelike};
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// Reads the raw bytes of a file at the given path
///
/// # Errors
///
/// - `GitContextError::FileNotFound` if the path doesn't exist or isn't a file.
/// - `GitContextError::Io` if there's an error reading the file.
pub fn read_file_bytes(path: &Path) -> Result<Vec<u8>> {
    if !path.is_file() {
        return Err(GitContextError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    fs::read(path).map_err(Into::into)
}

/// Reads the contents of a file as text.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD rather than failing the file.
///
/// # Errors
///
/// Same as [`read_file_bytes`].
pub fn read_file_contents(path: &Path) -> Result<String> {
    let bytes = read_file_bytes(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// A file is binary when it holds at least one zero byte anywhere.
pub fn is_binary_content(bytes: &[u8]) -> bool {
    bytes.contains(&0)
}

/// Returns the text after the last `.` of a file name.
///
/// Names without a dot, or whose only leading dot marks a hidden file
/// (`.gitignore`), have no extension and yield an empty string.
pub fn file_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[idx + 1..],
        _ => "",
    }
}

/// Formats a filesystem timestamp as a local ISO date-time,
/// e.g. `2024-01-02T03:04:05` or `2024-01-02T03:04:05.25`.
///
/// Fractional seconds are printed only when non-zero, with trailing zeros trimmed.
pub fn format_timestamp(time: SystemTime) -> String {
    let local = DateTime::<Local>::from(time);
    let mut formatted = local.format("%Y-%m-%dT%H:%M:%S").to_string();

    let nanos = local.nanosecond() % 1_000_000_000;
    if nanos > 0 {
        let fraction = format!("{nanos:09}");
        formatted.push('.');
        formatted.push_str(fraction.trim_end_matches('0'));
    }
    formatted
}
