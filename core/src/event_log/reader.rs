use memchr::memchr_iter;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::event::RaceEvent;
use super::parser::{LineError, parse_line};

#[derive(Debug, Error)]
pub enum LogError {
    #[error("error reading event log {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("line {line_number}: not valid UTF-8")]
    InvalidUtf8 { line_number: u64 },
    #[error(transparent)]
    Line(#[from] LineError),
}

/// Read and parse a whole event log file.
pub fn read_event_file<P: AsRef<Path>>(path: P) -> Result<Vec<RaceEvent>, LogError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| LogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let events = parse_event_log(&bytes)?;
    tracing::debug!(count = events.len(), path = %path.display(), "Loaded event log");
    Ok(events)
}

/// Parse raw event log bytes into events, in input order.
///
/// Blank lines are skipped. The first malformed line (by position) fails the
/// whole log.
pub fn parse_event_log(bytes: &[u8]) -> Result<Vec<RaceEvent>, LogError> {
    // Find all line boundaries
    let mut line_ranges: Vec<(usize, usize)> = Vec::new();
    let mut start = 0;
    for end in memchr_iter(b'\n', bytes) {
        line_ranges.push((start, end));
        start = end + 1;
    }
    if start < bytes.len() {
        line_ranges.push((start, bytes.len()));
    }

    let parsed: Vec<Result<RaceEvent, LogError>> = line_ranges
        .par_iter()
        .enumerate()
        .filter_map(|(idx, &(start, end))| {
            let line_number = idx as u64 + 1;
            let line = match std::str::from_utf8(&bytes[start..end]) {
                Ok(line) => line.trim_end_matches('\r'),
                Err(_) => return Some(Err(LogError::InvalidUtf8 { line_number })),
            };
            if line.trim().is_empty() {
                return None;
            }
            Some(parse_line(line_number, line).map_err(LogError::from))
        })
        .collect();

    parsed.into_iter().collect()
}
