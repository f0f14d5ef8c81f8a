//! Race configuration loading and validation.
//!
//! The file shape lives in `biathlon-types`; this module decodes it (JSON, or
//! TOML for `.toml` files) and turns it into a validated [`RaceConfig`].

use biathlon_types::RaceConfigFile;
use chrono::{NaiveTime, TimeDelta};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::clock::{ClockError, parse_clock_time, parse_duration};

/// Errors that can occur during config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error in {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("TOML error in {path:?}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: i64 },
    #[error("invalid config: {field}: {source}")]
    InvalidTime {
        field: &'static str,
        source: ClockError,
    },
}

/// Validated race parameters. All counts and lengths are strictly positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceConfig {
    laps: u32,
    lap_len: u32,
    penalty_len: u32,
    firing_lines: u32,
    start: NaiveTime,
    start_delta: TimeDelta,
}

fn positive(field: &'static str, value: i64) -> Result<u32, ConfigError> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or(ConfigError::NotPositive { field, value })
}

impl RaceConfig {
    pub fn new(
        laps: i64,
        lap_len: i64,
        penalty_len: i64,
        firing_lines: i64,
        start: NaiveTime,
        start_delta: TimeDelta,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            laps: positive("laps", laps)?,
            lap_len: positive("lapLen", lap_len)?,
            penalty_len: positive("penaltyLen", penalty_len)?,
            firing_lines: positive("firingLines", firing_lines)?,
            start,
            start_delta,
        })
    }

    pub fn from_file_config(file: &RaceConfigFile) -> Result<Self, ConfigError> {
        let start = parse_clock_time(&file.start).map_err(|source| ConfigError::InvalidTime {
            field: "start",
            source,
        })?;
        let start_delta =
            parse_duration(&file.start_delta).map_err(|source| ConfigError::InvalidTime {
                field: "startDelta",
                source,
            })?;

        Self::new(
            file.laps,
            file.lap_len,
            file.penalty_len,
            file.firing_lines,
            start,
            start_delta,
        )
    }

    pub fn laps(&self) -> u32 {
        self.laps
    }

    pub fn lap_len(&self) -> u32 {
        self.lap_len
    }

    pub fn penalty_len(&self) -> u32 {
        self.penalty_len
    }

    pub fn firing_lines(&self) -> u32 {
        self.firing_lines
    }

    /// Scheduled start of the race.
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    /// Maximum allowed lateness against a competitor's drawn start time.
    pub fn start_delta(&self) -> TimeDelta {
        self.start_delta
    }
}

/// Load and validate a race config file.
pub fn load_config(path: &Path) -> Result<RaceConfig, ConfigError> {
    let file = load_file(path)?;
    let config = RaceConfig::from_file_config(&file)?;
    tracing::debug!(
        laps = config.laps,
        lap_len = config.lap_len,
        penalty_len = config.penalty_len,
        firing_lines = config.firing_lines,
        "Loaded race config from {:?}",
        path
    );
    Ok(config)
}

/// Decode a config file without validating it.
pub fn load_file(path: &Path) -> Result<RaceConfigFile, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    if path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    } else {
        serde_json::from_str(&contents).map_err(|e| ConfigError::Json {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
