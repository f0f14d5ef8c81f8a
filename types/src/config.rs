use serde::{Deserialize, Serialize};

/// Race parameters as they appear in the config file.
///
/// Field names follow the file format (`lapLen`, `startDelta`, ...). Values
/// are kept loose here; the core validates them before a race is processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceConfigFile {
    /// Number of main laps
    pub laps: i64,
    /// Length of one main lap, in distance units
    pub lap_len: i64,
    /// Length of one penalty lap, in distance units
    pub penalty_len: i64,
    /// Number of firing lines on the course
    pub firing_lines: i64,
    /// Scheduled start, `HH:MM:SS.mmm`
    pub start: String,
    /// Allowed lateness against the drawn start time, `HH:MM:SS[.mmm]`
    pub start_delta: String,
}
