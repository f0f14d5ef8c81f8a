use chrono::{NaiveTime, TimeDelta};
use hashbrown::HashMap;
use serde::Serialize;
use std::fmt;

use crate::event_log::CompetitorId;

/// Shots granted on every firing range visit.
pub const SHOTS_PER_VISIT: u32 = 5;

/// Race status of a competitor.
///
/// `NotStarted` is both the initial value and the status of a competitor
/// disqualified for a late start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum CompetitorStatus {
    #[default]
    NotStarted,
    Registered,
    Started,
    Finished,
    NotFinished,
}

impl CompetitorStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "NotStarted",
            Self::Registered => "Registered",
            Self::Started => "Started",
            Self::Finished => "Finished",
            Self::NotFinished => "NotFinished",
        }
    }
}

impl fmt::Display for CompetitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything accumulated for one competitor over a run.
///
/// Times that were never set stay at midnight (`NaiveTime::MIN`), except the
/// drawn start, which stays `None` until a draw is logged.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitorState {
    pub id: CompetitorId,
    pub registered: bool,
    pub assigned_start: Option<NaiveTime>,
    pub actual_start: NaiveTime,
    /// One entry per completed main lap, in lap order
    pub lap_times: Vec<TimeDelta>,
    /// One entry per penalty lap exit
    pub penalty_times: Vec<TimeDelta>,
    /// Hit target ids per firing range
    pub hits: HashMap<u32, Vec<u32>>,
    /// Shot budget per firing range, overwritten on every visit
    pub shots: HashMap<u32, u32>,
    pub status: CompetitorStatus,
    pub current_lap_index: i64,
    /// Misses not yet cleared by penalty laps. Compared to zero when the
    /// last lap is completed; may go negative on inconsistent input.
    pub outstanding_penalty_laps: i64,
    pub current_firing_range: u32,
    pub last_penalty_entry: NaiveTime,
    pub last_lap_boundary: NaiveTime,
}

impl CompetitorState {
    pub fn new(id: CompetitorId) -> Self {
        Self {
            id,
            registered: false,
            assigned_start: None,
            actual_start: NaiveTime::MIN,
            lap_times: Vec::new(),
            penalty_times: Vec::new(),
            hits: HashMap::new(),
            shots: HashMap::new(),
            status: CompetitorStatus::NotStarted,
            current_lap_index: -1,
            outstanding_penalty_laps: 0,
            current_firing_range: 0,
            last_penalty_entry: NaiveTime::MIN,
            last_lap_boundary: NaiveTime::MIN,
        }
    }

    pub fn total_lap_time(&self) -> TimeDelta {
        self.lap_times.iter().copied().sum()
    }

    pub fn total_penalty_time(&self) -> TimeDelta {
        self.penalty_times.iter().copied().sum()
    }

    pub fn total_hits(&self) -> usize {
        self.hits.values().map(Vec::len).sum()
    }

    pub fn total_shots(&self) -> u32 {
        self.shots.values().sum()
    }

    /// Misses on the current range: shot budget minus recorded hits.
    pub fn misses_on_current_range(&self) -> i64 {
        let shots = self
            .shots
            .get(&self.current_firing_range)
            .copied()
            .unwrap_or(0) as i64;
        let hits = self
            .hits
            .get(&self.current_firing_range)
            .map_or(0, Vec::len) as i64;
        shots - hits
    }
}
