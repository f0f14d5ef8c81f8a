use chrono::NaiveTime;

use crate::clock::{ClockError, parse_clock_time};

pub type CompetitorId = u32;

/// Kind of an incoming race event, numbered 1-11 in the log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Registered,
    StartTimeAssigned,
    OnStartLine,
    Started,
    OnFiringRange,
    TargetHit,
    OffFiringRange,
    OnPenaltyLaps,
    OffPenaltyLaps,
    LapCompleted,
    CannotContinue,
    /// Any other integer kind. The competitor is still tracked but the event
    /// has no effect.
    Unrecognized(u32),
}

impl EventKind {
    pub const fn from_id(id: u32) -> Self {
        match id {
            1 => Self::Registered,
            2 => Self::StartTimeAssigned,
            3 => Self::OnStartLine,
            4 => Self::Started,
            5 => Self::OnFiringRange,
            6 => Self::TargetHit,
            7 => Self::OffFiringRange,
            8 => Self::OnPenaltyLaps,
            9 => Self::OffPenaltyLaps,
            10 => Self::LapCompleted,
            11 => Self::CannotContinue,
            other => Self::Unrecognized(other),
        }
    }

    pub const fn id(self) -> u32 {
        match self {
            Self::Registered => 1,
            Self::StartTimeAssigned => 2,
            Self::OnStartLine => 3,
            Self::Started => 4,
            Self::OnFiringRange => 5,
            Self::TargetHit => 6,
            Self::OffFiringRange => 7,
            Self::OnPenaltyLaps => 8,
            Self::OffPenaltyLaps => 9,
            Self::LapCompleted => 10,
            Self::CannotContinue => 11,
            Self::Unrecognized(id) => id,
        }
    }
}

/// One line of the incoming event log.
///
/// The timestamp is kept as written; it is parsed when the event is processed
/// so a bad timestamp only skips this event instead of failing the whole log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceEvent {
    pub line_number: u64,
    pub time: String,
    pub kind: EventKind,
    pub competitor_id: CompetitorId,
    pub params: Vec<String>,
}

impl RaceEvent {
    pub fn new(time: impl Into<String>, kind: EventKind, competitor_id: CompetitorId) -> Self {
        Self {
            line_number: 0,
            time: time.into(),
            kind,
            competitor_id,
            params: Vec::new(),
        }
    }

    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn timestamp(&self) -> Result<NaiveTime, ClockError> {
        parse_clock_time(&self.time)
    }

    pub fn param(&self, idx: usize) -> Option<&str> {
        self.params.get(idx).map(String::as_str)
    }

    /// Parameters joined by single spaces (free-text causes).
    pub fn joined_params(&self) -> String {
        self.params.join(" ")
    }
}
