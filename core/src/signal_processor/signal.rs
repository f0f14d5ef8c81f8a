use chrono::NaiveTime;

use crate::event_log::CompetitorId;

/// Outgoing events derived by the processor. They never appear in the input
/// log; the log format numbers them 32 and 33.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceSignal {
    /// Started later than the drawn start time plus the allowed deviation.
    Disqualified {
        competitor_id: CompetitorId,
        timestamp: NaiveTime,
    },
    /// Completed the last lap with no penalty laps outstanding.
    Finished {
        competitor_id: CompetitorId,
        timestamp: NaiveTime,
    },
}

impl RaceSignal {
    pub const DISQUALIFIED_ID: u32 = 32;
    pub const FINISHED_ID: u32 = 33;

    pub const fn event_id(&self) -> u32 {
        match self {
            Self::Disqualified { .. } => Self::DISQUALIFIED_ID,
            Self::Finished { .. } => Self::FINISHED_ID,
        }
    }

    pub const fn competitor_id(&self) -> CompetitorId {
        match self {
            Self::Disqualified { competitor_id, .. } | Self::Finished { competitor_id, .. } => {
                *competitor_id
            }
        }
    }

    pub const fn timestamp(&self) -> NaiveTime {
        match self {
            Self::Disqualified { timestamp, .. } | Self::Finished { timestamp, .. } => *timestamp,
        }
    }
}
