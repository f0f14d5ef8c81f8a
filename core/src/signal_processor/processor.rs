//! Competitor state machine.
//!
//! The processor folds the ordered event log into a [`Roster`], one state
//! transition per event, and returns the outgoing signals it derives along
//! the way:
//! - `Started` later than the drawn start plus the allowed deviation
//!   disqualifies the competitor (status back to NotStarted). A competitor
//!   with no drawn start is never late.
//! - `LapCompleted` on the last lap with no penalty laps outstanding
//!   finishes the competitor.
//!
//! An event with a bad timestamp or a bad kind-specific parameter is skipped
//! and reported as an [`EventError`]; processing carries on with the next
//! event.

use chrono::NaiveTime;
use thiserror::Error;

use super::RaceSignal;
use crate::clock::{ClockError, duration_between, parse_clock_time};
use crate::competitor::{CompetitorState, CompetitorStatus, Roster, SHOTS_PER_VISIT};
use crate::context::RaceConfig;
use crate::event_log::{CompetitorId, EventKind, RaceEvent};

/// Per-event failure. The event is skipped, the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("line {line_number}: competitor({competitor_id}): {source}")]
    InvalidTimestamp {
        line_number: u64,
        competitor_id: CompetitorId,
        source: ClockError,
    },
    #[error("line {line_number}: competitor({competitor_id}): missing parameter for {kind:?}")]
    MissingParameter {
        line_number: u64,
        competitor_id: CompetitorId,
        kind: EventKind,
    },
    #[error("line {line_number}: competitor({competitor_id}): invalid parameter '{value}' for {kind:?}")]
    InvalidParameter {
        line_number: u64,
        competitor_id: CompetitorId,
        kind: EventKind,
        value: String,
    },
}

/// Result of a complete run over an event log.
#[derive(Debug, Clone, Default)]
pub struct RaceOutcome {
    pub roster: Roster,
    /// Outgoing signals in the order they were derived
    pub signals: Vec<RaceSignal>,
    /// Events that were skipped, in input order
    pub skipped: Vec<EventError>,
}

#[derive(Debug, Clone)]
pub struct EventProcessor {
    config: RaceConfig,
    roster: Roster,
}

impl EventProcessor {
    pub fn new(config: RaceConfig) -> Self {
        Self {
            config,
            roster: Roster::new(),
        }
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Hand the roster over once the log is exhausted.
    pub fn into_roster(self) -> Roster {
        self.roster
    }

    /// Apply one event. Returns the signal it caused, if any.
    pub fn process_event(&mut self, event: &RaceEvent) -> Result<Option<RaceSignal>, EventError> {
        // The competitor is tracked even if the rest of the event is unusable
        let comp = self.roster.entry(event.competitor_id);

        let timestamp = event
            .timestamp()
            .map_err(|source| EventError::InvalidTimestamp {
                line_number: event.line_number,
                competitor_id: event.competitor_id,
                source,
            })?;

        let signal = match event.kind {
            EventKind::Registered => {
                comp.registered = true;
                comp.status = CompetitorStatus::Registered;
                None
            }
            EventKind::StartTimeAssigned => {
                let value = required_param(event)?;
                let assigned =
                    parse_clock_time(value).map_err(|_| invalid_param(event, value))?;
                comp.assigned_start = Some(assigned);
                None
            }
            EventKind::OnStartLine => None,
            EventKind::Started => handle_started(comp, &self.config, timestamp),
            EventKind::OnFiringRange => {
                let range_id = numeric_param(event)?;
                if range_id == 0 || range_id > self.config.firing_lines() {
                    tracing::warn!(
                        competitor_id = comp.id,
                        range_id,
                        firing_lines = self.config.firing_lines(),
                        "Firing range outside configured firing lines"
                    );
                }
                comp.current_firing_range = range_id;
                comp.shots.insert(range_id, SHOTS_PER_VISIT);
                None
            }
            EventKind::TargetHit => {
                let target = numeric_param(event)?;
                comp.hits
                    .entry(comp.current_firing_range)
                    .or_default()
                    .push(target);
                None
            }
            EventKind::OffFiringRange => {
                let misses = comp.misses_on_current_range();
                comp.outstanding_penalty_laps += misses;
                tracing::debug!(
                    competitor_id = comp.id,
                    misses,
                    outstanding = comp.outstanding_penalty_laps,
                    "Left firing range"
                );
                None
            }
            EventKind::OnPenaltyLaps => {
                comp.last_penalty_entry = timestamp;
                None
            }
            EventKind::OffPenaltyLaps => {
                comp.penalty_times
                    .push(duration_between(comp.last_penalty_entry, timestamp));
                comp.outstanding_penalty_laps -= 1;
                None
            }
            EventKind::LapCompleted => handle_lap_completed(comp, &self.config, timestamp),
            EventKind::CannotContinue => {
                comp.status = CompetitorStatus::NotFinished;
                None
            }
            EventKind::Unrecognized(id) => {
                tracing::debug!(
                    line_number = event.line_number,
                    event_id = id,
                    "Ignoring unrecognized event kind"
                );
                None
            }
        };

        if let Some(signal) = &signal {
            tracing::info!(
                competitor_id = signal.competitor_id(),
                event_id = signal.event_id(),
                "Derived outgoing event"
            );
        }

        Ok(signal)
    }
}

fn handle_started(
    comp: &mut CompetitorState,
    config: &RaceConfig,
    timestamp: NaiveTime,
) -> Option<RaceSignal> {
    comp.actual_start = timestamp;
    comp.status = CompetitorStatus::Started;
    comp.last_lap_boundary = timestamp;

    // Without a draw there is nothing to be late against
    let Some(assigned) = comp.assigned_start else {
        tracing::debug!(competitor_id = comp.id, "Started without a drawn start time");
        return None;
    };
    if duration_between(assigned, timestamp) > config.start_delta() {
        comp.status = CompetitorStatus::NotStarted;
        return Some(RaceSignal::Disqualified {
            competitor_id: comp.id,
            timestamp,
        });
    }
    None
}

fn handle_lap_completed(
    comp: &mut CompetitorState,
    config: &RaceConfig,
    timestamp: NaiveTime,
) -> Option<RaceSignal> {
    comp.current_lap_index += 1;

    let lap_start = if comp.current_lap_index == 0 {
        comp.actual_start
    } else {
        comp.last_lap_boundary
    };
    comp.lap_times.push(duration_between(lap_start, timestamp));
    comp.last_lap_boundary = timestamp;

    let last_lap = comp.current_lap_index + 1 == i64::from(config.laps());
    if last_lap && comp.outstanding_penalty_laps == 0 {
        comp.status = CompetitorStatus::Finished;
        return Some(RaceSignal::Finished {
            competitor_id: comp.id,
            timestamp,
        });
    }
    None
}

fn required_param(event: &RaceEvent) -> Result<&str, EventError> {
    event.param(0).ok_or_else(|| EventError::MissingParameter {
        line_number: event.line_number,
        competitor_id: event.competitor_id,
        kind: event.kind,
    })
}

fn numeric_param(event: &RaceEvent) -> Result<u32, EventError> {
    let value = required_param(event)?;
    value.parse().map_err(|_| invalid_param(event, value))
}

fn invalid_param(event: &RaceEvent, value: &str) -> EventError {
    EventError::InvalidParameter {
        line_number: event.line_number,
        competitor_id: event.competitor_id,
        kind: event.kind,
        value: value.to_string(),
    }
}

/// Run a whole event log through a fresh processor.
pub fn process_events(config: &RaceConfig, events: &[RaceEvent]) -> RaceOutcome {
    let mut processor = EventProcessor::new(config.clone());
    let mut signals = Vec::new();
    let mut skipped = Vec::new();

    for event in events {
        match processor.process_event(event) {
            Ok(Some(signal)) => signals.push(signal),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Skipping event");
                skipped.push(e);
            }
        }
    }

    RaceOutcome {
        roster: processor.into_roster(),
        signals,
        skipped,
    }
}
