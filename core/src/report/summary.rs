//! Final per-competitor reports and their ranking.

use chrono::TimeDelta;
use serde::Serialize;
use std::cmp::Ordering;

use biathlon_types::formatting::format_accuracy;

use crate::clock::{format_duration, seconds_f64};
use crate::competitor::{CompetitorState, CompetitorStatus, Roster};
use crate::context::RaceConfig;
use crate::event_log::CompetitorId;

/// Time and average speed of one main lap. Laps that were never run are
/// reported as an empty time with zero speed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LapDetail {
    pub time: String,
    pub speed: f64,
}

impl LapDetail {
    pub fn empty() -> Self {
        Self {
            time: String::new(),
            speed: 0.0,
        }
    }
}

/// Result line for one competitor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub competitor_id: CompetitorId,
    pub status: CompetitorStatus,
    /// Formatted total time for finishers, otherwise the status name
    pub total_time: String,
    /// Raw total time, only for finishers. Ranking uses this, never the text.
    #[serde(skip)]
    pub total_duration: Option<TimeDelta>,
    pub lap_details: Vec<LapDetail>,
    pub penalty_time: String,
    pub penalty_speed: f64,
    pub hits_shots: String,
}

/// Distance over time, or zero when the time is not positive.
fn speed(distance: f64, duration: TimeDelta) -> f64 {
    if duration > TimeDelta::zero() {
        distance / seconds_f64(duration)
    } else {
        0.0
    }
}

/// Build the report for one competitor
pub fn create_report(comp: &CompetitorState, config: &RaceConfig) -> Report {
    let lap_len = f64::from(config.lap_len());
    let mut lap_details: Vec<LapDetail> = comp
        .lap_times
        .iter()
        .map(|&lap| LapDetail {
            time: format_duration(lap),
            speed: speed(lap_len, lap),
        })
        .collect();
    let laps = config.laps() as usize;
    if lap_details.len() < laps {
        lap_details.resize_with(laps, LapDetail::empty);
    }

    let penalty_total = comp.total_penalty_time();
    let penalty_distance = f64::from(config.penalty_len()) * comp.penalty_times.len() as f64;

    let (total_time, total_duration) = if comp.status == CompetitorStatus::Finished {
        let total = comp.total_lap_time() + penalty_total;
        (format_duration(total), Some(total))
    } else {
        (comp.status.to_string(), None)
    };

    Report {
        competitor_id: comp.id,
        status: comp.status,
        total_time,
        total_duration,
        lap_details,
        penalty_time: format_duration(penalty_total),
        penalty_speed: speed(penalty_distance, penalty_total),
        hits_shots: format_accuracy(comp.total_hits(), comp.total_shots()),
    }
}

/// Ranking tier: finishers, then competitors still on the course when the
/// log ended, then NotStarted / NotFinished.
fn rank_tier(report: &Report) -> u8 {
    match report.status {
        CompetitorStatus::Finished if report.total_duration.is_some() => 0,
        CompetitorStatus::NotStarted | CompetitorStatus::NotFinished => 2,
        _ => 1,
    }
}

/// Total order used for the final ranking.
///
/// Finishers ascend by total time. Everyone else keeps their tier and is
/// ordered by competitor id, as are finishers with equal times.
pub fn compare_reports(a: &Report, b: &Report) -> Ordering {
    rank_tier(a)
        .cmp(&rank_tier(b))
        .then_with(|| a.total_duration.cmp(&b.total_duration))
        .then_with(|| a.competitor_id.cmp(&b.competitor_id))
}

pub fn rank_reports(reports: &mut [Report]) {
    reports.sort_by(compare_reports);
}

/// Build and rank the reports for every competitor in the roster
pub fn generate_reports(roster: &Roster, config: &RaceConfig) -> Vec<Report> {
    let mut reports: Vec<Report> = roster.iter().map(|c| create_report(c, config)).collect();
    rank_reports(&mut reports);
    reports
}
