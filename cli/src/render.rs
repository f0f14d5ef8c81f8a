//! Plain-text rendering of the final report.

use biathlon_core::report::{LapDetail, Report};
use biathlon_types::formatting::format_speed;

fn render_lap(lap: &LapDetail) -> String {
    format!("{{{}, {}}}", lap.time, format_speed(lap.speed))
}

/// One report line: `[total] id [{lap, speed}, ...] penalty speed hits/shots`
pub fn render_report(report: &Report) -> String {
    let laps: Vec<String> = report.lap_details.iter().map(render_lap).collect();
    format!(
        "[{}] {} [{}] {} {} {}",
        report.total_time,
        report.competitor_id,
        laps.join(", "),
        report.penalty_time,
        format_speed(report.penalty_speed),
        report.hits_shots
    )
}
