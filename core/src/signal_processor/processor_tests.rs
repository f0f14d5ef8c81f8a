//! Tests for the competitor state machine
//!
//! Covers start/finish gating, shooting accounting and per-event skipping.

use chrono::{NaiveTime, TimeDelta};

use super::processor::{EventError, EventProcessor, process_events};
use super::RaceSignal;
use crate::clock::{parse_clock_time, parse_duration};
use crate::competitor::CompetitorStatus;
use crate::context::RaceConfig;
use crate::event_log::{EventKind, RaceEvent, parse_event_log};
use crate::report::{LapDetail, generate_reports};

fn config(laps: i64) -> RaceConfig {
    RaceConfig::new(
        laps,
        1000,
        100,
        2,
        NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        parse_duration("00:00:10").unwrap(),
    )
    .unwrap()
}

fn ts(s: &str) -> NaiveTime {
    parse_clock_time(s).unwrap()
}

fn ev(time: &str, kind: u32, competitor_id: u32) -> RaceEvent {
    RaceEvent::new(time, EventKind::from_id(kind), competitor_id)
}

fn ev_p(time: &str, kind: u32, competitor_id: u32, param: &str) -> RaceEvent {
    ev(time, kind, competitor_id).with_params([param])
}

/// Registration, draw at 10:00:10 and an on-time start at 10:00:12.
fn started(competitor_id: u32) -> Vec<RaceEvent> {
    vec![
        ev("10:00:00.000", 1, competitor_id),
        ev_p("10:00:05.000", 2, competitor_id, "10:00:10.000"),
        ev("10:00:08.000", 3, competitor_id),
        ev("10:00:12.000", 4, competitor_id),
    ]
}

/// One range visit with the given number of hits.
fn shooting(competitor_id: u32, range: &str, hits: usize, from_minute: u32) -> Vec<RaceEvent> {
    let at = |sec: u32| format!("10:{:02}:{:02}.000", from_minute, sec);
    let mut events = vec![ev_p(&at(0), 5, competitor_id, range)];
    for target in 1..=hits {
        events.push(ev_p(&at(target as u32 * 5), 6, competitor_id, &target.to_string()));
    }
    events.push(ev(&at(50), 7, competitor_id));
    events
}

// ─────────────────────────────────────────────────────────────────────────────
// End-to-end
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_single_competitor_not_finished_scenario() {
    let mut events = started(1);
    events.extend(shooting(1, "1", 4, 5));
    events.extend([
        ev("10:06:00.000", 8, 1),
        ev("10:07:00.000", 9, 1),
        ev("10:10:00.000", 10, 1),
        ev_p("10:30:05.000", 11, 1, "Injury"),
    ]);

    let outcome = process_events(&config(2), &events);
    assert!(outcome.signals.is_empty());
    assert!(outcome.skipped.is_empty());
    assert_eq!(outcome.roster.len(), 1);

    let comp = outcome.roster.get(1).unwrap();
    assert_eq!(comp.status, CompetitorStatus::NotFinished);
    assert!(comp.registered);
    assert_eq!(comp.assigned_start, Some(ts("10:00:10.000")));
    assert_eq!(comp.actual_start, ts("10:00:12.000"));
    assert_eq!(comp.lap_times, vec![TimeDelta::seconds(588)]);
    assert_eq!(comp.penalty_times, vec![TimeDelta::seconds(60)]);
    assert_eq!(comp.hits.get(&1), Some(&vec![1, 2, 3, 4]));
    assert_eq!(comp.shots.get(&1), Some(&5));
    assert_eq!(comp.outstanding_penalty_laps, 0);

    let reports = generate_reports(&outcome.roster, &config(2));
    let report = &reports[0];
    assert_eq!(report.total_time, "NotFinished");
    assert_eq!(report.lap_details[0].time, "00:09:48.000");
    assert!((report.lap_details[0].speed - 1000.0 / 588.0).abs() < 1e-9);
    assert_eq!(report.lap_details[1], LapDetail::empty());
    assert_eq!(report.penalty_time, "00:01:00.000");
    assert!((report.penalty_speed - 100.0 / 60.0).abs() < 1e-9);
    assert_eq!(report.hits_shots, "4/5");
}

#[test]
fn test_without_cannot_continue_status_stays_started() {
    let mut events = started(1);
    events.push(ev("10:10:00.000", 10, 1));

    let outcome = process_events(&config(2), &events);
    assert_eq!(
        outcome.roster.get(1).unwrap().status,
        CompetitorStatus::Started
    );
    let reports = generate_reports(&outcome.roster, &config(2));
    assert_eq!(reports[0].total_time, "Started");
}

#[test]
fn test_events_from_log_text() {
    let log = "\
[09:05:59.867] 1 1
[09:15:00.841] 2 1 09:30:00.000
[09:29:45.734] 3 1
[09:30:01.005] 4 1
[09:49:31.659] 5 1 1
[09:49:33.123] 6 1 1
[09:49:34.650] 6 1 2
[09:49:35.937] 6 1 4
[09:49:37.364] 6 1 5
[09:49:38.339] 7 1
[09:49:55.915] 8 1
[09:51:48.391] 9 1
[09:59:03.872] 10 1
[09:59:03.872] 11 1 Lost in the forest
";
    let events = parse_event_log(log.as_bytes()).unwrap();
    let config = RaceConfig::new(
        2,
        3651,
        50,
        1,
        ts("09:30:00.000"),
        parse_duration("00:00:30").unwrap(),
    )
    .unwrap();

    let outcome = process_events(&config, &events);
    assert!(outcome.signals.is_empty());

    let reports = generate_reports(&outcome.roster, &config);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].total_time, "NotFinished");
    assert_eq!(reports[0].lap_details[0].time, "00:29:02.867");
    assert_eq!(reports[0].penalty_time, "00:01:52.476");
    assert_eq!(reports[0].hits_shots, "4/5");
}

// ─────────────────────────────────────────────────────────────────────────────
// Start gating
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_late_start_disqualifies() {
    let events = vec![
        ev("10:00:00.000", 1, 1),
        ev_p("10:00:05.000", 2, 1, "10:00:10.000"),
        ev("10:00:20.001", 4, 1),
    ];

    let outcome = process_events(&config(1), &events);
    assert_eq!(
        outcome.signals,
        vec![RaceSignal::Disqualified {
            competitor_id: 1,
            timestamp: ts("10:00:20.001"),
        }]
    );
    let comp = outcome.roster.get(1).unwrap();
    assert_eq!(comp.status, CompetitorStatus::NotStarted);
    assert_eq!(comp.actual_start, ts("10:00:20.001"));
}

#[test]
fn test_start_exactly_at_tolerance_is_on_time() {
    let events = vec![
        ev_p("10:00:05.000", 2, 1, "10:00:10.000"),
        ev("10:00:20.000", 4, 1),
    ];

    let outcome = process_events(&config(1), &events);
    assert!(outcome.signals.is_empty());
    assert_eq!(
        outcome.roster.get(1).unwrap().status,
        CompetitorStatus::Started
    );
}

#[test]
fn test_early_start_is_on_time() {
    let events = vec![
        ev_p("10:00:05.000", 2, 1, "10:00:10.000"),
        ev("10:00:07.000", 4, 1),
    ];
    let outcome = process_events(&config(1), &events);
    assert!(outcome.signals.is_empty());
}

#[test]
fn test_start_without_draw_is_never_late() {
    let outcome = process_events(&config(1), &[ev("10:00:07.000", 4, 1)]);
    assert!(outcome.signals.is_empty());
    let comp = outcome.roster.get(1).unwrap();
    assert_eq!(comp.status, CompetitorStatus::Started);
    assert_eq!(comp.assigned_start, None);
    assert_eq!(comp.actual_start, ts("10:00:07.000"));
}

#[test]
fn test_rejected_draw_leaves_start_unchecked() {
    let events = vec![
        ev_p("10:00:05.000", 2, 1, "noon"),
        ev("23:59:59.000", 4, 1),
    ];
    let outcome = process_events(&config(1), &events);
    assert_eq!(outcome.skipped.len(), 1);
    assert!(outcome.signals.is_empty());
    assert_eq!(
        outcome.roster.get(1).unwrap().status,
        CompetitorStatus::Started
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Finish gating
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_clean_race_finishes_on_last_lap() {
    let mut events = started(1);
    events.extend(shooting(1, "1", 5, 5));
    events.push(ev("10:10:00.000", 10, 1));
    events.extend(shooting(1, "2", 5, 15));
    events.push(ev("10:20:00.000", 10, 1));

    let outcome = process_events(&config(2), &events);
    assert_eq!(
        outcome.signals,
        vec![RaceSignal::Finished {
            competitor_id: 1,
            timestamp: ts("10:20:00.000"),
        }]
    );

    let comp = outcome.roster.get(1).unwrap();
    assert_eq!(comp.status, CompetitorStatus::Finished);
    assert_eq!(
        comp.lap_times,
        vec![TimeDelta::seconds(588), TimeDelta::seconds(600)]
    );

    let reports = generate_reports(&outcome.roster, &config(2));
    assert_eq!(reports[0].total_time, "00:19:48.000");
    assert_eq!(reports[0].hits_shots, "10/10");
}

#[test]
fn test_outstanding_penalty_blocks_finish() {
    let mut events = started(1);
    events.extend(shooting(1, "1", 3, 5));
    // Only one of two penalty laps run
    events.extend([ev("10:06:00.000", 8, 1), ev("10:06:30.000", 9, 1)]);
    events.push(ev("10:10:00.000", 10, 1));

    let outcome = process_events(&config(1), &events);
    assert!(outcome.signals.is_empty());
    let comp = outcome.roster.get(1).unwrap();
    assert_eq!(comp.outstanding_penalty_laps, 1);
    assert_eq!(comp.status, CompetitorStatus::Started);
}

#[test]
fn test_penalty_cleared_before_last_lap_finishes() {
    let mut events = started(1);
    events.extend(shooting(1, "1", 4, 5));
    events.extend([ev("10:06:00.000", 8, 1), ev("10:06:45.500", 9, 1)]);
    events.push(ev("10:10:00.000", 10, 1));

    let outcome = process_events(&config(1), &events);
    assert_eq!(outcome.signals.len(), 1);

    let reports = generate_reports(&outcome.roster, &config(1));
    // 588s lap + 45.5s penalty
    assert_eq!(reports[0].total_time, "00:10:33.500");
    assert_eq!(reports[0].penalty_time, "00:00:45.500");
}

#[test]
fn test_laps_past_the_last_do_not_finish_again() {
    let mut events = started(1);
    events.extend([ev("10:10:00.000", 10, 1), ev("10:20:00.000", 10, 1)]);

    let outcome = process_events(&config(1), &events);
    assert_eq!(outcome.signals.len(), 1);
    let comp = outcome.roster.get(1).unwrap();
    assert_eq!(comp.lap_times.len(), 2);
    assert_eq!(comp.current_lap_index, 1);
    assert_eq!(comp.status, CompetitorStatus::Finished);
}

#[test]
fn test_cannot_continue_overrides_finished() {
    let mut events = started(1);
    events.push(ev("10:10:00.000", 10, 1));
    events.push(ev_p("10:11:00.000", 11, 1, "Disputed"));

    let outcome = process_events(&config(1), &events);
    assert_eq!(outcome.signals.len(), 1);
    assert_eq!(
        outcome.roster.get(1).unwrap().status,
        CompetitorStatus::NotFinished
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Shooting
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_range_reentry_overwrites_shot_budget() {
    let mut events = started(1);
    events.extend(shooting(1, "1", 2, 5));
    events.extend(shooting(1, "1", 5, 15));

    let outcome = process_events(&config(2), &events);
    let comp = outcome.roster.get(1).unwrap();
    assert_eq!(comp.shots.get(&1), Some(&5));
    assert_eq!(comp.hits.get(&1).unwrap().len(), 7);
    // 3 misses on the first visit, then 5 - 7 on the second
    assert_eq!(comp.outstanding_penalty_laps, 1);

    let reports = generate_reports(&outcome.roster, &config(2));
    assert_eq!(reports[0].hits_shots, "7/5");
}

#[test]
fn test_hit_before_range_entry_is_recorded_on_range_zero() {
    let events = vec![ev_p("10:05:00.000", 6, 1, "3"), ev("10:05:10.000", 7, 1)];

    let outcome = process_events(&config(1), &events);
    let comp = outcome.roster.get(1).unwrap();
    assert_eq!(comp.hits.get(&0), Some(&vec![3]));
    assert_eq!(comp.outstanding_penalty_laps, -1);
}

#[test]
fn test_range_beyond_firing_lines_still_applies() {
    let outcome = process_events(&config(1), &[ev_p("10:05:00.000", 5, 1, "7")]);
    let comp = outcome.roster.get(1).unwrap();
    assert_eq!(comp.current_firing_range, 7);
    assert_eq!(comp.shots.get(&7), Some(&5));
}

// ─────────────────────────────────────────────────────────────────────────────
// Skipped events
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_bad_timestamp_skips_event_but_tracks_competitor() {
    let events = vec![ev("10:00:xx.000", 1, 5), ev("10:00:01.000", 1, 6)];

    let outcome = process_events(&config(1), &events);
    assert_eq!(outcome.roster.len(), 2);
    assert_eq!(
        outcome.roster.get(5).unwrap().status,
        CompetitorStatus::NotStarted
    );
    assert!(!outcome.roster.get(5).unwrap().registered);
    assert_eq!(
        outcome.roster.get(6).unwrap().status,
        CompetitorStatus::Registered
    );
    assert!(matches!(
        outcome.skipped.as_slice(),
        [EventError::InvalidTimestamp {
            competitor_id: 5,
            ..
        }]
    ));
}

#[test]
fn test_bad_parameters_skip_only_that_event() {
    let events = vec![
        ev_p("10:00:05.000", 2, 1, "soon"),
        ev_p("10:05:00.000", 5, 1, "first"),
        ev_p("10:05:01.000", 5, 1, "1"),
        ev_p("10:05:05.000", 6, 1, "x"),
        ev("10:05:06.000", 6, 1),
        ev_p("10:05:07.000", 6, 1, "2"),
    ];

    let outcome = process_events(&config(1), &events);
    assert_eq!(outcome.skipped.len(), 4);
    assert!(matches!(
        &outcome.skipped[0],
        EventError::InvalidParameter {
            kind: EventKind::StartTimeAssigned,
            value,
            ..
        } if value == "soon"
    ));
    assert!(matches!(
        &outcome.skipped[3],
        EventError::MissingParameter {
            kind: EventKind::TargetHit,
            ..
        }
    ));

    let comp = outcome.roster.get(1).unwrap();
    assert_eq!(comp.assigned_start, None);
    assert_eq!(comp.hits.get(&1), Some(&vec![2]));
}

#[test]
fn test_unrecognized_kind_only_creates_competitor() {
    let outcome = process_events(&config(1), &[ev("10:00:00.000", 32, 9)]);
    assert!(outcome.skipped.is_empty());
    assert!(outcome.signals.is_empty());
    assert_eq!(
        outcome.roster.get(9).unwrap().status,
        CompetitorStatus::NotStarted
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Ordering
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_out_of_order_timestamps_give_negative_durations() {
    let events = vec![
        ev_p("10:00:05.000", 2, 1, "10:00:10.000"),
        ev("10:00:12.000", 4, 1),
        ev("10:00:02.000", 10, 1),
    ];

    let outcome = process_events(&config(2), &events);
    assert_eq!(
        outcome.roster.get(1).unwrap().lap_times,
        vec![TimeDelta::seconds(-10)]
    );
}

#[test]
fn test_competitors_are_independent() {
    let mut events = started(1);
    events.extend(started(2));
    events.push(ev("10:09:00.000", 10, 2));
    events.push(ev("10:10:00.000", 10, 1));

    let mut processor = EventProcessor::new(config(1));
    let signals: Vec<RaceSignal> = events
        .iter()
        .filter_map(|e| processor.process_event(e).unwrap())
        .collect();

    assert_eq!(
        signals.iter().map(|s| s.competitor_id()).collect::<Vec<_>>(),
        vec![2, 1]
    );
    assert_eq!(processor.roster().len(), 2);

    let reports = generate_reports(&processor.into_roster(), &config(1));
    assert_eq!(reports[0].competitor_id, 2);
    assert_eq!(reports[0].total_time, "00:08:48.000");
    assert_eq!(reports[1].total_time, "00:09:48.000");
}
