//! Human-readable narration of a race.
//!
//! Narration is a pure projection of events and signals into text lines of
//! the form `[HH:MM:SS.mmm] message`. It is delivered through
//! [`SignalHandler`] implementations injected into a session; the processor
//! itself never narrates.

use std::io::{self, Write};

use crate::clock::format_clock_time;
use crate::event_log::{EventKind, RaceEvent};
use crate::signal_processor::{RaceSignal, SignalHandler};

/// Message for an input event, `None` for unrecognized kinds.
pub fn describe_event(event: &RaceEvent) -> Option<String> {
    let id = event.competitor_id;
    let param = event.param(0).unwrap_or_default();

    let message = match event.kind {
        EventKind::Registered => format!("The competitor({id}) registered"),
        EventKind::StartTimeAssigned => {
            format!("The start time for competitor({id}) was set by a draw to {param}")
        }
        EventKind::OnStartLine => format!("The competitor({id}) is on the start line"),
        EventKind::Started => format!("The competitor({id}) has started"),
        EventKind::OnFiringRange => format!("The competitor({id}) is on the firing range({param})"),
        EventKind::TargetHit => format!("The target({param}) has been hit by competitor({id})"),
        EventKind::OffFiringRange => format!("The competitor({id}) left the firing range"),
        EventKind::OnPenaltyLaps => format!("The competitor({id}) entered the penalty laps"),
        EventKind::OffPenaltyLaps => format!("The competitor({id}) left the penalty laps"),
        EventKind::LapCompleted => format!("The competitor({id}) ended the main lap"),
        EventKind::CannotContinue => format!(
            "The competitor({id}) can't continue: {}",
            event.joined_params()
        ),
        EventKind::Unrecognized(_) => return None,
    };
    Some(message)
}

pub fn describe_signal(signal: &RaceSignal) -> String {
    match signal {
        RaceSignal::Disqualified { competitor_id, .. } => {
            format!("The competitor({competitor_id}) is disqualified")
        }
        RaceSignal::Finished { competitor_id, .. } => {
            format!("The competitor({competitor_id}) has finished")
        }
    }
}

/// Writes narration lines to any writer (typically the output log file).
///
/// Handler callbacks cannot fail, so the first write error is kept and
/// returned by [`NarrationLog::finish`]; nothing more is written after it.
pub struct NarrationLog<W: Write> {
    writer: W,
    error: Option<io::Error>,
    lines: usize,
}

impl<W: Write> NarrationLog<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
            lines: 0,
        }
    }

    fn write_line(&mut self, time: &str, message: &str) {
        if self.error.is_some() {
            return;
        }
        match writeln!(self.writer, "[{}] {}", time, message) {
            Ok(()) => self.lines += 1,
            Err(e) => {
                tracing::error!(error = %e, "Failed to write narration line");
                self.error = Some(e);
            }
        }
    }

    pub fn lines_written(&self) -> usize {
        self.lines
    }

    /// Flush and return the writer, or the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> SignalHandler for NarrationLog<W> {
    fn handle_event(&mut self, event: &RaceEvent) {
        if let Some(message) = describe_event(event) {
            self.write_line(&event.time, &message);
        }
    }

    fn handle_signal(&mut self, signal: &RaceSignal) {
        let time = format_clock_time(signal.timestamp());
        self.write_line(&time, &describe_signal(signal));
    }
}

/// Emits narration through `tracing` at info level.
#[derive(Debug, Default)]
pub struct TracingNarrator;

impl SignalHandler for TracingNarrator {
    fn handle_event(&mut self, event: &RaceEvent) {
        if let Some(message) = describe_event(event) {
            tracing::info!(target: "narration", "[{}] {}", event.time, message);
        }
    }

    fn handle_signal(&mut self, signal: &RaceSignal) {
        tracing::info!(
            target: "narration",
            "[{}] {}",
            format_clock_time(signal.timestamp()),
            describe_signal(signal)
        );
    }
}
