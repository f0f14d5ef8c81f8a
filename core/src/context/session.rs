use crate::competitor::Roster;
use crate::context::RaceConfig;
use crate::event_log::RaceEvent;
use crate::signal_processor::{
    EventError, EventProcessor, RaceOutcome, RaceSignal, SignalHandler,
};

/// One run over an event log: owns the processor and dispatches every event
/// and derived signal to the registered handlers.
pub struct RaceSession<'h> {
    processor: EventProcessor,
    signal_handlers: Vec<Box<dyn SignalHandler + 'h>>,
    signals: Vec<RaceSignal>,
    skipped: Vec<EventError>,
}

impl<'h> RaceSession<'h> {
    pub fn new(config: RaceConfig) -> Self {
        Self {
            processor: EventProcessor::new(config),
            signal_handlers: Vec::new(),
            signals: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Register a signal handler to receive events and signals
    pub fn add_signal_handler(&mut self, handler: Box<dyn SignalHandler + 'h>) {
        self.signal_handlers.push(handler);
    }

    /// Process a single event and dispatch it, followed by any signal it caused
    pub fn process_event(&mut self, event: &RaceEvent) {
        let signal = match self.processor.process_event(event) {
            Ok(signal) => signal,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping event");
                self.skipped.push(e);
                None
            }
        };

        for handler in &mut self.signal_handlers {
            handler.handle_event(event);
            if let Some(signal) = &signal {
                handler.handle_signal(signal);
            }
        }

        if let Some(signal) = signal {
            self.signals.push(signal);
        }
    }

    /// Process multiple events in order
    pub fn process_events(&mut self, events: &[RaceEvent]) {
        for event in events {
            self.process_event(event);
        }
        tracing::debug!(
            events = events.len(),
            competitors = self.processor.roster().len(),
            signals = self.signals.len(),
            skipped = self.skipped.len(),
            "Processed event batch"
        );
    }

    pub fn roster(&self) -> &Roster {
        self.processor.roster()
    }

    pub fn signals(&self) -> &[RaceSignal] {
        &self.signals
    }

    /// End the run, releasing the handlers and handing over the roster.
    pub fn finish(self) -> RaceOutcome {
        RaceOutcome {
            roster: self.processor.into_roster(),
            signals: self.signals,
            skipped: self.skipped,
        }
    }
}
