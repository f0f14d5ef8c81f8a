pub mod handler;
pub mod processor;
pub mod signal;

#[cfg(test)]
mod processor_tests;

pub use handler::SignalHandler;
pub use processor::{EventError, EventProcessor, RaceOutcome, process_events};
pub use signal::RaceSignal;
