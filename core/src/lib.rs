pub mod clock;
pub mod competitor;
pub mod context;
pub mod event_log;
pub mod narration;
pub mod report;
pub mod signal_processor;

// Re-exports for convenience
pub use competitor::{CompetitorState, CompetitorStatus, Roster};
pub use context::{RaceConfig, RaceSession, load_config};
pub use event_log::{EventKind, RaceEvent, read_event_file};
pub use report::{Report, generate_reports};
pub use signal_processor::{EventProcessor, RaceOutcome, RaceSignal, SignalHandler, process_events};
