pub mod event;
pub mod parser;
pub mod reader;

pub use event::{CompetitorId, EventKind, RaceEvent};
pub use parser::{LineError, parse_line};
pub use reader::{LogError, parse_event_log, read_event_file};
