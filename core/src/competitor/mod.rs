pub mod roster;
pub mod state;

pub use roster::Roster;
pub use state::{CompetitorState, CompetitorStatus, SHOTS_PER_VISIT};
