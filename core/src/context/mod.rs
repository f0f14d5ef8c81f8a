mod config;
mod session;

pub use config::{ConfigError, RaceConfig, load_config, load_file};
pub use session::RaceSession;
