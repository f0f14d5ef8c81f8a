//! Shared types for the biathlon event processor.
//!
//! Kept free of time and parsing dependencies so both the core and the CLI
//! can use the same config shape and display helpers.

pub mod config;
pub mod formatting;

pub use config::RaceConfigFile;
