mod render;

use biathlon_core::narration::{NarrationLog, TracingNarrator};
use biathlon_core::{RaceSession, generate_reports, load_config, read_event_file};
use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

#[derive(Parser)]
#[command(version, about = "Biathlon race event processor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process an event log, write the narration log and print the report
    Run {
        #[arg(short, long, default_value = "data/config.json")]
        config: PathBuf,
        #[arg(short, long, default_value = "data/events")]
        events: PathBuf,
        #[arg(short, long, default_value = "output.log")]
        log: PathBuf,
        /// Print the report as JSON instead of text lines
        #[arg(long)]
        json: bool,
        /// Also emit narration through the tracing subscriber
        #[arg(long)]
        echo: bool,
    },
    /// Load and validate a config file
    CheckConfig {
        #[arg(short, long, default_value = "data/config.json")]
        config: PathBuf,
    },
}

const LOG_PATH_VAR: &str = "BIATHLON_LOG_PATH";

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    let (writer, ansi) = match open_log_file(std::env::var_os(LOG_PATH_VAR)) {
        Some(file) => (BoxMakeWriter::new(Mutex::new(file)), false),
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer)
        .init();
}

/// Diagnostics file to append to, or `None` to log to stderr.
fn open_log_file(path: Option<OsString>) -> Option<File> {
    let path = path.filter(|p| !p.is_empty())?;
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!(
                "cannot open {} ({}): {}, logging to stderr",
                LOG_PATH_VAR,
                Path::new(&path).display(),
                e
            );
            None
        }
    }
}

fn main() -> Result<(), String> {
    init_logging();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            events,
            log,
            json,
            echo,
        } => run(&config, &events, &log, json, echo),
        Commands::CheckConfig { config } => check_config(&config),
    }
}

fn run(
    config_path: &Path,
    events_path: &Path,
    log_path: &Path,
    json: bool,
    echo: bool,
) -> Result<(), String> {
    let config = load_config(config_path).map_err(|e| e.to_string())?;
    let events = read_event_file(events_path).map_err(|e| e.to_string())?;

    let file = File::create(log_path)
        .map_err(|e| format!("error creating log file {:?}: {}", log_path, e))?;
    let mut narration = NarrationLog::new(BufWriter::new(file));
    let mut tracing_narrator = TracingNarrator;

    let outcome = {
        let mut session = RaceSession::new(config.clone());
        session.add_signal_handler(Box::new(&mut narration));
        if echo {
            session.add_signal_handler(Box::new(&mut tracing_narrator));
        }
        session.process_events(&events);
        session.finish()
    };

    let lines = narration.lines_written();
    narration
        .finish()
        .map_err(|e| format!("error writing log file {:?}: {}", log_path, e))?;

    tracing::info!(
        events = events.len(),
        competitors = outcome.roster.len(),
        signals = outcome.signals.len(),
        skipped = outcome.skipped.len(),
        narration_lines = lines,
        "Race processed"
    );

    let reports = generate_reports(&outcome.roster, &config);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &reports).map_err(|e| e.to_string())?;
        writeln!(out).map_err(|e| e.to_string())?;
    } else {
        for report in &reports {
            writeln!(out, "{}", render::render_report(report)).map_err(|e| e.to_string())?;
        }
    }
    out.flush().map_err(|e| e.to_string())
}

fn check_config(config_path: &Path) -> Result<(), String> {
    let config = load_config(config_path).map_err(|e| e.to_string())?;
    println!(
        "{:?}: {} laps of {}m, {}m penalty loop, {} firing lines, start {} (+{})",
        config_path,
        config.laps(),
        config.lap_len(),
        config.penalty_len(),
        config.firing_lines(),
        biathlon_core::clock::format_clock_time(config.start()),
        biathlon_core::clock::format_duration(config.start_delta()),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_log_file_defaults_to_stderr() {
        assert!(open_log_file(None).is_none());
        assert!(open_log_file(Some(OsString::new())).is_none());
    }

    #[test]
    fn test_log_file_appends() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "earlier run").unwrap();

        let mut file = open_log_file(Some(tmp.path().as_os_str().to_owned())).unwrap();
        writeln!(file, "this run").unwrap();

        let mut contents = String::new();
        File::open(tmp.path())
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "earlier run\nthis run\n");
    }

    #[test]
    fn test_unopenable_log_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir").join("biathlon.log");
        assert!(open_log_file(Some(missing.into_os_string())).is_none());
    }
}
