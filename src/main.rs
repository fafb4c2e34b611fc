//! Classroom session tracker driven by ArUco marker detections.

use anyhow::{Context, Result};
use aruco_classroom::{app::ClassroomApp, config::Config};
use clap::Parser;
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Camera index or stream URL
    #[arg(short, long)]
    source: Option<String>,

    /// Replay recorded detections (JSON lines) instead of a camera
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// CSV file mapping card ids to words
    #[arg(long)]
    words: Option<PathBuf>,

    /// CSV file mapping person ids to names
    #[arg(long)]
    users: Option<PathBuf>,

    /// Do not post telemetry
    #[arg(long)]
    no_telemetry: bool,

    /// Do not send chat notifications
    #[arg(long)]
    no_notify: bool,

    /// Print the example configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{}", aruco_classroom::config::EXAMPLE_CONFIG);
        return Ok(());
    }

    info!("ArUco classroom tracker");

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(source) = args.source {
        config.capture.source = source;
    }
    if let Some(replay) = args.replay {
        config.capture.replay = Some(replay);
    }
    if let Some(words) = args.words {
        config.lookups.words_csv = words;
    }
    if let Some(users) = args.users {
        config.lookups.users_csv = users;
    }
    if args.no_telemetry {
        config.telemetry.enabled = false;
    }
    if args.no_notify {
        config.notifier.enabled = false;
    }
    config.validate()?;

    let mut app = ClassroomApp::from_config(&config)?;
    let summary = app.run()?;
    info!(
        "Program stopped: {} sessions ended, {} delivery failures",
        summary.sessions_ended, summary.delivery_failures
    );

    Ok(())
}
