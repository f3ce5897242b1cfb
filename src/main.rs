//! CLI entry point for dirtree

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use clap::{Parser, ValueEnum};
use dirtree::tree::DEFAULT_DEPTH;
use dirtree::{BuildConfig, TracingSink, TreeBuilder, print_json};
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, time::ChronoLocal};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_TIME_FORMAT: &str = "%H:%M:%S";

/// Maximum level of log output
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    /// No log output at all
    Silent,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<tracing::Level> {
        match self {
            LogLevel::Debug => Some(tracing::Level::DEBUG),
            LogLevel::Info => Some(tracing::Level::INFO),
            LogLevel::Warn => Some(tracing::Level::WARN),
            LogLevel::Error => Some(tracing::Level::ERROR),
            LogLevel::Silent => None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "dirtree")]
#[command(about = "Build and print a directory tree in JSON format")]
#[command(version)]
struct Args {
    /// Path to the directory or file to inspect
    path: PathBuf,

    /// Recursion depth (-1 for unlimited)
    #[arg(
        short = 'L',
        long = "depth",
        default_value_t = DEFAULT_DEPTH,
        allow_negative_numbers = true
    )]
    depth: i64,

    /// Show human-readable sizes and timestamps
    #[arg(short = 'H', long = "human-readable")]
    human_readable: bool,

    /// Also append log output to this file
    #[arg(long = "logfile", value_name = "FILE")]
    logfile: Option<PathBuf>,

    /// Maximum log level written to stderr and the log file
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: LogLevel,

    /// Leave out entries whose name matches pattern (can be used multiple times)
    #[arg(short = 'I', long = "ignore", value_name = "PATTERN")]
    ignore: Vec<String>,
}

/// Install the fmt subscriber: stderr always, plus `logfile` when given.
/// Stdout is reserved for the JSON document.
fn setup_logging(level: LogLevel, logfile: Option<&Path>) -> io::Result<()> {
    let Some(level) = level.to_tracing_level() else {
        return Ok(());
    };

    let file_layer = match logfile {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string()))
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(LevelFilter::from_level(level))
        .with(
            fmt::layer()
                .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string()))
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(file_layer)
        .init();
    Ok(())
}

fn main() {
    let args = Args::try_parse().unwrap_or_else(|e| {
        if !e.use_stderr() {
            e.exit();
        }
        eprint!("{}", e);
        process::exit(1);
    });

    if let Err(e) = setup_logging(args.log_level, args.logfile.as_deref()) {
        let logfile = args.logfile.as_deref().unwrap_or(Path::new(""));
        eprintln!(
            "dirtree: cannot open log file '{}': {}",
            logfile.display(),
            e
        );
        process::exit(1);
    }

    info!(
        "Building directory tree for {} (depth={}, human_readable={})",
        args.path.display(),
        args.depth,
        args.human_readable
    );

    let config = BuildConfig {
        depth: args.depth,
        human_readable: args.human_readable,
        ignore_patterns: args.ignore,
    };
    let sink = TracingSink;
    let tree = match TreeBuilder::new(config).with_sink(&sink).build(&args.path) {
        Ok(tree) => tree,
        Err(e) => {
            error!("Error while building directory tree: {}", e);
            eprintln!("dirtree: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = print_json(&tree) {
        error!("Error while writing directory tree: {}", e);
        eprintln!("dirtree: error writing output: {}", e);
        process::exit(1);
    }

    info!("Directory tree successfully generated.");
}
