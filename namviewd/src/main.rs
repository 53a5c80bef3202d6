//! Namview reviewer binary.

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use namview_common::DisplayMode;
use namviewdlib::{
    config::load_config,
    error::ReviewerError,
    review::{decode_input, render, review, session_from_config},
};

/// Review a Namada transaction the way a signing device would display it.
#[derive(Debug, Parser)]
#[command(name = "namviewd", version, about)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show expert items.
    #[arg(long)]
    expert: bool,

    /// Bytes per appended chunk.
    #[arg(long, default_value_t = 250)]
    chunk_size: usize,

    /// Transaction file, hex or raw bytes.
    input: PathBuf,
}

fn run(args: Args) -> Result<(), ReviewerError> {
    let mut config = load_config(args.config.as_deref())?;
    if args.expert {
        config.display.mode = DisplayMode::Expert;
    }
    let bytes = decode_input(&std::fs::read(&args.input)?)?;
    let mut session = session_from_config(&config)?;
    let items = review(&mut session, &bytes, args.chunk_size, config.display.mode)?;
    render(std::io::stdout().lock(), &items)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "review failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
