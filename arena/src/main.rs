//! # Arena
//!
//! Entry point for the arena evaluation binary.
//!
//! ```text
//! arena --app web --persona survivor --policy heuristic --episodes 30 --log-dir logs
//! ```
//!
//! Log verbosity follows `RUST_LOG` and defaults to `info`.

use anyhow::Result;
use arena::{app, cli::Args};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    app::run(&args)?;
    Ok(())
}
