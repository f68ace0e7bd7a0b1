//! Binary crate for the `forecast` job.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Logging setup (console + log file)
//! - Interactive configuration
//!
//! Meant to be invoked once a day by an external scheduler; the exit code
//! reports whether the run completed.

use clap::Parser;

mod cli;
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
