//! issue-sheet CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: command-line flags plus an optional
//!    `issue-sheet.toml`, validated before any work starts.
//! 2. **Wire observability**: install a `tracing-subscriber` (pretty or JSON)
//!    and open a root span carrying a fresh [`sheet::RunId`].
//! 3. **Dispatch**: read the input tables or payloads, call into the
//!    [`sheet`] and [`sources`] crates, and write the result.

mod args;
mod commands;
mod config;
mod logging;
mod table_io;

use anyhow::Result;
use clap::Parser;
use sheet::RunId;
use tracing::info_span;

use crate::args::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;
    logging::init(cli.verbose, config.log_format());

    let run_id = RunId::new_random();
    let _span = info_span!("issue_sheet", %run_id).entered();
    commands::run(cli.command, &config)
}
