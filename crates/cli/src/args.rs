//! Command-line argument structures.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::TableFormat;

/// Join GitHub issues with a ZenHub board into one spreadsheet-ready table
#[derive(Debug, Parser)]
#[command(name = "issue-sheet")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to ./issue-sheet.toml when present)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Join a tracker table with a board table
    Join {
        /// Tracker (issue) table, .json or .csv
        #[arg(long, value_name = "PATH")]
        issues: PathBuf,

        /// Board table, .json or .csv
        #[arg(long, value_name = "PATH")]
        board: PathBuf,

        /// ZenHub epic data keyed by epic number; adds a parent_epics column
        #[arg(long, value_name = "PATH")]
        epics: Option<PathBuf>,

        /// Label prefix of pessimistic story points, e.g. "psp_"
        #[arg(long, value_name = "PREFIX")]
        pessimistic_prefix: Option<String>,

        /// Label prefix of optimistic story points, e.g. "osp_"
        #[arg(long, value_name = "PREFIX")]
        optimistic_prefix: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Flatten a GitHub issue listing (JSON) into a tracker table
    Issues {
        /// Saved response of GET /repos/{owner}/{repo}/issues
        payload: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Flatten a ZenHub board (JSON) into a board table
    Board {
        /// Saved response of the ZenHub board endpoint
        payload: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Parse an HTTP Link header and print its pagination relations as JSON
    Links {
        /// Raw header value, e.g. '<https://...?page=2>; rel="next"'
        header: String,
    },
}

#[derive(Debug, clap::Args)]
pub struct OutputArgs {
    /// Output table format (overrides the configuration file)
    #[arg(long, value_enum)]
    pub format: Option<TableFormat>,

    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
