//! Subcommand handlers.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use sheet::{collect_membership, discover_epics, join, EpicMembership, JoinOptions, Table};
use sources::{board_table, issues_table, parse_board, parse_issues, parse_link_header, EpicFile};
use tracing::info;

use crate::args::{Commands, OutputArgs};
use crate::config::FileConfig;
use crate::table_io::{read_table, write_table};

/// Runs one subcommand to completion.
pub fn run(command: Commands, config: &FileConfig) -> Result<()> {
    match command {
        Commands::Join {
            issues,
            board,
            epics,
            pessimistic_prefix,
            optimistic_prefix,
            output,
        } => {
            let (pessimistic_prefix, optimistic_prefix) =
                config.label_prefixes(pessimistic_prefix, optimistic_prefix)?;

            let tracker = read_table(&issues)?;
            let board = read_table(&board)?;
            let membership = epics
                .as_deref()
                .map(|path| load_membership(path, &board))
                .transpose()?;

            let options = JoinOptions {
                pessimistic_prefix,
                optimistic_prefix,
                epic_membership: membership.as_ref(),
            };
            let joined = join(&tracker, &board, &options).context("failed to join issue tables")?;
            info!(rows = joined.data_rows().len(), "joined issues");
            emit(&joined, &output, config)
        }
        Commands::Issues { payload, output } => {
            let issues = parse_issues(&read_text(&payload)?)?;
            info!(issues = issues.len(), "flattened github issues");
            emit(&issues_table(&issues), &output, config)
        }
        Commands::Board { payload, output } => {
            let board = parse_board(&read_text(&payload)?)?;
            info!(pipelines = board.pipelines.len(), "flattened zenhub board");
            emit(&board_table(&board), &output, config)
        }
        Commands::Links { header } => {
            let links = parse_link_header(&header);
            let mut stdout = io::stdout().lock();
            serde_json::to_writer(&mut stdout, &links)?;
            writeln!(stdout)?;
            Ok(())
        }
    }
}

/// Discovers the board's epics and looks each one up in the epic file.
fn load_membership(path: &Path, board: &Table) -> Result<EpicMembership> {
    let file = EpicFile::from_json(&read_text(path)?)
        .with_context(|| format!("failed to load epic data {}", path.display()))?;
    let epics = discover_epics(board).context("failed to discover epics on the board")?;
    let membership = collect_membership(&epics, &file)?;
    info!(epics = epics.len(), issues = membership.len(), "collected epic membership");
    Ok(membership)
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn emit(table: &Table, output: &OutputArgs, config: &FileConfig) -> Result<()> {
    let format = config.table_format(output.format);
    match &output.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_table(table, format, BufWriter::new(file))
        }
        None => write_table(table, format, io::stdout().lock()),
    }
}
