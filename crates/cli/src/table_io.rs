//! Reading and writing tables as JSON or CSV.
//!
//! JSON tables are an array of row arrays holding plain scalars, exactly the
//! shape a spreadsheet range exports. CSV has no types, so cells are typed on
//! read: `true`/`false` become booleans, numeric text in canonical form
//! becomes a number, and everything else (including blanks) stays text.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use sheet::{is_decimal_text, Cell, Table};

use crate::config::TableFormat;

/// Picks a format from a file extension: `.csv` is CSV, anything else JSON.
pub fn detect_format(path: &Path) -> TableFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => TableFormat::Csv,
        _ => TableFormat::Json,
    }
}

/// Reads a table from `path`, choosing the format by extension.
pub fn read_table(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open table {}", path.display()))?;
    parse_table(file, detect_format(path))
        .with_context(|| format!("failed to read table {}", path.display()))
}

/// Parses a table in the given format.
pub fn parse_table<R: Read>(reader: R, format: TableFormat) -> Result<Table> {
    match format {
        TableFormat::Json => Ok(serde_json::from_reader(reader)?),
        TableFormat::Csv => {
            let mut csv = csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_reader(reader);
            let mut rows = Vec::new();
            for record in csv.records() {
                let record = record?;
                rows.push(record.iter().map(infer_cell).collect());
            }
            Ok(Table::new(rows))
        }
    }
}

/// Types one CSV field.
///
/// A field becomes a number only when the number renders back to exactly the
/// same text, so `1.10`, `007` and `1e3` stay strings and survive a round
/// trip unchanged.
pub fn infer_cell(field: &str) -> Cell {
    match field {
        "true" | "TRUE" => Cell::Bool(true),
        "false" | "FALSE" => Cell::Bool(false),
        _ if is_decimal_text(field) => match field.parse::<f64>() {
            Ok(n) if Cell::Number(n).render() == field => Cell::Number(n),
            _ => Cell::from(field),
        },
        _ => Cell::from(field),
    }
}

/// Writes `table` to `writer`.
///
/// JSON is written one row per line; `Missing` and `NaN` cells become
/// `null`. CSV cells are rendered as text, with `Missing` as an empty field.
pub fn write_table<W: Write>(table: &Table, format: TableFormat, mut writer: W) -> Result<()> {
    match format {
        TableFormat::Json => {
            writeln!(writer, "[")?;
            let rows = table.rows();
            for (i, row) in rows.iter().enumerate() {
                let separator = if i + 1 < rows.len() { "," } else { "" };
                writeln!(writer, "  {}{separator}", serde_json::to_string(row)?)?;
            }
            writeln!(writer, "]")?;
        }
        TableFormat::Csv => {
            let mut csv = csv::WriterBuilder::new().flexible(true).from_writer(writer);
            for row in table.rows() {
                csv.write_record(row.iter().map(Cell::render))?;
            }
            csv.flush()?;
        }
    }
    Ok(())
}
