//! Error types for the issue-sheet domain.
//!
//! [`SheetError`] covers the two conditions that abort a join before any row
//! is processed: an input table with no data rows, and a header that lacks
//! required columns. Data gaps (unmatched identifiers, unparsable point
//! tokens) are not errors; they degrade to blank or `NaN` cells instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Table roles
// ---------------------------------------------------------------------------

/// Which side of the join a table plays.
///
/// Carried by every [`SheetError`] so the caller knows which input to fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableRole {
    /// The issue-tracker export (GitHub issues).
    Tracker,
    /// The project-board export (ZenHub board issues).
    Board,
}

impl std::fmt::Display for TableRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableRole::Tracker => write!(f, "tracker"),
            TableRole::Board => write!(f, "board"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sheet errors
// ---------------------------------------------------------------------------

/// Errors raised while validating join inputs.
///
/// All validation happens eagerly; when one of these is returned no partial
/// output has been produced.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SheetError {
    /// The table has a header (or nothing at all) but no data rows.
    #[error("no {table} issues")]
    EmptyInput {
        /// The offending input.
        table: TableRole,
    },

    /// One or more required columns are absent from the header.
    ///
    /// `missing` lists every absent column in the order they were required,
    /// not just the first one found.
    #[error("insufficient {table} issue column(s): {}", .missing.join(","))]
    Schema {
        /// The offending input.
        table: TableRole,
        /// Every required column name not present in the header.
        missing: Vec<String>,
    },
}

impl SheetError {
    /// Returns the input table this error refers to.
    pub fn table(&self) -> TableRole {
        match self {
            SheetError::EmptyInput { table } | SheetError::Schema { table, .. } => *table,
        }
    }
}
