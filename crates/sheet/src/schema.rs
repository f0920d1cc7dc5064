//! Name-based column resolution for the two join inputs.
//!
//! Either input's column order may vary by caller, so columns are located by
//! header name once, up front, and the join then works with plain integer
//! offsets. Lookup is exact and case-sensitive; the first occurrence of a
//! duplicated name wins. Header cells that are not strings never match.

use tracing::debug;

use crate::{Cell, SheetError, TableRole};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Tracker column: issue identifier.
pub const NUMBER: &str = "number";
/// Tracker column: issue title.
pub const TITLE: &str = "title";
/// Tracker column: issue state (`open` / `closed`).
pub const STATE: &str = "state";
/// Tracker column: comma-joined assignee logins. The misspelling is part of
/// the export format and must match exactly.
pub const ASSIGNEES: &str = "asignnees";
/// Tracker column: comma-joined label names.
pub const LABELS: &str = "labels";

/// Board column: pipeline (board column) name.
pub const PIPELINE_NAME: &str = "pipeline_name";
/// Board column: epic flag.
pub const IS_EPIC: &str = "is_epic";
/// Board column: issue identifier.
pub const ISSUE_NUMBER: &str = "issue_number";
/// Board column: most-likely estimate.
pub const ESTIMATE_VALUE: &str = "estimate_value";
/// Board column: sort position within the pipeline.
pub const POSITION: &str = "position";
/// Board column (optional): comma-joined parent epic identifiers.
pub const PARENT_EPICS: &str = "parent_epics";

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Returns the first index of `name` in `header`, if present.
pub fn column_position(header: &[Cell], name: &str) -> Option<usize> {
    header.iter().position(|cell| cell.as_str() == Some(name))
}

/// Resolves every `required` column name to its index in `header`.
///
/// Positions are returned in the same order as `required`. If any column is
/// absent the error names all of them, so a caller can fix the header in one
/// pass.
pub fn resolve_columns<const N: usize>(
    table: TableRole,
    header: &[Cell],
    required: [&str; N],
) -> Result<[usize; N], SheetError> {
    let found = required.map(|name| column_position(header, name));

    let missing: Vec<String> = required
        .iter()
        .zip(found.iter())
        .filter(|(_, position)| position.is_none())
        .map(|(name, _)| (*name).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SheetError::Schema { table, missing });
    }

    // Every entry is `Some` past the check above.
    Ok(found.map(|position| position.unwrap_or_default()))
}

// ---------------------------------------------------------------------------
// Validated column records
// ---------------------------------------------------------------------------

/// Validated column offsets for the tracker (issue) table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerColumns {
    pub number: usize,
    pub title: usize,
    pub state: usize,
    pub assignees: usize,
    pub labels: usize,
}

impl TrackerColumns {
    /// Required tracker columns, in the order they are reported when missing.
    pub const REQUIRED: [&'static str; 5] = [NUMBER, TITLE, STATE, ASSIGNEES, LABELS];

    /// Resolves the tracker columns from a header row.
    pub fn resolve(header: &[Cell]) -> Result<Self, SheetError> {
        let [number, title, state, assignees, labels] =
            resolve_columns(TableRole::Tracker, header, Self::REQUIRED)?;
        let columns = Self {
            number,
            title,
            state,
            assignees,
            labels,
        };
        debug!(?columns, "resolved tracker columns");
        Ok(columns)
    }
}

/// Validated column offsets for the board table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardColumns {
    pub pipeline_name: usize,
    pub is_epic: usize,
    pub issue_number: usize,
    pub estimate_value: usize,
    pub position: usize,
    /// `None` when the board carries no `parent_epics` column.
    pub parent_epics: Option<usize>,
}

impl BoardColumns {
    /// Required board columns, in the order they are reported when missing.
    pub const REQUIRED: [&'static str; 5] =
        [PIPELINE_NAME, IS_EPIC, ISSUE_NUMBER, ESTIMATE_VALUE, POSITION];

    /// Resolves the board columns from a header row.
    pub fn resolve(header: &[Cell]) -> Result<Self, SheetError> {
        let [pipeline_name, is_epic, issue_number, estimate_value, position] =
            resolve_columns(TableRole::Board, header, Self::REQUIRED)?;
        let columns = Self {
            pipeline_name,
            is_epic,
            issue_number,
            estimate_value,
            position,
            parent_epics: column_position(header, PARENT_EPICS),
        };
        debug!(?columns, "resolved board columns");
        Ok(columns)
    }
}
