//! Parent-epic membership: which epics claim each issue.
//!
//! Building the membership map is a two-phase pipeline:
//!
//! 1. [`discover_epics`] scans the board table for issues flagged as epics.
//! 2. [`collect_membership`] asks an [`EpicDetailSource`] for each epic's
//!    member list, one epic at a time in discovery order, and folds the
//!    results with [`aggregate`].
//!
//! The fold itself is pure; fetching lives behind the [`EpicDetailSource`]
//! port so this crate stays free of I/O.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::schema::{column_position, resolve_columns, IS_EPIC, ISSUE_NUMBER, PARENT_EPICS};
use crate::{cell_at, Cell, EpicId, IssueKey, SheetError, Table, TableRole};

// ---------------------------------------------------------------------------
// Epic detail
// ---------------------------------------------------------------------------

/// One epic and the issues it lists as children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpicDetail {
    /// The epic's own issue number.
    pub epic: EpicId,
    /// Member issues, in the order the epic lists them.
    pub issues: Vec<IssueKey>,
}

/// Supplies the member list of one epic.
///
/// Implemented by whatever holds epic data: an HTTP client in a fetch layer,
/// or an already-loaded file. Calls are made sequentially, one per epic.
pub trait EpicDetailSource {
    /// Error produced when an epic's detail cannot be supplied.
    type Error;

    /// Returns the detail for `epic`.
    fn epic_detail(&self, epic: EpicId) -> Result<EpicDetail, Self::Error>;
}

// ---------------------------------------------------------------------------
// Membership map
// ---------------------------------------------------------------------------

/// Mapping from issue key to the epics that claim it, in claim order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpicMembership {
    parents: HashMap<IssueKey, Vec<EpicId>>,
}

impl EpicMembership {
    /// Returns the epics claiming `issue`, or an empty slice.
    pub fn epics_for(&self, issue: &IssueKey) -> &[EpicId] {
        self.parents.get(issue).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the epics claiming `issue` comma-joined, e.g. `"12,456"`.
    pub fn parent_epics(&self, issue: &IssueKey) -> String {
        self.epics_for(issue)
            .iter()
            .map(EpicId::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Number of distinct issues claimed by at least one epic.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Returns `true` if no issue is claimed by any epic.
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    fn claim(&mut self, issue: IssueKey, epic: EpicId) {
        self.parents.entry(issue).or_default().push(epic);
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Returns the identifiers of every board row flagged as an epic, in board order.
///
/// The flag is truthy for `Bool(true)` or the text `true`. Identifiers that
/// are not non-negative integers cannot name an epic and are skipped.
pub fn discover_epics(board: &Table) -> Result<Vec<EpicId>, SheetError> {
    let [is_epic, issue_number] =
        resolve_columns(TableRole::Board, board.header(), [IS_EPIC, ISSUE_NUMBER])?;

    let mut epics = Vec::new();
    for (row_index, row) in board.data_rows().iter().enumerate() {
        if !cell_at(row, is_epic).is_truthy_flag() {
            continue;
        }
        let id_cell = cell_at(row, issue_number);
        match epic_id(&id_cell) {
            Some(epic) => epics.push(epic),
            None => warn!(row = row_index + 1, id = %id_cell, "skipping epic with non-integer identifier"),
        }
    }

    debug!(count = epics.len(), "discovered epics");
    Ok(epics)
}

fn epic_id(cell: &Cell) -> Option<EpicId> {
    match cell {
        Cell::Number(n) if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 => {
            // Integral and non-negative; the cast is exact below 2^53.
            Some(EpicId::new(*n as u64))
        }
        Cell::String(s) => s.trim().parse::<u64>().ok().map(EpicId::new),
        _ => None,
    }
}

/// Folds epic details into a membership map.
///
/// Each epic's id is appended to every issue it lists, in iteration order.
/// Repeats are kept: an issue listed twice under one epic gets that epic twice.
pub fn aggregate<I>(details: I) -> EpicMembership
where
    I: IntoIterator<Item = EpicDetail>,
{
    let mut membership = EpicMembership::default();
    for detail in details {
        for issue in detail.issues {
            membership.claim(issue, detail.epic);
        }
    }
    membership
}

/// Fetches each epic's detail from `source` and aggregates the results.
///
/// Epics are fetched sequentially in the given order; the first failure
/// aborts the whole collection.
pub fn collect_membership<S>(epics: &[EpicId], source: &S) -> Result<EpicMembership, S::Error>
where
    S: EpicDetailSource,
{
    let mut details = Vec::with_capacity(epics.len());
    for &epic in epics {
        let detail = source.epic_detail(epic)?;
        debug!(%epic, members = detail.issues.len(), "fetched epic detail");
        details.push(detail);
    }
    Ok(aggregate(details))
}

/// Returns a copy of `board` carrying a `parent_epics` column derived from
/// `membership`.
///
/// An existing `parent_epics` column is overwritten in place; otherwise the
/// column is appended. Short rows are padded with [`Cell::Missing`] up to the
/// new column.
pub fn annotate_board(board: &Table, membership: &EpicMembership) -> Result<Table, SheetError> {
    let [issue_number] = resolve_columns(TableRole::Board, board.header(), [ISSUE_NUMBER])?;

    let mut header = board.header().to_vec();
    let target = match column_position(&header, PARENT_EPICS) {
        Some(existing) => existing,
        None => {
            header.push(Cell::from(PARENT_EPICS));
            header.len() - 1
        }
    };

    let mut annotated = Table::new(vec![header]);
    for row in board.data_rows() {
        let parents = cell_at(row, issue_number)
            .key()
            .map(|key| membership.parent_epics(&key))
            .unwrap_or_default();

        let mut row = row.clone();
        if row.len() <= target {
            row.resize(target + 1, Cell::Missing);
        }
        row[target] = Cell::String(parents);
        annotated.push_row(row);
    }
    Ok(annotated)
}
