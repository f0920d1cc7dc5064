//! The tracker/board left join.
//!
//! [`join`] walks the tracker table in order and, for each issue, pulls story
//! points out of its labels, looks the issue up on the board, and emits one
//! denormalised row. Issues not (yet) on the board still produce a row, with
//! blank board columns.
//!
//! ## Output shape
//!
//! Which columns appear depends on the options supplied and on whether the
//! board carries `parent_epics`. Header and rows are both produced from the
//! same ordered list of [`OutputColumn`] descriptors, so their shapes cannot
//! diverge:
//!
//! | Column | Present when |
//! |--------|--------------|
//! | `pipeline_name` … `most_likely_sp` | always (9 columns) |
//! | `pessimistic_sp` | a pessimistic prefix is given |
//! | `optimistic_sp` | an optimistic prefix is given |
//! | `parent_epics` | the board has the column, or a membership map is given |

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::labels::extract_point;
use crate::schema::{BoardColumns, TrackerColumns};
use crate::{cell_at, Cell, EpicMembership, IssueKey, LabelPrefix, SheetError, Table, TableRole};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Optional behaviour of a [`join`].
#[derive(Debug, Clone, Default)]
pub struct JoinOptions<'a> {
    /// Prefix of the pessimistic story-point label, e.g. `psp_`.
    pub pessimistic_prefix: Option<LabelPrefix>,
    /// Prefix of the optimistic story-point label, e.g. `osp_`.
    pub optimistic_prefix: Option<LabelPrefix>,
    /// Parent-epic membership used when the board has no `parent_epics` column.
    pub epic_membership: Option<&'a EpicMembership>,
}

// ---------------------------------------------------------------------------
// Output columns
// ---------------------------------------------------------------------------

/// All values one output row can draw from.
#[derive(Debug, Clone)]
struct JoinedRow {
    pipeline_name: Cell,
    position: Cell,
    is_epic: Cell,
    number: Cell,
    title: Cell,
    state: Cell,
    assignees: Cell,
    labels: String,
    most_likely_sp: Cell,
    pessimistic_sp: Option<f64>,
    optimistic_sp: Option<f64>,
    parent_epics: Cell,
}

/// One column of the joined table: its header name, whether it is emitted,
/// and how its value is read from a [`JoinedRow`].
struct OutputColumn {
    name: &'static str,
    active: bool,
    value: fn(&JoinedRow) -> Cell,
}

impl OutputColumn {
    fn always(name: &'static str, value: fn(&JoinedRow) -> Cell) -> Self {
        Self {
            name,
            active: true,
            value,
        }
    }

    fn when(active: bool, name: &'static str, value: fn(&JoinedRow) -> Cell) -> Self {
        Self {
            name,
            active,
            value,
        }
    }
}

fn output_columns(pessimistic: bool, optimistic: bool, parent_epics: bool) -> Vec<OutputColumn> {
    [
        OutputColumn::always("pipeline_name", |r| r.pipeline_name.clone()),
        OutputColumn::always("position", |r| r.position.clone()),
        OutputColumn::always("is_epic", |r| r.is_epic.clone()),
        OutputColumn::always("number", |r| r.number.clone()),
        OutputColumn::always("title", |r| r.title.clone()),
        OutputColumn::always("state", |r| r.state.clone()),
        OutputColumn::always("asignees", |r| r.assignees.clone()),
        OutputColumn::always("labels", |r| Cell::String(r.labels.clone())),
        OutputColumn::always("most_likely_sp", |r| r.most_likely_sp.clone()),
        OutputColumn::when(pessimistic, "pessimistic_sp", |r| r.pessimistic_sp.into()),
        OutputColumn::when(optimistic, "optimistic_sp", |r| r.optimistic_sp.into()),
        OutputColumn::when(parent_epics, "parent_epics", |r| r.parent_epics.clone()),
    ]
    .into_iter()
    .filter(|column| column.active)
    .collect()
}

// ---------------------------------------------------------------------------
// Join
// ---------------------------------------------------------------------------

/// Left-joins the tracker table with the board table on the issue identifier.
///
/// Both tables are validated before any row is processed: each must have at
/// least one data row and resolve its required columns. The result has one
/// row per tracker data row, in tracker order.
///
/// # Errors
///
/// - [`SheetError::EmptyInput`] if either table has no data rows (tracker
///   checked first).
/// - [`SheetError::Schema`] if either header lacks required columns.
pub fn join(tracker: &Table, board: &Table, options: &JoinOptions<'_>) -> Result<Table, SheetError> {
    if !tracker.has_data() {
        return Err(SheetError::EmptyInput {
            table: TableRole::Tracker,
        });
    }
    if !board.has_data() {
        return Err(SheetError::EmptyInput {
            table: TableRole::Board,
        });
    }
    let tracker_columns = TrackerColumns::resolve(tracker.header())?;
    let board_columns = BoardColumns::resolve(board.header())?;

    let index = index_board(board, board_columns.issue_number);
    let columns = output_columns(
        options.pessimistic_prefix.is_some(),
        options.optimistic_prefix.is_some(),
        board_columns.parent_epics.is_some() || options.epic_membership.is_some(),
    );

    let header = columns.iter().map(|column| Cell::from(column.name)).collect();
    let mut joined = Table::new(vec![header]);
    let mut matched = 0usize;

    for tracker_row in tracker.data_rows() {
        let key = cell_at(tracker_row, tracker_columns.number).key();
        let board_row = key
            .as_ref()
            .and_then(|key| index.get(key))
            .map(|&row_index| board.data_rows()[row_index].as_slice());
        if board_row.is_some() {
            matched += 1;
        }

        let row = join_row(
            tracker_row,
            &tracker_columns,
            board_row,
            &board_columns,
            key.as_ref(),
            options,
        );
        joined.push_row(columns.iter().map(|column| (column.value)(&row)).collect());
    }

    let rows = tracker.data_rows().len();
    debug!(
        rows,
        matched,
        unmatched = rows - matched,
        columns = columns.len(),
        "joined tracker and board tables"
    );
    Ok(joined)
}

/// Maps each board identifier to its data-row index. A repeated identifier
/// keeps its last occurrence.
fn index_board(board: &Table, issue_number: usize) -> HashMap<IssueKey, usize> {
    let mut index = HashMap::with_capacity(board.data_rows().len());
    for (row_index, row) in board.data_rows().iter().enumerate() {
        let Some(key) = cell_at(row, issue_number).key() else {
            continue;
        };
        if let Some(previous) = index.insert(key, row_index) {
            trace!(previous, row_index, "board identifier repeated; later row wins");
        }
    }
    debug!(entries = index.len(), "indexed board issues");
    index
}

fn join_row(
    tracker_row: &[Cell],
    tracker_columns: &TrackerColumns,
    board_row: Option<&[Cell]>,
    board_columns: &BoardColumns,
    key: Option<&IssueKey>,
    options: &JoinOptions<'_>,
) -> JoinedRow {
    let mut labels = cell_at(tracker_row, tracker_columns.labels).render();

    let mut take_point = |prefix: &Option<LabelPrefix>| {
        prefix.as_ref().map(|prefix| {
            let extraction = extract_point(&labels, prefix);
            labels = extraction.new_labels;
            extraction.point
        })
    };
    let pessimistic_sp = take_point(&options.pessimistic_prefix);
    let optimistic_sp = take_point(&options.optimistic_prefix);

    let board_cell = |column: usize| board_row.map(|row| cell_at(row, column)).unwrap_or_default();

    let parent_epics = match (board_columns.parent_epics, options.epic_membership) {
        (Some(column), _) => board_row
            .map(|row| cell_at(row, column))
            .unwrap_or_else(|| Cell::from("")),
        (None, Some(membership)) => {
            Cell::String(key.map(|key| membership.parent_epics(key)).unwrap_or_default())
        }
        (None, None) => Cell::Missing,
    };

    JoinedRow {
        pipeline_name: board_row
            .map(|row| cell_at(row, board_columns.pipeline_name))
            .unwrap_or_else(|| Cell::from("")),
        position: board_cell(board_columns.position),
        is_epic: board_cell(board_columns.is_epic),
        number: cell_at(tracker_row, tracker_columns.number),
        title: cell_at(tracker_row, tracker_columns.title),
        state: cell_at(tracker_row, tracker_columns.state),
        assignees: cell_at(tracker_row, tracker_columns.assignees),
        labels,
        most_likely_sp: board_cell(board_columns.estimate_value),
        pessimistic_sp,
        optimistic_sp,
        parent_epics,
    }
}
