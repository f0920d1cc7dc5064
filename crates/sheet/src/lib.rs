//! Core domain for issue-sheet.
//!
//! This crate turns two spreadsheet-style tables, an issue-tracker export and
//! a project-board export, into one denormalised table. It owns the table
//! model, header resolution, story-point label extraction, parent-epic
//! aggregation, and the join itself.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! Every operation is a pure function of the tables passed in; fetching epic
//! details is delegated to the [`EpicDetailSource`] port.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`IssueKey`, `EpicId`, `RunId`, etc.) |
//! | [`table`] | `Table` and the tagged `Cell` scalar |
//! | [`errors`] | `SheetError` and `TableRole` |
//! | [`schema`] | Name-based column resolution |
//! | [`labels`] | Story-point extraction from label strings |
//! | [`epics`] | Epic discovery and membership aggregation |
//! | [`join`] | The tracker/board left join |

pub mod epics;
pub mod errors;
pub mod identifiers;
pub mod join;
pub mod labels;
pub mod schema;
pub mod table;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use epics::{
    aggregate, annotate_board, collect_membership, discover_epics, EpicDetail, EpicDetailSource,
    EpicMembership,
};
pub use errors::{SheetError, TableRole};
pub use identifiers::{EpicId, IssueKey, RunId};
pub use join::{join, JoinOptions};
pub use labels::{extract_point, is_decimal_text, parse_point, LabelPrefix, PointExtraction};
pub use schema::{column_position, resolve_columns, BoardColumns, TrackerColumns};
pub use table::{cell_at, Cell, Table};
