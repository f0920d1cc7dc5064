//! issue-sheet source adapters.
//!
//! Converts already-fetched GitHub and ZenHub API payloads into the tables the
//! [`sheet`] crate joins, and parses the HTTP `Link` header a paginating fetch
//! layer needs to find the next page.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Wire formats (JSON payload shapes, the `Link` header
//! grammar) live here. The [`sheet`] crate sees only [`sheet::Table`] and
//! [`sheet::EpicDetailSource`]. Network transport and authentication are the
//! caller's concern; nothing in this crate performs I/O.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`github`] | GitHub issue payloads → tracker table |
//! | [`zenhub`] | ZenHub board payloads → board table; epic data source |
//! | [`link_header`] | `Link` header → pagination relations |

use sheet::EpicId;
use thiserror::Error;

pub mod github;
pub mod link_header;
pub mod zenhub;

pub use github::{issues_table, parse_issues, GitHubIssue, GitHubLabel, GitHubUser};
pub use link_header::{parse_link_header, RelLinks};
pub use zenhub::{
    board_table, parse_board, EpicFile, ZenHubBoard, ZenHubEpicData, ZenHubEpicIssue,
    ZenHubEstimate, ZenHubIssue, ZenHubPipeline,
};

/// Errors raised while decoding source payloads.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The payload is not valid JSON or does not have the expected shape.
    #[error("malformed {payload} payload: {source}")]
    Decode {
        /// Which payload failed, e.g. `"zenhub board"`.
        payload: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// An epic was requested that the epic data does not contain.
    #[error("epic {epic} not found in epic data")]
    EpicNotFound { epic: EpicId },

    /// An epic data key is not an issue number.
    #[error("invalid epic identifier '{key}' in epic data")]
    InvalidEpicId { key: String },
}
