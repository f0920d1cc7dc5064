//! ZenHub board and epic payloads.
//!
//! [`board_table`] flattens a `GET /p2/workspaces/{workspace}/repositories/{repo}/board`
//! response into a board table. [`ZenHubEpicData`] models
//! `GET /p1/repositories/{repo}/epics/{epic}` and converts into the
//! [`EpicDetail`] the membership aggregation consumes. [`EpicFile`] holds
//! many epics' data at once and serves them through [`EpicDetailSource`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sheet::schema::{ESTIMATE_VALUE, ISSUE_NUMBER, IS_EPIC, PIPELINE_NAME, POSITION};
use sheet::{Cell, EpicDetail, EpicDetailSource, EpicId, IssueKey, Table};
use tracing::debug;

use crate::SourceError;

/// Board column: pipeline identifier. Carried through for spreadsheet users;
/// the join does not read it.
pub const PIPELINE_ID: &str = "pipeline_id";

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZenHubEstimate {
    pub value: f64,
}

/// One issue placed on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZenHubIssue {
    pub issue_number: u64,
    #[serde(default)]
    pub is_epic: bool,
    /// Absent for issues that have not been estimated.
    #[serde(default)]
    pub estimate: Option<ZenHubEstimate>,
    /// Absent for closed issues.
    #[serde(default)]
    pub position: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZenHubPipeline {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub issues: Vec<ZenHubIssue>,
}

/// A repository's board: its pipelines in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZenHubBoard {
    pub pipelines: Vec<ZenHubPipeline>,
}

/// Decodes a board response.
pub fn parse_board(json: &str) -> Result<ZenHubBoard, SourceError> {
    serde_json::from_str(json).map_err(|source| SourceError::Decode {
        payload: "zenhub board",
        source,
    })
}

/// Flattens a board into `pipeline_id, pipeline_name, issue_number, is_epic,
/// estimate_value, position`, one row per issue in pipeline order. Missing
/// estimates and positions render as empty strings.
pub fn board_table(board: &ZenHubBoard) -> Table {
    let mut table = Table::with_header([
        PIPELINE_ID,
        PIPELINE_NAME,
        ISSUE_NUMBER,
        IS_EPIC,
        ESTIMATE_VALUE,
        POSITION,
    ]);
    for pipeline in &board.pipelines {
        for issue in &pipeline.issues {
            table.push_row(vec![
                Cell::from(pipeline.id.as_str()),
                Cell::from(pipeline.name.as_str()),
                Cell::from(issue.issue_number),
                Cell::from(issue.is_epic),
                issue
                    .estimate
                    .as_ref()
                    .map_or_else(|| Cell::from(""), |e| Cell::from(e.value)),
                issue.position.map_or_else(|| Cell::from(""), Cell::from),
            ]);
        }
    }
    table
}

// ---------------------------------------------------------------------------
// Epics
// ---------------------------------------------------------------------------

/// One child issue listed by an epic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZenHubEpicIssue {
    pub issue_number: u64,
    #[serde(default)]
    pub is_epic: bool,
}

/// The part of an epic-data response that lists the epic's children.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ZenHubEpicData {
    #[serde(default)]
    pub issues: Vec<ZenHubEpicIssue>,
}

impl ZenHubEpicData {
    /// Converts the response for `epic` into an [`EpicDetail`].
    pub fn into_detail(self, epic: EpicId) -> EpicDetail {
        EpicDetail {
            epic,
            issues: self
                .issues
                .into_iter()
                .filter_map(|issue| IssueKey::new(issue.issue_number.to_string()))
                .collect(),
        }
    }
}

/// Epic data for many epics, keyed by epic number.
///
/// Loaded from a JSON object whose keys are epic numbers and whose values are
/// epic-data responses:
///
/// ```json
/// { "456": { "issues": [{ "issue_number": 123, "is_epic": false, "repo_id": 8514 }] } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpicFile {
    epics: HashMap<EpicId, ZenHubEpicData>,
}

impl EpicFile {
    /// Decodes an epic file.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let raw: HashMap<String, ZenHubEpicData> =
            serde_json::from_str(json).map_err(|source| SourceError::Decode {
                payload: "zenhub epics",
                source,
            })?;

        let mut epics = HashMap::with_capacity(raw.len());
        for (key, data) in raw {
            let id = key
                .trim()
                .parse::<u64>()
                .map_err(|_| SourceError::InvalidEpicId { key: key.clone() })?;
            epics.insert(EpicId::new(id), data);
        }
        debug!(count = epics.len(), "loaded epic file");
        Ok(Self { epics })
    }

    /// Adds or replaces one epic's data.
    pub fn insert(&mut self, epic: EpicId, data: ZenHubEpicData) {
        self.epics.insert(epic, data);
    }

    /// Number of epics held.
    pub fn len(&self) -> usize {
        self.epics.len()
    }

    /// Returns `true` if no epic data is held.
    pub fn is_empty(&self) -> bool {
        self.epics.is_empty()
    }
}

impl EpicDetailSource for EpicFile {
    type Error = SourceError;

    fn epic_detail(&self, epic: EpicId) -> Result<EpicDetail, Self::Error> {
        self.epics
            .get(&epic)
            .cloned()
            .map(|data| data.into_detail(epic))
            .ok_or(SourceError::EpicNotFound { epic })
    }
}
