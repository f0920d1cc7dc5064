//! GitHub issue payloads and their flattening into a tracker table.
//!
//! Mirrors the subset of the `GET /repos/{owner}/{repo}/issues` response the
//! join needs. Unknown fields are ignored, so full API responses deserialise
//! unchanged.

use serde::{Deserialize, Serialize};
use sheet::schema::{ASSIGNEES, LABELS, NUMBER, STATE, TITLE};
use sheet::{Cell, Table};

use crate::SourceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubLabel {
    pub name: String,
}

/// One issue from a GitHub issue listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubIssue {
    /// Repository-scoped issue number.
    pub number: u64,
    pub title: String,
    /// `open` or `closed`.
    pub state: String,
    #[serde(default)]
    pub assignees: Vec<GitHubUser>,
    #[serde(default)]
    pub labels: Vec<GitHubLabel>,
}

/// Decodes one page of a GitHub issue listing.
pub fn parse_issues(json: &str) -> Result<Vec<GitHubIssue>, SourceError> {
    serde_json::from_str(json).map_err(|source| SourceError::Decode {
        payload: "github issues",
        source,
    })
}

/// Flattens issues into a tracker table: `number, title, state, asignnees,
/// labels`, with assignee logins and label names comma-joined.
pub fn issues_table(issues: &[GitHubIssue]) -> Table {
    let mut table = Table::with_header([NUMBER, TITLE, STATE, ASSIGNEES, LABELS]);
    for issue in issues {
        let assignees: Vec<&str> = issue.assignees.iter().map(|u| u.login.as_str()).collect();
        let labels: Vec<&str> = issue.labels.iter().map(|l| l.name.as_str()).collect();
        table.push_row(vec![
            Cell::from(issue.number),
            Cell::from(issue.title.as_str()),
            Cell::from(issue.state.as_str()),
            Cell::from(assignees.join(",")),
            Cell::from(labels.join(",")),
        ]);
    }
    table
}
