//! HTTP `Link` header parsing for paginated API responses.
//!
//! GitHub paginates list endpoints and advertises the neighbouring pages in a
//! `Link` header:
//!
//! ```text
//! <https://api.github.com/repositories/8514/issues?page=2>; rel="next",
//! <https://api.github.com/repositories/8514/issues?page=30>; rel="last"
//! ```
//!
//! Syntax: `<uri-reference>; param1=value1; param2="value2"`, entries
//! separated by commas. Only the `rel` parameter is interpreted and only the
//! `first`, `next`, `prev` and `last` relations are kept.

use serde::{Deserialize, Serialize};

/// The pagination relations found in a `Link` header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

impl RelLinks {
    /// Returns the URI of the next page, if the response has one.
    pub fn next_page(&self) -> Option<&str> {
        self.next.as_deref()
    }

    /// Returns `true` if no recognised relation was found.
    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.next.is_none() && self.prev.is_none() && self.last.is_none()
    }
}

/// Parses a raw `Link` header value.
///
/// Malformed entries are skipped rather than rejected: an entry needs at
/// least one parameter, its URI must be wrapped in `<` `>`, and it must carry
/// a recognised `rel`. When one entry carries several `rel` parameters the
/// last wins; when several entries share a relation the last entry wins.
pub fn parse_link_header(value: &str) -> RelLinks {
    let mut links = RelLinks::default();

    for entry in value.split(',') {
        let mut segments = entry.split(';');
        let Some(uri) = segments.next().and_then(bracketed_uri) else {
            continue;
        };

        let mut params = segments.peekable();
        if params.peek().is_none() {
            // No parameters at all.
            continue;
        }
        let rel = params.filter_map(rel_param).last().unwrap_or_default();

        let slot = match rel {
            "first" => &mut links.first,
            "next" => &mut links.next,
            "prev" => &mut links.prev,
            "last" => &mut links.last,
            _ => continue,
        };
        *slot = Some(uri.to_string());
    }

    links
}

fn bracketed_uri(segment: &str) -> Option<&str> {
    segment.trim().strip_prefix('<')?.strip_suffix('>')
}

fn rel_param(segment: &str) -> Option<&str> {
    let (key, value) = segment.trim().split_once('=')?;
    if key != "rel" {
        return None;
    }
    Some(
        value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_github_pagination_header() {
        let links = parse_link_header(
            r#"<https://api.github.com/repositories/8514/issues?page=2>; rel="next", <https://api.github.com/repositories/8514/issues?page=30>; rel="last""#,
        );
        assert_eq!(
            links,
            RelLinks {
                next: Some("https://api.github.com/repositories/8514/issues?page=2".to_string()),
                last: Some("https://api.github.com/repositories/8514/issues?page=30".to_string()),
                ..RelLinks::default()
            }
        );
        assert_eq!(
            links.next_page(),
            Some("https://api.github.com/repositories/8514/issues?page=2")
        );
    }

    #[test]
    fn all_four_relations() {
        let links = parse_link_header(
            r#"<U1>; rel="first", <U2>; rel="prev", <U3>; rel="next", <U4>; rel="last""#,
        );
        assert_eq!(links.first.as_deref(), Some("U1"));
        assert_eq!(links.prev.as_deref(), Some("U2"));
        assert_eq!(links.next.as_deref(), Some("U3"));
        assert_eq!(links.last.as_deref(), Some("U4"));
    }

    #[test]
    fn unquoted_rel_values_are_accepted() {
        let links = parse_link_header("<U1>; rel=next");
        assert_eq!(links.next.as_deref(), Some("U1"));
    }

    #[test]
    fn entries_without_rel_or_brackets_contribute_nothing() {
        let links = parse_link_header(r#"<U1>; title="x", U2; rel="next", <U3>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn unknown_relations_are_ignored() {
        let links = parse_link_header(r#"<U1>; rel="alternate", <U2>; rel="last""#);
        assert_eq!(
            links,
            RelLinks {
                last: Some("U2".to_string()),
                ..RelLinks::default()
            }
        );
    }

    #[test]
    fn last_rel_parameter_in_an_entry_wins() {
        let links = parse_link_header(r#"<U1>; rel="next"; rel="last""#);
        assert_eq!(links.next, None);
        assert_eq!(links.last.as_deref(), Some("U1"));
    }

    #[test]
    fn non_rel_parameters_do_not_reset_rel() {
        let links = parse_link_header(r#"<U1>; rel="next"; type="text/html""#);
        assert_eq!(links.next.as_deref(), Some("U1"));
    }

    #[test]
    fn values_may_contain_equals_signs() {
        let links = parse_link_header(r#"<U1>; rel="a=b", <U2>; rel=last"#);
        assert_eq!(links.last.as_deref(), Some("U2"));
        assert_eq!(links.next, None);
    }

    #[test]
    fn empty_header_yields_no_links() {
        assert!(parse_link_header("").is_empty());
    }

    #[test]
    fn serialises_only_present_relations() {
        let links = parse_link_header(r#"<U1>; rel="next""#);
        assert_eq!(serde_json::to_string(&links).unwrap(), r#"{"next":"U1"}"#);
    }
}
