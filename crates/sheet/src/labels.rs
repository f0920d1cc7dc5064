//! Story-point extraction from comma-separated label strings.
//!
//! Estimates that the board cannot hold natively (pessimistic and optimistic
//! story points) are encoded as labels such as `psp_5` or `osp_0.5`. This
//! module pulls one such token out of a label string and returns the point
//! value together with the label string minus that token.
//!
//! Matching is by plain substring: a prefix that occurs inside an unrelated
//! label (`sp_` inside `osp_5`) will match there. Callers choose prefixes
//! that do not overlap.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Prefix
// ---------------------------------------------------------------------------

/// A label prefix that marks a story-point token, e.g. `"psp_"`.
///
/// Guaranteed non-empty and free of commas; a comma-bearing prefix could
/// never match a single label token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LabelPrefix(String);

impl LabelPrefix {
    /// Creates a prefix, returning `None` if `value` is empty or contains a comma.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.is_empty() || v.contains(',') {
            None
        } else {
            Some(Self(v))
        }
    }

    /// Returns the prefix as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LabelPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for LabelPrefix {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value.clone())
            .ok_or_else(|| format!("invalid label prefix '{value}': must be non-empty and contain no comma"))
    }
}

impl From<LabelPrefix> for String {
    fn from(prefix: LabelPrefix) -> Self {
        prefix.0
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Result of [`extract_point`].
#[derive(Debug, Clone, PartialEq)]
pub struct PointExtraction {
    /// The number following the prefix; `NaN` when the prefix was not found
    /// or the token's remainder is not numeric.
    pub point: f64,
    /// The input labels with the matched token and one adjoining comma removed.
    pub new_labels: String,
}

/// Extracts the first `prefix`-marked point token from `labels`.
///
/// The token starts at the first occurrence of `prefix` and runs to the next
/// comma or the end of the string. Exactly that token and one separator are
/// removed from the returned labels:
///
/// ```
/// use sheet::{extract_point, LabelPrefix};
///
/// let osp = LabelPrefix::new("osp_").unwrap();
/// let result = extract_point("enhancement,osp_5,psp_13", &osp);
/// assert_eq!(result.point, 5.0);
/// assert_eq!(result.new_labels, "enhancement,psp_13");
/// ```
pub fn extract_point(labels: &str, prefix: &LabelPrefix) -> PointExtraction {
    let Some(start) = labels.find(prefix.as_str()) else {
        return PointExtraction {
            point: f64::NAN,
            new_labels: labels.to_string(),
        };
    };

    let value_start = start + prefix.as_str().len();
    let next_comma = labels[value_start..].find(',').map(|i| value_start + i);
    let value_end = next_comma.unwrap_or(labels.len());
    let point = parse_point(&labels[value_start..value_end]);

    let new_labels = match next_comma {
        // Drop the token and the comma that follows it.
        Some(comma) => format!("{}{}", &labels[..start], &labels[comma + 1..]),
        None if start == 0 => String::new(),
        // Last token: drop it and the separator in front of it.
        None => {
            let mut kept = labels[..start].to_string();
            kept.pop();
            kept
        }
    };

    PointExtraction { point, new_labels }
}

/// Parses the text after a prefix the way a spreadsheet script coerces a
/// string to a number.
///
/// This is the decimal subset of `Number()` coercion. Surrounding whitespace
/// is ignored and blank text is `0`. Decimal and exponent notation and a
/// signed `Infinity` are accepted; anything else (hex and other radix
/// prefixes included) is `NaN`.
pub fn parse_point(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if !is_decimal_text(trimmed) {
        return f64::NAN;
    }

    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Returns `true` if `text` is non-empty and made only of decimal digits,
/// `.`, signs and exponent markers.
///
/// `f64::from_str` also accepts `inf`, `nan` and friends; text passing this
/// check can still fail to parse (`1.2.3`), but never parses as one of those.
pub fn is_decimal_text(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
}
