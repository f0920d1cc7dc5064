//! Shared value types: the spreadsheet-style [`Table`] and its [`Cell`]s.
//!
//! A [`Table`] is a plain ordered list of rows where row 0 is the header.
//! Rows are not required to match the header's length; reading past the end
//! of a short row yields [`Cell::Missing`] rather than failing.

use serde::{Deserialize, Serialize, Serializer};

use crate::IssueKey;

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

/// One heterogeneous scalar value in a table.
///
/// Serialises to JSON as the natural scalar: string, number, bool, or `null`
/// for [`Cell::Missing`]. Whole numbers are written as integers (`3`, not
/// `3.0`). A `NaN` number has no JSON representation and is written as `null`
/// as well.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// No value (a short row, an unmatched join, or an explicit `null`).
    #[default]
    Missing,
    /// A boolean flag, e.g. `is_epic`.
    Bool(bool),
    /// Any numeric value, including `NaN` for unparsable point tokens.
    Number(f64),
    /// Free text.
    String(String),
}

impl Cell {
    /// Returns `true` for [`Cell::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Returns the text of a [`Cell::String`], `None` for other variants.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value of a [`Cell::Number`], `None` for other variants.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value of a [`Cell::Bool`], `None` for other variants.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Cell::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Renders the cell the way a spreadsheet script would stringify it.
    ///
    /// Integral numbers carry no fractional part (`123.0` → `"123"`), `NaN`
    /// renders as `"NaN"`, and [`Cell::Missing`] renders as the empty string.
    pub fn render(&self) -> String {
        match self {
            Cell::Missing => String::new(),
            Cell::Bool(b) => b.to_string(),
            Cell::Number(n) => format_number(*n),
            Cell::String(s) => s.clone(),
        }
    }

    /// Normalises the cell into an issue lookup key.
    ///
    /// Both sides of the join go through this, so `Number(123.0)` and
    /// `String("123")` produce the same key. Missing and empty cells have no
    /// key and therefore never match anything.
    pub fn key(&self) -> Option<IssueKey> {
        if self.is_missing() {
            return None;
        }
        IssueKey::new(self.render())
    }

    /// Returns `true` if the cell holds a truthy flag: `Bool(true)` or the
    /// text `true` in any case.
    pub fn is_truthy_flag(&self) -> bool {
        match self {
            Cell::Bool(b) => *b,
            Cell::String(s) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

/// Largest magnitude below which every integer is exactly representable.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Missing => serializer.serialize_none(),
            Cell::Bool(b) => serializer.serialize_bool(*b),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                // Exact: integral and within the safe range. Also maps -0.0 to 0.
                serializer.serialize_i64(*n as i64)
            }
            Cell::Number(n) => serializer.serialize_f64(*n),
            Cell::String(s) => serializer.serialize_str(s),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        // Covers -0.0 as well.
        "0".to_string()
    } else {
        n.to_string()
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::String(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::String(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::Number(f64::from(value))
    }
}

impl From<u32> for Cell {
    fn from(value: u32) -> Self {
        Cell::Number(f64::from(value))
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        // Issue numbers are far below 2^53; precision loss is not a concern.
        Cell::Number(value as f64)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Missing, Into::into)
    }
}

/// Builds a `Vec<Cell>` from heterogeneous literals.
///
/// ```
/// use sheet::{cells, Cell};
///
/// let row = cells!["123", 0, false];
/// assert_eq!(row, vec![Cell::from("123"), Cell::Number(0.0), Cell::Bool(false)]);
/// ```
#[macro_export]
macro_rules! cells {
    () => {
        ::std::vec::Vec::<$crate::Cell>::new()
    };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::Cell::from($value)),+]
    };
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// An ordered sequence of rows; row 0 is the header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Creates a table from raw rows (header first).
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Creates a table holding only a header row.
    pub fn with_header<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let header = names.into_iter().map(|n| Cell::String(n.into())).collect();
        Self { rows: vec![header] }
    }

    /// Appends a row after the existing rows.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Returns the header row, or an empty slice for a table with no rows.
    pub fn header(&self) -> &[Cell] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns every row after the header.
    pub fn data_rows(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Returns `true` if the table has a header and at least one data row.
    pub fn has_data(&self) -> bool {
        self.rows.len() >= 2
    }

    /// Returns all rows, header included.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Consumes the table and returns its rows, header included.
    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.rows
    }
}

/// Reads `row[index]`, yielding [`Cell::Missing`] past the end of a short row.
pub fn cell_at(row: &[Cell], index: usize) -> Cell {
    row.get(index).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_render_like_a_spreadsheet_script() {
        assert_eq!(Cell::Number(123.0).render(), "123");
        assert_eq!(Cell::Number(0.5).render(), "0.5");
        assert_eq!(Cell::Number(-0.0).render(), "0");
        assert_eq!(Cell::Number(f64::NAN).render(), "NaN");
        assert_eq!(Cell::Number(f64::NEG_INFINITY).render(), "-Infinity");
    }

    #[test]
    fn string_and_number_identifiers_share_a_key() {
        assert_eq!(Cell::from("123").key(), Cell::from(123).key());
        assert!(Cell::Missing.key().is_none());
        assert!(Cell::from("").key().is_none());
    }

    #[test]
    fn truthy_flags() {
        assert!(Cell::Bool(true).is_truthy_flag());
        assert!(Cell::from("TRUE").is_truthy_flag());
        assert!(!Cell::from("yes").is_truthy_flag());
        assert!(!Cell::Number(1.0).is_truthy_flag());
    }

    #[test]
    fn header_and_data_rows_of_degenerate_tables() {
        let empty = Table::default();
        assert!(empty.header().is_empty());
        assert!(empty.data_rows().is_empty());
        assert!(!empty.has_data());

        let header_only = Table::with_header(["number"]);
        assert_eq!(header_only.header(), &[Cell::from("number")]);
        assert!(header_only.data_rows().is_empty());
        assert!(!header_only.has_data());
    }

    #[test]
    fn short_rows_read_as_missing() {
        let row = cells!["a"];
        assert_eq!(cell_at(&row, 0), Cell::from("a"));
        assert_eq!(cell_at(&row, 3), Cell::Missing);
    }

    #[test]
    fn whole_numbers_serialise_as_integers() {
        let row = cells![3, -0.0, 0.5, 1e300, f64::INFINITY];
        assert_eq!(serde_json::to_string(&row).unwrap(), "[3,0,0.5,1e300,null]");
    }

    #[test]
    fn cells_serialise_as_plain_json_scalars() {
        let row = cells!["New Issues", 0, false, Cell::Missing, f64::NAN];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"["New Issues",0,false,null,null]"#);

        let parsed: Table = serde_json::from_str(r#"[["number"],["123"],[456],[true],[null]]"#).unwrap();
        assert_eq!(
            parsed.data_rows(),
            &[
                cells!["123"],
                cells![456],
                cells![true],
                vec![Cell::Missing]
            ]
        );
    }
}
