//! In-memory dataset model.
//!
//! A [`Dataset`] is the canonical row set produced by one file load. Rows are
//! never mutated after construction; a new load replaces the whole value.

use hashbrown::{HashMap, HashSet};
use serde::Serialize;

/// Ordered, de-duplicated column names of the current dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HeaderSet {
    columns: Vec<String>,
}

impl HeaderSet {
    /// Build from a raw header record. Repeated names keep their first
    /// position.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for name in names {
            let name = name.into();
            if seen.insert(name.clone()) {
                columns.push(name);
            }
        }
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.columns
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn first(&self) -> Option<&str> {
        self.columns.first().map(String::as_str)
    }
}

/// One record, keyed by column name.
///
/// Keys absent from the map are *missing* (the source record was shorter than
/// the header); a present key may still hold an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: HashMap<String, String>,
}

impl Row {
    /// Zip a record against the raw header names by position.
    ///
    /// Assignment runs left to right, so when a header name repeats the later
    /// column decides the value (and a missing later value removes it).
    pub fn from_record(header: &[String], values: &[Option<String>]) -> Self {
        let mut cells = HashMap::with_capacity(header.len());
        for (idx, name) in header.iter().enumerate() {
            match values.get(idx) {
                Some(Some(value)) => {
                    cells.insert(name.clone(), value.clone());
                }
                _ => {
                    cells.remove(name);
                }
            }
        }
        Self { cells }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Value of `column` if present and not empty.
    pub fn non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|v| !v.is_empty())
    }

    /// Display text for a table cell: missing keys render as empty.
    pub fn cell(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Rows plus the header set they share.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    headers: HeaderSet,
    rows: Vec<Row>,
}

impl Dataset {
    /// Build from a decoded grid: first record is the header, every following
    /// record becomes a row by positional zip.
    ///
    /// An empty grid yields an empty dataset with no headers. Blank header
    /// cells become the empty column name.
    pub fn from_grid(grid: Vec<Vec<Option<String>>>) -> Self {
        let mut records = grid.into_iter();
        let Some(header_record) = records.next() else {
            return Self::default();
        };
        let header: Vec<String> = header_record
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect();
        let rows = records.map(|r| Row::from_record(&header, &r)).collect();
        Self {
            headers: HeaderSet::from_names(header),
            rows,
        }
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, idx: usize) -> Option<&Row> {
        self.rows.get(idx)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct non-empty values of `column` across every row, in first-seen
    /// order.
    pub fn distinct_values(&self, column: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter_map(|row| row.non_empty(column))
            .filter(|v| seen.insert(*v))
            .map(str::to_string)
            .collect()
    }
}
