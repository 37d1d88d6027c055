use serde::Serialize;

use crate::dataset::{HeaderSet, Row};

/// Render model for the company table: header cells plus one text cell per
/// header for every row. Rebuilt in full on each render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn build<'a, I>(headers: &HeaderSet, rows: I) -> Self
    where
        I: IntoIterator<Item = &'a Row>,
    {
        let rows = rows
            .into_iter()
            .map(|row| headers.iter().map(|h| row.cell(h).to_string()).collect())
            .collect();
        Self {
            headers: headers.as_slice().to_vec(),
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Same headers, only the first `limit` rows.
    pub fn head(&self, limit: usize) -> TableView {
        Self {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(limit).cloned().collect(),
        }
    }

    /// Tab-separated preview of the header plus the first `limit` rows.
    pub fn preview(&self, limit: usize) -> String {
        let mut out = self.headers.join("\t");
        for row in self.rows.iter().take(limit) {
            out.push('\n');
            out.push_str(&row.join("\t"));
        }
        out
    }
}
