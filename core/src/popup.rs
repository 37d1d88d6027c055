use serde::Serialize;

use crate::dataset::HeaderSet;

/// Columns shown in marker popups, kept in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PopupColumns {
    selected: Vec<String>,
}

impl PopupColumns {
    /// Every column of `headers` selected (the state after each load).
    pub fn all(headers: &HeaderSet) -> Self {
        Self {
            selected: headers.as_slice().to_vec(),
        }
    }

    /// Exactly the `columns` that exist in `headers`, in header order.
    pub fn only(headers: &HeaderSet, columns: &[String]) -> Self {
        Self {
            selected: headers
                .iter()
                .filter(|h| columns.iter().any(|c| c.as_str() == *h))
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn is_selected(&self, column: &str) -> bool {
        self.selected.iter().any(|c| c == column)
    }

    /// Show or hide one column. Unknown columns are ignored.
    pub fn set(&mut self, headers: &HeaderSet, column: &str, shown: bool) {
        if !headers.contains(column) {
            return;
        }
        self.selected = headers
            .iter()
            .filter(|h| if *h == column { shown } else { self.is_selected(h) })
            .map(str::to_string)
            .collect();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
