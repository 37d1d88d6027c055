//! Column = value filters.
//!
//! Filter rows are plain data edited by the UI; evaluation reads the list as
//! it stands, there is no cached result between applies.

use std::fmt;

use serde::Serialize;

use crate::dataset::{Dataset, Row};

/// Stable identifier of a filter row within one [`FilterSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FilterId(u32);

impl FilterId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user-defined constraint. `value == None` means "all values".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterRow {
    pub id: FilterId,
    pub column: String,
    pub value: Option<String>,
}

impl FilterRow {
    pub fn is_constrained(&self) -> bool {
        self.value.is_some()
    }

    /// Whether `row` satisfies this constraint. Missing cells never match a
    /// concrete value.
    pub fn matches(&self, row: &Row) -> bool {
        match &self.value {
            None => true,
            Some(value) => row.get(&self.column) == Some(value.as_str()),
        }
    }
}

/// Ordered collection of filter rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    rows: Vec<FilterRow>,
    next_id: u32,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an unconstrained row on `column`.
    pub fn add(&mut self, column: impl Into<String>) -> FilterId {
        let id = FilterId(self.next_id);
        self.next_id += 1;
        self.rows.push(FilterRow {
            id,
            column: column.into(),
            value: None,
        });
        id
    }

    pub fn remove(&mut self, id: FilterId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.id != id);
        self.rows.len() != before
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn get(&self, id: FilterId) -> Option<&FilterRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    fn get_mut(&mut self, id: FilterId) -> Option<&mut FilterRow> {
        self.rows.iter_mut().find(|r| r.id == id)
    }

    /// Point a row at another column. The current value survives only when the
    /// new column offers it as a choice; otherwise it resets to "all".
    pub fn set_column(&mut self, id: FilterId, column: &str, dataset: &Dataset) -> bool {
        let Some(row) = self.get_mut(id) else {
            return false;
        };
        if row.column != column {
            row.column = column.to_string();
            let still_valid = row
                .value
                .as_deref()
                .is_some_and(|v| dataset.rows().iter().any(|r| r.get(column) == Some(v)));
            if !still_valid {
                row.value = None;
            }
        }
        true
    }

    /// Set the value of a row. An empty string is treated as "all".
    pub fn set_value(&mut self, id: FilterId, value: Option<String>) -> bool {
        let Some(row) = self.get_mut(id) else {
            return false;
        };
        row.value = value.filter(|v| !v.is_empty());
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterRow> {
        self.rows.iter()
    }

    pub fn as_slice(&self) -> &[FilterRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows that actually constrain the view.
    pub fn active_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_constrained()).count()
    }

    /// Indices of dataset rows satisfying every constraint (logical AND), in
    /// dataset order.
    pub fn evaluate(&self, dataset: &Dataset) -> Vec<usize> {
        let active: Vec<&FilterRow> = self.rows.iter().filter(|r| r.is_constrained()).collect();
        dataset
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| active.iter().all(|f| f.matches(row)))
            .map(|(idx, _)| idx)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        let records: &[&[&str]] = &[
            &["name", "city", "sector"],
            &["Acme", "Milano", "steel"],
            &["Beta", "Roma", "food"],
            &["Gamma", "Milano", "food"],
            &["Delta", "", "steel"],
        ];
        Dataset::from_grid(
            records
                .iter()
                .map(|r| r.iter().map(|v| Some(v.to_string())).collect())
                .collect(),
        )
    }

    #[test]
    fn test_no_constraints_keeps_everything() {
        let ds = dataset();
        let mut filters = FilterSet::new();
        filters.add("city");
        assert_eq!(filters.evaluate(&ds), vec![0, 1, 2, 3]);
        assert_eq!(filters.active_count(), 0);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let ds = dataset();
        let mut filters = FilterSet::new();
        let city = filters.add("city");
        let sector = filters.add("sector");
        filters.set_value(city, Some("Milano".into()));
        assert_eq!(filters.evaluate(&ds), vec![0, 2]);

        filters.set_value(sector, Some("food".into()));
        assert_eq!(filters.evaluate(&ds), vec![2]);
    }

    #[test]
    fn test_empty_value_means_all() {
        let ds = dataset();
        let mut filters = FilterSet::new();
        let id = filters.add("city");
        filters.set_value(id, Some(String::new()));
        assert!(!filters.get(id).unwrap().is_constrained());
        assert_eq!(filters.evaluate(&ds).len(), 4);
    }

    #[test]
    fn test_remove_and_clear() {
        let ds = dataset();
        let mut filters = FilterSet::new();
        let a = filters.add("city");
        let b = filters.add("sector");
        filters.set_value(a, Some("Roma".into()));
        assert!(filters.remove(a));
        assert!(!filters.remove(a));
        assert_eq!(filters.len(), 1);
        assert_eq!(filters.get(b).unwrap().column, "sector");
        assert_eq!(filters.evaluate(&ds).len(), 4);

        filters.clear();
        assert!(filters.is_empty());
        // Ids are not reused after removal
        assert_ne!(filters.add("name"), a);
    }

    #[test]
    fn test_set_column_resets_invalid_value() {
        let ds = dataset();
        let mut filters = FilterSet::new();
        let id = filters.add("city");
        filters.set_value(id, Some("Milano".into()));

        filters.set_column(id, "sector", &ds);
        let row = filters.get(id).unwrap();
        assert_eq!(row.column, "sector");
        assert_eq!(row.value, None);
    }

    #[test]
    fn test_set_column_keeps_value_still_offered() {
        let ds = Dataset::from_grid(vec![
            vec![Some("from".into()), Some("to".into())],
            vec![Some("Roma".into()), Some("Milano".into())],
            vec![Some("Milano".into()), Some("Roma".into())],
        ]);
        let mut filters = FilterSet::new();
        let id = filters.add("from");
        filters.set_value(id, Some("Roma".into()));
        filters.set_column(id, "to", &ds);
        assert_eq!(filters.get(id).unwrap().value.as_deref(), Some("Roma"));
    }

    #[test]
    fn test_missing_cell_never_matches() {
        let ds = dataset();
        let mut filters = FilterSet::new();
        let id = filters.add("ghost");
        filters.set_value(id, Some("x".into()));
        assert!(filters.evaluate(&ds).is_empty());
    }
}
