//! Page session controller.
//!
//! One [`PageSession`] holds everything the page knows: the last-loaded
//! dataset, the popup column selection, the filter rows being edited and the
//! output of the latest render pass. It is created once at startup and reset
//! by each successful load.
//!
//! ```text
//!   load ──► Dataset ──► FilterSet::evaluate ──► view (row indices)
//!                                                  │
//!                               ┌──────────────────┴──────────────────┐
//!                               ▼                                     ▼
//!                          TableView                             MarkerBatch
//! ```
//!
//! Editing filter rows never touches the view; only load, apply, clear and
//! popup-column toggles run a render pass.

use companymap_types::CoordinateAliases;
use serde::Serialize;

use crate::dataset::{Dataset, HeaderSet, Row};
use crate::error::IngestError;
use crate::filter::{FilterId, FilterRow, FilterSet};
use crate::ingest::{self, FileKind, SourceFile};
use crate::markers::{self, MarkerBatch};
use crate::popup::PopupColumns;
use crate::table::TableView;


/// Outcome of a successful load, for status display and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub source: String,
    pub kind: FileKind,
    pub rows: usize,
    pub columns: usize,
    pub markers: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PageSession {
    aliases: CoordinateAliases,
    source: Option<String>,
    dataset: Dataset,
    popup: PopupColumns,
    filters: FilterSet,
    view: Vec<usize>,
    table: TableView,
    markers: MarkerBatch,
    render_pass: u64,
}

impl PageSession {
    pub fn new(aliases: CoordinateAliases) -> Self {
        Self {
            aliases,
            ..Self::default()
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────────

    /// Load a user-chosen file. `None` (nothing picked) leaves the session
    /// untouched. On error the previous dataset stays in place.
    pub fn load(&mut self, file: Option<&SourceFile>) -> Result<Option<LoadSummary>, IngestError> {
        let Some(file) = file else {
            return Ok(None);
        };
        let dataset = ingest::read_dataset(file)?;
        Ok(Some(self.replace_dataset(&file.name, file.kind(), dataset)))
    }

    /// Swap in a new dataset: popup selection back to all columns, filter rows
    /// dropped, full dataset rendered.
    pub fn replace_dataset(&mut self, source: &str, kind: FileKind, dataset: Dataset) -> LoadSummary {
        self.popup = PopupColumns::all(dataset.headers());
        self.filters.clear();
        self.view = (0..dataset.len()).collect();
        self.dataset = dataset;
        self.source = Some(source.to_string());
        self.render();

        let summary = LoadSummary {
            source: source.to_string(),
            kind,
            rows: self.dataset.len(),
            columns: self.dataset.headers().len(),
            markers: self.markers.len(),
            skipped: self.markers.skipped,
        };
        tracing::info!(
            source,
            %kind,
            rows = summary.rows,
            columns = summary.columns,
            markers = summary.markers,
            "Loaded dataset"
        );
        summary
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Filter Rows
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a filter row on the first column. No-op without headers.
    pub fn add_filter(&mut self) -> Option<FilterId> {
        let column = self.dataset.headers().first()?.to_string();
        Some(self.filters.add(column))
    }

    pub fn remove_filter(&mut self, id: FilterId) -> bool {
        self.filters.remove(id)
    }

    pub fn set_filter_column(&mut self, id: FilterId, column: &str) -> bool {
        if !self.dataset.headers().contains(column) {
            return false;
        }
        self.filters.set_column(id, column, &self.dataset)
    }

    pub fn set_filter_value(&mut self, id: FilterId, value: Option<String>) -> bool {
        self.filters.set_value(id, value)
    }

    pub fn filter_rows(&self) -> &[FilterRow] {
        self.filters.as_slice()
    }

    /// Value choices for a filter row: distinct non-empty values of its column
    /// across the full dataset, not the current view.
    pub fn filter_value_choices(&self, id: FilterId) -> Vec<String> {
        self.filters
            .get(id)
            .map(|row| self.dataset.distinct_values(&row.column))
            .unwrap_or_default()
    }

    /// Recompute the view from the current filter rows and render it.
    pub fn apply_filters(&mut self) {
        self.view = self.filters.evaluate(&self.dataset);
        tracing::debug!(
            filters = self.filters.active_count(),
            matched = self.view.len(),
            total = self.dataset.len(),
            "Applied filters"
        );
        self.render();
    }

    /// Drop every filter row and render the full dataset.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.view = (0..self.dataset.len()).collect();
        self.render();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Popup Columns
    // ─────────────────────────────────────────────────────────────────────────

    /// Show or hide a popup column, then re-apply the current filter rows so
    /// popups refresh without an explicit apply.
    pub fn set_popup_column(&mut self, column: &str, shown: bool) {
        self.popup.set(self.dataset.headers(), column, shown);
        self.apply_filters();
    }

    /// Show exactly `columns` (unknown names ignored) with a single re-apply.
    pub fn set_popup_selection(&mut self, columns: &[String]) {
        self.popup = PopupColumns::only(self.dataset.headers(), columns);
        self.apply_filters();
    }

    pub fn popup_columns(&self) -> &PopupColumns {
        &self.popup
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    fn render(&mut self) {
        let rows = self.view.iter().filter_map(|&idx| self.dataset.row(idx));
        self.table = TableView::build(self.dataset.headers(), rows);
        self.markers = markers::build(self.view_rows(), &self.popup, &self.aliases);
        self.render_pass += 1;
    }

    /// Rows of the current view with their dataset indices.
    pub fn view_rows(&self) -> impl Iterator<Item = (usize, &Row)> + '_ {
        self.view
            .iter()
            .filter_map(|&idx| self.dataset.row(idx).map(|row| (idx, row)))
    }

    pub fn table(&self) -> &TableView {
        &self.table
    }

    pub fn markers(&self) -> &MarkerBatch {
        &self.markers
    }

    /// Incremented by every render pass; lets the map redraw only when the
    /// view was actually recomputed.
    pub fn render_pass(&self) -> u64 {
        self.render_pass
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn headers(&self) -> &HeaderSet {
        self.dataset.headers()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    pub fn aliases(&self) -> &CoordinateAliases {
        &self.aliases
    }
}
