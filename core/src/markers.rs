//! Marker construction for the map view.
//!
//! Markers are rebuilt from scratch on every render pass; there is no
//! incremental diffing against the previous batch.

use companymap_types::CoordinateAliases;
use companymap_types::formatting::escape_html;
use serde::Serialize;

use crate::dataset::Row;
use crate::geo::{self, LatLng};
use crate::popup::PopupColumns;

/// One `label: value` line of a marker popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupLine {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// Index of the source row in the full dataset.
    pub row: usize,
    pub position: LatLng,
    pub popup: Vec<PopupLine>,
}

impl Marker {
    /// Popup body as HTML, one `<strong>label:</strong> value<br>` per line.
    pub fn popup_html(&self) -> String {
        self.popup
            .iter()
            .map(|line| {
                format!(
                    "<strong>{}:</strong> {}<br>",
                    escape_html(&line.label),
                    escape_html(&line.value)
                )
            })
            .collect()
    }
}

/// Markers for one render pass plus the number of rows left off the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarkerBatch {
    pub markers: Vec<Marker>,
    pub skipped: usize,
}

impl MarkerBatch {
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }
}

fn popup_lines(row: &Row, popup: &PopupColumns) -> Vec<PopupLine> {
    popup
        .iter()
        .filter_map(|column| {
            row.non_empty(column).map(|value| PopupLine {
                label: column.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

/// Build one marker per row with a resolvable position.
///
/// `rows` yields `(dataset index, row)` pairs in view order.
pub fn build<'a, I>(rows: I, popup: &PopupColumns, aliases: &CoordinateAliases) -> MarkerBatch
where
    I: IntoIterator<Item = (usize, &'a Row)>,
{
    let mut batch = MarkerBatch::default();
    for (idx, row) in rows {
        match geo::resolve(row, aliases) {
            Some(position) => batch.markers.push(Marker {
                row: idx,
                position,
                popup: popup_lines(row, popup),
            }),
            None => batch.skipped += 1,
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, HeaderSet};

    fn dataset(records: &[&[&str]]) -> Dataset {
        Dataset::from_grid(
            records
                .iter()
                .map(|r| r.iter().map(|v| Some(v.to_string())).collect())
                .collect(),
        )
    }

    #[test]
    fn test_one_marker_per_resolvable_row() {
        let ds = dataset(&[
            &["name", "lat", "lng"],
            &["Acme", "45.0", "9.0"],
            &["Beta", "", ""],
            &["Gamma", "41.9", "12.5"],
        ]);
        let popup = PopupColumns::all(ds.headers());
        let batch = build(ds.rows().iter().enumerate(), &popup, &CoordinateAliases::default());

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.skipped, 1);
        assert_eq!(batch.markers[0].row, 0);
        assert_eq!(batch.markers[1].row, 2);
        assert_eq!(batch.markers[1].position, LatLng { lat: 41.9, lng: 12.5 });
    }

    #[test]
    fn test_popup_omits_empty_and_unselected_columns() {
        let ds = dataset(&[
            &["name", "city", "lat", "lng"],
            &["Acme", "", "45.0", "9.0"],
        ]);
        let headers: &HeaderSet = ds.headers();
        let mut popup = PopupColumns::all(headers);
        popup.set(headers, "lng", false);

        let batch = build(ds.rows().iter().enumerate(), &popup, &CoordinateAliases::default());
        let labels: Vec<_> = batch.markers[0].popup.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["name", "lat"]);
    }

    #[test]
    fn test_popup_html_escapes() {
        let marker = Marker {
            row: 0,
            position: LatLng { lat: 0.0, lng: 0.0 },
            popup: vec![
                PopupLine { label: "name".into(), value: "A&B <Srl>".into() },
                PopupLine { label: "city".into(), value: "Milano".into() },
            ],
        };
        assert_eq!(
            marker.popup_html(),
            "<strong>name:</strong> A&amp;B &lt;Srl&gt;<br><strong>city:</strong> Milano<br>"
        );
    }
}
