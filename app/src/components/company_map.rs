use companymap_core::PageSession;
use companymap_types::MapConfig;
use companymap_types::formatting::format_count;
use dioxus::prelude::*;

use crate::leaflet::LeafletMap;

const MAP_ELEMENT_ID: &str = "map";

/// Clustered marker map. Markers are redrawn only when the session runs a
/// render pass, not on filter edits.
#[component]
pub fn CompanyMap(session: Signal<PageSession>, config: MapConfig) -> Element {
    let mut map = use_signal(|| None::<LeafletMap>);
    let render_pass = use_memo(move || session.read().render_pass());

    use_effect(move || {
        let pass = render_pass();
        let mut slot = map.write();
        if slot.is_none() {
            match LeafletMap::mount(MAP_ELEMENT_ID, &config) {
                Ok(mounted) => *slot = Some(mounted),
                Err(e) => {
                    tracing::error!(error = ?e, "Failed to initialize map");
                    return;
                }
            }
        }
        if let Some(leaflet) = slot.as_mut() {
            let session = session.peek();
            match leaflet.show_markers(session.markers()) {
                Ok(()) => tracing::debug!(pass, markers = session.markers().len(), "Redrew markers"),
                Err(e) => tracing::warn!(pass, error = ?e, "Failed to draw markers"),
            }
        }
    });

    let status = {
        let session = session.read();
        let markers = session.markers();
        match markers.skipped {
            0 => format_count(markers.len(), "marker", "markers"),
            skipped => format!(
                "{}, {} without coordinates",
                format_count(markers.len(), "marker", "markers"),
                format_count(skipped, "row", "rows")
            ),
        }
    };

    rsx! {
        section { class: "map-panel",
            div { id: MAP_ELEMENT_ID, class: "map" }
            div { class: "map-status", "{status}" }
        }
    }
}
