//! Leaflet and Leaflet.markercluster bindings.
//!
//! Both libraries are loaded as page scripts (see `Dioxus.toml`) and reached
//! through the global `L` namespace. Every call that can throw is imported
//! with `catch` so a missing script surfaces as an `Err` instead of a trap.

use companymap_core::MarkerBatch;
use companymap_types::MapConfig;
use wasm_bindgen::prelude::*;

use crate::utils::{call_method, js_set};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn leaflet_map(element_id: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = L, js_name = tileLayer)]
    fn leaflet_tile_layer(url_template: &str, options: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = L, js_name = marker)]
    fn leaflet_marker(lat_lng: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = L, js_name = markerClusterGroup)]
    fn leaflet_marker_cluster_group() -> Result<JsValue, JsValue>;
}

fn lat_lng(lat: f64, lng: f64) -> JsValue {
    js_sys::Array::of2(&JsValue::from_f64(lat), &JsValue::from_f64(lng)).into()
}

/// A mounted map with at most one marker cluster layer.
pub struct LeafletMap {
    map: JsValue,
    cluster: Option<JsValue>,
}

impl LeafletMap {
    /// Create the map inside the element with `element_id` and add the tile layer.
    pub fn mount(element_id: &str, config: &MapConfig) -> Result<Self, JsValue> {
        let map = leaflet_map(element_id)?;
        call_method(
            &map,
            "setView",
            &[
                &lat_lng(config.center[0], config.center[1]),
                &JsValue::from_f64(config.zoom as f64),
            ],
        )?;

        let options = js_sys::Object::new();
        js_set(&options, "maxZoom", &JsValue::from_f64(config.max_zoom as f64));
        js_set(&options, "attribution", &JsValue::from_str(&config.attribution));
        let tiles = leaflet_tile_layer(&config.tile_url, &options)?;
        call_method(&tiles, "addTo", &[&map])?;

        tracing::debug!(element_id, zoom = config.zoom, "Mounted map");
        Ok(Self { map, cluster: None })
    }

    /// Replace every marker on the map with `batch`.
    ///
    /// The cluster layer is created on first use, emptied on later calls and
    /// re-attached if something removed it.
    pub fn show_markers(&mut self, batch: &MarkerBatch) -> Result<(), JsValue> {
        let cluster = match &self.cluster {
            Some(cluster) => {
                call_method(cluster, "clearLayers", &[])?;
                cluster.clone()
            }
            None => {
                let cluster = leaflet_marker_cluster_group()?;
                self.cluster = Some(cluster.clone());
                cluster
            }
        };

        let layers = js_sys::Array::new();
        for marker in batch.iter() {
            let layer = leaflet_marker(&lat_lng(marker.position.lat, marker.position.lng))?;
            call_method(&layer, "bindPopup", &[&JsValue::from_str(&marker.popup_html())])?;
            layers.push(&layer);
        }
        call_method(&cluster, "addLayers", &[&layers])?;

        let attached = call_method(&self.map, "hasLayer", &[&cluster])?
            .as_bool()
            .unwrap_or(false);
        if !attached {
            call_method(&self.map, "addLayer", &[&cluster])?;
        }
        Ok(())
    }
}
