//! Company map viewer: a single page that loads a CSV or XLSX file of
//! companies, shows it as a filterable table and plots the rows that carry
//! coordinates on a clustered map.

mod app;
mod components;
mod config;
mod file_reader;
mod leaflet;
mod utils;

use dioxus_logger::tracing::Level;

fn main() {
    if let Err(e) = dioxus_logger::init(Level::INFO) {
        web_sys::console::error_1(&format!("logger init failed: {e}").into());
    }
    dioxus::launch(app::App);
}
