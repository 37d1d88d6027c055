//! Filter rows editor.
//!
//! Each row picks a column and either a value from that column or "All".
//! Edits only change the pending rows; the table and map follow on Apply.

use companymap_core::{FilterRow, PageSession};
use dioxus::prelude::*;

#[component]
pub fn FilterPanel(mut session: Signal<PageSession>) -> Element {
    let (rows, headers) = {
        let session = session.read();
        (session.filter_rows().to_vec(), session.headers().as_slice().to_vec())
    };
    let has_columns = !headers.is_empty();

    rsx! {
        section { class: "filter-panel",
            div { id: "multiFilters", class: "filter-rows",
                for row in rows {
                    FilterRowEditor {
                        key: "{row.id}",
                        session,
                        row: row.clone(),
                        headers: headers.clone(),
                    }
                }
            }
            div { class: "filter-actions",
                button {
                    id: "addFilterBtn",
                    disabled: !has_columns,
                    onclick: move |_| {
                        session.write().add_filter();
                    },
                    "Add filter"
                }
                button {
                    id: "applyFiltersBtn",
                    onclick: move |_| session.write().apply_filters(),
                    "Apply"
                }
                button {
                    id: "clearFiltersBtn",
                    onclick: move |_| session.write().clear_filters(),
                    "Clear"
                }
            }
        }
    }
}

#[component]
fn FilterRowEditor(mut session: Signal<PageSession>, row: FilterRow, headers: Vec<String>) -> Element {
    let id = row.id;
    let choices = session.read().filter_value_choices(id);
    let current = row.value.clone().unwrap_or_default();

    rsx! {
        div { class: "filterRow",
            select {
                class: "filter-column",
                value: "{row.column}",
                onchange: move |e| {
                    session.write().set_filter_column(id, &e.value());
                },
                for header in headers.iter() {
                    option { value: "{header}", selected: *header == row.column, "{header}" }
                }
            }
            select {
                class: "filter-value",
                value: "{current}",
                onchange: move |e| {
                    let value = e.value();
                    session.write().set_filter_value(id, (!value.is_empty()).then_some(value));
                },
                option { value: "", selected: current.is_empty(), "All" }
                for choice in choices.iter() {
                    option { value: "{choice}", selected: *choice == current, "{choice}" }
                }
            }
            button {
                class: "filter-remove",
                title: "Remove filter",
                onclick: move |_| {
                    session.write().remove_filter(id);
                },
                "X"
            }
        }
    }
}
