use companymap_core::PageSession;
use dioxus::prelude::*;

/// Toggle menu with one checkbox per column. Changing a box refreshes the
/// popups right away using the current filter rows.
#[component]
pub fn PopupColumnsMenu(mut session: Signal<PageSession>) -> Element {
    let mut open = use_signal(|| false);
    let columns: Vec<(String, bool)> = {
        let session = session.read();
        let popup = session.popup_columns();
        session
            .headers()
            .iter()
            .map(|column| (column.to_string(), popup.is_selected(column)))
            .collect()
    };

    rsx! {
        div { class: "popup-columns",
            button {
                id: "popupColumnsBtn",
                onclick: move |_| {
                    let was_open = open();
                    open.set(!was_open);
                },
                "Popup columns"
            }
            div {
                id: "popupColumnsMenu",
                class: if open() { "popup-menu" } else { "popup-menu hidden" },
                if columns.is_empty() {
                    span { class: "popup-menu-empty", "Load a file first" }
                }
                for (column, shown) in columns {
                    label { key: "{column}", class: "popup-menu-item",
                        input {
                            r#type: "checkbox",
                            value: "{column}",
                            checked: shown,
                            onchange: {
                                let column = column.clone();
                                move |e: FormEvent| session.write().set_popup_column(&column, e.checked())
                            },
                        }
                        "{column}"
                    }
                }
            }
        }
    }
}
