use companymap_core::PageSession;
use companymap_types::formatting::format_count;
use dioxus::prelude::*;

/// The current view as an HTML table, rebuilt on every render pass.
#[component]
pub fn CompanyTable(session: Signal<PageSession>) -> Element {
    let session = session.read();
    let table = session.table();
    let status = format!(
        "{} of {}",
        format_count(table.row_count(), "row", "rows"),
        session.dataset().len()
    );

    rsx! {
        section { class: "table-panel",
            div { class: "table-status", "{status}" }
            div { class: "table-scroll",
                table { id: "companyTable",
                    thead {
                        tr {
                            for header in table.headers.iter() {
                                th { "{header}" }
                            }
                        }
                    }
                    tbody {
                        for (idx, row) in table.rows.iter().enumerate() {
                            tr { key: "{idx}",
                                for cell in row.iter() {
                                    td { "{cell}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
