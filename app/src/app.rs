use companymap_core::PageSession;
use dioxus::prelude::*;

use crate::components::{
    CompanyMap, CompanyTable, FileChooser, FilterPanel, PopupColumnsMenu, ToastFrame,
    use_toast_provider,
};
use crate::config::load_config;

const MAIN_CSS: Asset = asset!("/assets/main.css");

/// Page root. Owns the one [`PageSession`] every panel reads and edits.
#[component]
pub fn App() -> Element {
    use_toast_provider();
    let config = use_hook(load_config);
    let session = use_signal(|| PageSession::new(config.coordinates.clone()));

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        div { class: "page",
            header { class: "toolbar",
                FileChooser { session }
                PopupColumnsMenu { session }
            }
            FilterPanel { session }
            main { class: "content",
                CompanyMap { session, config: config.map.clone() }
                CompanyTable { session }
            }
        }
        ToastFrame {}
    }
}
