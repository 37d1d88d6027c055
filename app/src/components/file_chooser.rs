use companymap_core::{ACCEPTED_EXTENSIONS, PageSession};
use companymap_types::formatting::format_count;
use dioxus::prelude::*;

use super::{ToastSeverity, use_toast};
use crate::file_reader::read_selected_file;

const FILE_INPUT_ID: &str = "fileInput";

/// File picker. A successful read replaces the session's dataset; a failed
/// one leaves the previous data on screen and reports the error.
#[component]
pub fn FileChooser(mut session: Signal<PageSession>) -> Element {
    let mut toast = use_toast();
    let source = session.read().source().map(str::to_string);

    rsx! {
        div { class: "file-chooser",
            input {
                id: FILE_INPUT_ID,
                r#type: "file",
                accept: ACCEPTED_EXTENSIONS,
                onchange: move |_| {
                    spawn(async move {
                        let file = match read_selected_file(FILE_INPUT_ID).await {
                            Ok(file) => file,
                            Err(err) => {
                                tracing::warn!(error = %err, "Could not read selected file");
                                toast.show(err, ToastSeverity::Error);
                                return;
                            }
                        };

                        let result = session.write().load(file.as_ref());
                        match result {
                            Ok(Some(summary)) => toast.show(
                                format!(
                                    "{}: {}, {} on the map",
                                    summary.source,
                                    format_count(summary.rows, "row", "rows"),
                                    format_count(summary.markers, "marker", "markers"),
                                ),
                                ToastSeverity::Success,
                            ),
                            Ok(None) => {}
                            Err(e) => {
                                let name = file.as_ref().map(|f| f.name.as_str()).unwrap_or_default();
                                tracing::warn!(file = name, error = %e, "Failed to load file");
                                toast.show(format!("Could not load {name}: {e}"), ToastSeverity::Error);
                            }
                        }
                    });
                },
            }
            if let Some(source) = source {
                span { class: "file-name", "{source}" }
            }
        }
    }
}
