use companymap_core::SourceFile;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlInputElement;

/// Read the first file selected in the `<input type="file">` with the given id.
///
/// Returns `Ok(None)` when nothing is selected.
pub async fn read_selected_file(input_id: &str) -> Result<Option<SourceFile>, String> {
    let input = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(input_id))
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .ok_or_else(|| format!("No file input #{input_id}"))?;

    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return Ok(None);
    };

    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read {}: {:?}", file.name(), e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    tracing::debug!(file = %file.name(), bytes = bytes.len(), "Read selected file");

    Ok(Some(SourceFile::new(file.name(), bytes)))
}
