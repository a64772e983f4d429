//! WASM bindings for chat2docx
//!
//! Browser-facing entry points. The generated `.docx` bytes come back as a
//! `Uint8Array`; the host wraps them in a Blob and triggers the download.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Generate a Word document from assistant Markdown.
///
/// # Arguments
/// * `markdown` - the raw assistant output
/// * `source` - `"gemini"` or `"chatgpt"`
/// * `csv_tables` - enable heuristic CSV/TSV-to-table conversion
///
/// # Returns
/// The `.docx` package bytes; throws on an empty document or unknown source.
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "generateDocx")]
pub fn generate_docx_wasm(
    markdown: &str,
    source: &str,
    csv_tables: bool,
) -> Result<Vec<u8>, JsValue> {
    let source = crate::AiSource::from_name(source)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown source: {}", source)))?;
    let options = crate::GenerateOptions { source, csv_tables };
    crate::generate_docx(markdown, &options).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// The conventional download file name for the generated document.
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "outputFileName")]
pub fn output_file_name() -> String {
    crate::OUTPUT_FILE_NAME.to_string()
}
