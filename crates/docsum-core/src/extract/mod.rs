mod filename;
mod pdf;

pub use filename::{allowed_file, sanitize_filename, DocumentKind, ALLOWED_EXTENSIONS};
pub use pdf::extract_pdf_text;

use bytes::Bytes;

use crate::{Error, Result};

/// Decode a plain-text upload as strict UTF-8, dropping a leading BOM
pub fn decode_text(bytes: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::Extraction(format!("File is not valid UTF-8 text: {}", e)))?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
}

/// Extract text synchronously
pub fn extract_text_blocking(kind: DocumentKind, bytes: &[u8]) -> Result<String> {
    let text = match kind {
        DocumentKind::Text => decode_text(bytes)?,
        DocumentKind::Pdf => extract_pdf_text(bytes)?,
    };

    if text.trim().is_empty() {
        return Err(Error::Extraction("No text found in document".to_string()));
    }
    Ok(text)
}

/// Extract text on the blocking pool
pub async fn extract_text(kind: DocumentKind, bytes: Bytes) -> Result<String> {
    tokio::task::spawn_blocking(move || extract_text_blocking(kind, &bytes)).await?
}
