use crate::{Error, Result};

/// Extract text page by page; every page is followed by a newline.
///
/// The PDF parser can panic on malformed input; that is reported as an
/// extraction error like any other parse failure.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| Error::Extraction("PDF parser crashed on this document".to_string()))?
        .map_err(|e| Error::Extraction(format!("Invalid PDF: {}", e)))?;

    tracing::debug!(pages = pages.len(), "Extracted PDF text");

    let mut text = String::new();
    for page in pages {
        text.push_str(&page);
        text.push('\n');
    }
    Ok(text)
}
