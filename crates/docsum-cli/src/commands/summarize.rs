use std::path::Path;

use anyhow::{bail, Context, Result};

use docsum_core::extract::{extract_text, DocumentKind, ALLOWED_EXTENSIONS};
use docsum_core::{AppConfig, Summarizer};

pub async fn run(config: &AppConfig, file: &Path, sentences: Option<usize>) -> Result<()> {
    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let Some(kind) = DocumentKind::from_filename(&filename) else {
        bail!(
            "Unsupported file type: {} (expected {})",
            file.display(),
            ALLOWED_EXTENSIONS.join(", ")
        );
    };

    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let text = extract_text(kind, bytes.into())
        .await
        .with_context(|| format!("Failed to extract text from {}", file.display()))?;

    let mut summarizer = Summarizer::new(config)?;
    if let Some(count) = sentences {
        summarizer = summarizer.with_sentence_count(count);
    }

    let summary = tokio::task::spawn_blocking(move || summarizer.summarize(&text)).await?;
    println!("{}", summary);

    Ok(())
}
