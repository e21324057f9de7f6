//! Server integration tests.
//!
//! These tests run the real server on an ephemeral port and drive the
//! upload form over HTTP.

mod common;

use anyhow::Result;
use reqwest::multipart::{Form, Part};

const ARTICLE: &str = "\
Solar panels convert sunlight into electricity using photovoltaic cells.
The cost of solar panels has fallen sharply over the last decade.

Many households now install solar panels on their roofs to cut electricity bills.
Batteries store surplus electricity for use after sunset.
Grid operators must balance supply when cloud cover reduces solar output.
";

#[tokio::test]
async fn test_server_starts_and_responds_to_health() -> Result<()> {
    let server = common::TestServer::start().await?;

    let resp = server
        .client
        .get(format!("{}/health", server.base_url()))
        .send()
        .await?;
    assert!(resp.status().is_success());

    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "local");
    assert!(body.get("version").is_some());

    Ok(())
}

#[tokio::test]
async fn test_version_endpoint() -> Result<()> {
    let server = common::TestServer::start().await?;

    let body: serde_json::Value = server
        .client
        .get(format!("{}/version", server.base_url()))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["name"], "docsum");

    Ok(())
}

#[tokio::test]
async fn test_index_page() -> Result<()> {
    let server = common::TestServer::start().await?;

    let resp = server.client.get(server.base_url()).send().await?;
    assert_eq!(resp.status().as_u16(), 200);
    assert!(resp.text().await?.contains("Document Summary Generator"));

    Ok(())
}

#[tokio::test]
async fn test_upload_without_file_part() -> Result<()> {
    let server = common::TestServer::start().await?;

    let form = Form::new().text("comment", "no file here");
    let resp = server
        .client
        .post(server.base_url())
        .multipart(form)
        .send()
        .await?;

    assert_eq!(resp.status().as_u16(), 200);
    assert!(resp.text().await?.contains("No file part"));

    Ok(())
}

#[tokio::test]
async fn test_upload_with_empty_filename() -> Result<()> {
    let server = common::TestServer::start().await?;

    let (status, html) = server.upload("", Vec::new()).await?;
    assert_eq!(status, 200);
    assert!(html.contains("No selected file"));

    Ok(())
}

#[tokio::test]
async fn test_upload_with_disallowed_extension() -> Result<()> {
    let server = common::TestServer::start().await?;

    let (status, html) = server.upload("test.exe", b"MZ\x90\x00".to_vec()).await?;
    assert_eq!(status, 200);
    assert!(html.contains("Error processing file"));
    assert!(!server.archive_dir().join("test.exe").exists());

    Ok(())
}

#[tokio::test]
async fn test_upload_with_unreadable_pdf() -> Result<()> {
    let server = common::TestServer::start().await?;

    let (status, html) = server
        .upload("test.pdf", b"%PDF-1.4\nTest PDF content".to_vec())
        .await?;
    assert_eq!(status, 200);
    assert!(html.contains("Error processing file"));
    assert!(!html.contains("<h2>Summary</h2>"));
    assert!(!server.archive_dir().join("test.pdf").exists());

    Ok(())
}

#[tokio::test]
async fn test_upload_text_file_is_summarized_and_archived() -> Result<()> {
    let server = common::TestServer::start().await?;

    let (status, html) = server
        .upload("solar notes.txt", ARTICLE.as_bytes().to_vec())
        .await?;
    assert_eq!(status, 200);
    assert!(html.contains("<h2>Summary</h2>"));
    assert!(html.contains("solar_notes.txt"));
    assert!(html.contains("archived to"));

    let archived = std::fs::read(server.archive_dir().join("solar_notes.txt"))?;
    assert_eq!(archived, ARTICLE.as_bytes());

    let leftovers = std::fs::read_dir(server.upload_dir())?.count();
    assert_eq!(leftovers, 0, "temporary upload should be removed");

    Ok(())
}

#[tokio::test]
async fn test_graceful_shutdown() -> Result<()> {
    let server = common::TestServer::start().await?;
    assert!(server.health().await?);
    server.shutdown().await?;
    Ok(())
}
