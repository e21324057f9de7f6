//! Upload form: render the page and summarize posted files.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::{info, warn};

use docsum_core::{ArchiveOutcome, ProcessError, Upload};

use crate::error::Result;
use crate::state::AppState;
use crate::templates::IndexPage;

/// Multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

fn render(state: &AppState, status: StatusCode, page: IndexPage) -> Result<Response> {
    let html = state.templates.render_index(&page)?;
    Ok((status, Html(html)).into_response())
}

/// Empty upload form.
pub async fn index(State(state): State<AppState>) -> Result<Response> {
    render(&state, StatusCode::OK, IndexPage::default())
}

/// Handle a form submission.
///
/// Every user mistake comes back as the page with a message; only an
/// oversized body changes the status code.
pub async fn upload(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Response> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!(error = %rejection, "Upload request is not multipart");
            return render(
                &state,
                StatusCode::OK,
                IndexPage::with_message(ProcessError::NoFilePart.to_string()),
            );
        }
    };

    let upload = match read_file_part(&mut multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            return render(
                &state,
                StatusCode::OK,
                IndexPage::with_message(ProcessError::NoFilePart.to_string()),
            );
        }
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            let limit_mb = state.config.server.max_upload_bytes / (1024 * 1024);
            warn!(limit = state.config.server.max_upload_bytes, "Upload exceeds size limit");
            return render(
                &state,
                StatusCode::PAYLOAD_TOO_LARGE,
                IndexPage::with_message(format!(
                    "File too large: uploads are limited to {} MB",
                    limit_mb.max(1)
                )),
            );
        }
        Err(e) => {
            warn!(error = %e, "Malformed multipart body");
            return render(
                &state,
                StatusCode::OK,
                IndexPage::with_message(format!("Error processing file: {}", e.body_text())),
            );
        }
    };

    match state.processor.process(upload).await {
        Ok(document) => {
            info!(
                filename = %document.filename,
                characters = document.characters,
                "Summary generated"
            );
            let notice = match &document.archive {
                ArchiveOutcome::Failed { message } => Some(format!(
                    "File summarized but could not be archived: {}",
                    message
                )),
                _ => None,
            };
            let mut page = IndexPage::with_document(document);
            page.messages.extend(notice);
            render(&state, StatusCode::OK, page)
        }
        Err(e) => render(&state, StatusCode::OK, IndexPage::with_message(e.to_string())),
    }
}

/// Pull the first file-bearing `file` field out of the form.
async fn read_file_part(
    multipart: &mut Multipart,
) -> std::result::Result<Option<Upload>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        // A `file` field without a filename is a plain form value, not a file
        let Some(filename) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let bytes = field.bytes().await?;
        return Ok(Some(Upload::new(filename, bytes)));
    }
    Ok(None)
}

/// Create upload form routes.
pub fn upload_routes() -> Router<AppState> {
    Router::new().route("/", get(index).post(upload))
}
