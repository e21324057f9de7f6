//! HTML rendering for the upload page.

use minijinja::Environment;
use serde::Serialize;

use docsum_core::extract::ALLOWED_EXTENSIONS;
use docsum_core::ProcessedDocument;

const INDEX_TEMPLATE: &str = "index.html";

/// Everything the upload page can show.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexPage {
    /// Notices shown above the form.
    pub messages: Vec<String>,
    /// Summary text, when an upload succeeded.
    pub summary: Option<String>,
    /// Details of the processed upload.
    pub document: Option<ProcessedDocument>,
}

impl IndexPage {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
            ..Self::default()
        }
    }

    pub fn with_document(document: ProcessedDocument) -> Self {
        Self {
            messages: Vec::new(),
            summary: Some(document.summary.clone()),
            document: Some(document),
        }
    }
}

#[derive(Serialize)]
struct IndexContext<'a> {
    #[serde(flatten)]
    page: &'a IndexPage,
    allowed_extensions: String,
    accept: String,
    max_upload_mb: usize,
}

/// Compiled page templates.
pub struct Templates {
    env: Environment<'static>,
    max_upload_bytes: usize,
}

impl Templates {
    pub fn new(max_upload_bytes: usize) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(INDEX_TEMPLATE, include_str!("../templates/index.html"))?;
        Ok(Self {
            env,
            max_upload_bytes,
        })
    }

    /// Render the upload page.
    pub fn render_index(&self, page: &IndexPage) -> Result<String, minijinja::Error> {
        let context = IndexContext {
            page,
            allowed_extensions: ALLOWED_EXTENSIONS.join(", "),
            accept: ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| format!(".{}", ext))
                .collect::<Vec<_>>()
                .join(","),
            max_upload_mb: self.max_upload_bytes / (1024 * 1024),
        };
        self.env.get_template(INDEX_TEMPLATE)?.render(&context)
    }
}
