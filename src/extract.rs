//! Source extraction: turn any [`CardSource`] into a [`SourceDocument`].
//!
//! Needs no LLM provider, so it also backs `cutcard --extract-only`.

use crate::config::CardConfig;
use crate::document::{SourceDocument, MIN_PARAGRAPH_CHARS};
use crate::error::{CardError, ExtractionError};
use crate::pipeline::{article, input, pdf};
use crate::request::CardSource;
use tracing::info;

/// Extract the cleaned paragraphs of a PDF (path or upload) or web article.
///
/// Uploaded bytes are staged in a temp file that is removed before this
/// function returns, whether extraction succeeded or not.
///
/// # Errors
/// Any [`ExtractionError`], wrapped in [`CardError::Extraction`]. A source
/// that yields no paragraph longer than [`MIN_PARAGRAPH_CHARS`] characters is
/// [`ExtractionError::EmptyDocument`].
pub async fn extract(source: &CardSource, config: &CardConfig) -> Result<SourceDocument, CardError> {
    let password = config.password.as_deref();

    let document = match source {
        CardSource::PdfPath(path) => {
            let staged = input::stage_local(path)?;
            pdf::extract_pdf_text(staged.path(), password).await?
        }
        CardSource::PdfBytes { filename, bytes } => {
            let staged = input::stage_bytes(filename, bytes)?;
            // `staged` drops (and deletes the temp file) at the end of this arm.
            pdf::extract_pdf_text(staged.path(), password).await?
        }
        CardSource::Url(url) => article::extract_article(url, config.download_timeout_secs).await?,
    };

    if document.is_empty() {
        return Err(ExtractionError::EmptyDocument {
            origin: source.describe(),
            min_chars: MIN_PARAGRAPH_CHARS,
        }
        .into());
    }

    info!(
        "Extracted {} paragraphs ({} chars) from {}",
        document.len(),
        document.to_text().chars().count(),
        source.describe()
    );
    Ok(document)
}
