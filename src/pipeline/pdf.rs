//! PDF text extraction via pdfium.
//!
//! Only the text layer is read. There is no OCR, no layout analysis, and no
//! image handling: a scanned PDF with no text layer yields an empty document.
//!
//! pdfium keeps thread-local state and blocks, so all calls run inside
//! `tokio::task::spawn_blocking`.

use crate::document::SourceDocument;
use crate::error::{CardError, ExtractionError};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit pdfium shared library.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Extract a [`SourceDocument`] from a PDF on disk.
pub async fn extract_pdf_text(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<SourceDocument, CardError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(str::to_string);

    let pages = tokio::task::spawn_blocking(move || read_pages_blocking(&path, pwd.as_deref()))
        .await
        .map_err(|e| CardError::Internal(format!("PDF text task panicked: {e}")))??;

    let doc = SourceDocument::from_blocks(&pages);
    info!(
        "Extracted {} paragraphs from {} pages",
        doc.len(),
        pages.len()
    );
    Ok(doc)
}

/// Bind pdfium from `PDFIUM_LIB_PATH` if set, else from the system library.
fn bind_pdfium() -> Result<Pdfium, ExtractionError> {
    let bindings = match std::env::var(PDFIUM_LIB_PATH_ENV) {
        Ok(p) if !p.is_empty() => {
            let path = PathBuf::from(p);
            let lib = if path.is_dir() {
                PathBuf::from(Pdfium::pdfium_platform_library_name_at_path(&path))
            } else {
                path
            };
            debug!("Binding pdfium from {}", lib.display());
            Pdfium::bind_to_library(&lib)
        }
        _ => Pdfium::bind_to_system_library(),
    };

    bindings
        .map(Pdfium::new)
        .map_err(|e| ExtractionError::PdfiumUnavailable(e.to_string()))
}

/// Blocking implementation: one string per page, in page order.
fn read_pages_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<Vec<String>, ExtractionError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_file(pdf_path, password)
        .map_err(|e| classify_load_error(pdf_path, password, e))?;

    let pages = document.pages();
    debug!("PDF loaded: {} pages", pages.len());

    let mut texts = Vec::with_capacity(pages.len() as usize);
    for (idx, page) in pages.iter().enumerate() {
        let text = page.text().map_err(|e| ExtractionError::PageText {
            page: idx + 1,
            detail: format!("{e:?}"),
        })?;
        texts.push(text.all());
    }

    Ok(texts)
}

fn classify_load_error(path: &Path, password: Option<&str>, e: PdfiumError) -> ExtractionError {
    let detail = format!("{e:?}");
    if detail.to_lowercase().contains("password") {
        if password.is_some() {
            ExtractionError::WrongPassword {
                path: path.to_path_buf(),
            }
        } else {
            ExtractionError::PasswordRequired {
                path: path.to_path_buf(),
            }
        }
    } else {
        ExtractionError::CorruptPdf {
            path: path.to_path_buf(),
            detail,
        }
    }
}
