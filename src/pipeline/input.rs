//! Input staging: turn a PDF path or upload into a validated local file.
//!
//! pdfium opens documents by path, so in-memory uploads are written to a
//! `NamedTempFile` first. The temp file lives inside [`StagedPdf`] and is
//! deleted when it drops: on success, on extraction failure, and on panic.
//! Magic bytes (`%PDF`) are checked before pdfium sees anything so callers
//! get a clear error instead of a parser crash.

use crate::error::ExtractionError;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// A PDF ready for pdfium: either the caller's file or a staged upload.
pub enum StagedPdf {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was an upload; the temp file is removed on drop.
    Uploaded(NamedTempFile),
}

impl StagedPdf {
    pub fn path(&self) -> &Path {
        match self {
            StagedPdf::Local(p) => p,
            StagedPdf::Uploaded(tmp) => tmp.path(),
        }
    }
}

/// Validate a local PDF path: exists, readable, starts with `%PDF`.
pub fn stage_local(path: &Path) -> Result<StagedPdf, ExtractionError> {
    let path = path.to_path_buf();

    if !path.exists() {
        return Err(ExtractionError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != PDF_MAGIC {
                return Err(ExtractionError::NotAPdf {
                    origin: path.display().to_string(),
                    magic: magic.to_vec(),
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ExtractionError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(ExtractionError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(StagedPdf::Local(path))
}

/// Write an uploaded PDF to a temp file after checking its magic bytes.
pub fn stage_bytes(filename: &str, bytes: &[u8]) -> Result<StagedPdf, ExtractionError> {
    check_magic(filename, bytes)?;

    let mut tmp = tempfile::Builder::new()
        .prefix("card-upload-")
        .suffix(".pdf")
        .tempfile()
        .map_err(ExtractionError::TempFile)?;
    tmp.write_all(bytes).map_err(ExtractionError::TempFile)?;
    tmp.flush().map_err(ExtractionError::TempFile)?;

    debug!(
        "Staged upload '{}' ({} bytes) at {}",
        filename,
        bytes.len(),
        tmp.path().display()
    );
    Ok(StagedPdf::Uploaded(tmp))
}

fn check_magic(origin: &str, bytes: &[u8]) -> Result<(), ExtractionError> {
    if bytes.len() < PDF_MAGIC.len() || &bytes[..PDF_MAGIC.len()] != PDF_MAGIC {
        return Err(ExtractionError::NotAPdf {
            origin: origin.to_string(),
            magic: bytes.iter().take(PDF_MAGIC.len()).copied().collect(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_reported() {
        let err = stage_local(Path::new("/definitely/not/here.pdf")).err().unwrap();
        assert!(matches!(err, ExtractionError::FileNotFound { .. }));
    }

    #[test]
    fn non_pdf_file_rejected() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(b"<html>nope</html>").unwrap();
        let err = stage_local(tmp.path()).err().unwrap();
        match err {
            ExtractionError::NotAPdf { magic, .. } => assert_eq!(magic, b"<htm"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn local_pdf_accepted() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(b"%PDF-1.7\n").unwrap();
        let staged = stage_local(tmp.path()).unwrap();
        assert_eq!(staged.path(), tmp.path());
    }

    #[test]
    fn upload_is_staged_and_removed_on_drop() {
        let staged = stage_bytes("upload.pdf", b"%PDF-1.4\n%fake").unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4\n%fake");
        drop(staged);
        assert!(!path.exists(), "temp file should be deleted on drop");
    }

    #[test]
    fn short_upload_rejected() {
        let err = stage_bytes("x.pdf", b"%P").err().unwrap();
        assert!(matches!(err, ExtractionError::NotAPdf { .. }));
    }
}
