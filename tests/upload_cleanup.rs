//! Upload staging must not leave temp files behind when extraction fails.
//!
//! Lives in its own test binary because it points `TMPDIR` at a private
//! directory, which is process-wide state.

use card_cutter::{extract, CardConfig, CardError, CardSource};

fn staged_uploads(dir: &std::path::Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("card-upload-"))
        .collect()
}

#[tokio::test]
async fn failed_upload_extraction_removes_temp_file() {
    let scratch = tempfile::tempdir().unwrap();
    std::env::set_var("TMPDIR", scratch.path());

    // Passes the magic-byte check, then fails in pdfium (corrupt document,
    // or no pdfium library at all). Either way the staged file must go.
    let source = CardSource::PdfBytes {
        filename: "garbage.pdf".into(),
        bytes: b"%PDF-1.7\nthis is not really a pdf\n%%EOF".to_vec(),
    };
    let err = extract(&source, &CardConfig::default()).await.unwrap_err();
    assert!(matches!(err, CardError::Extraction(_)), "got: {err}");

    assert!(
        staged_uploads(scratch.path()).is_empty(),
        "temp upload left behind: {:?}",
        staged_uploads(scratch.path())
    );
}
