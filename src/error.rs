//! Error types for the card-cutter library.
//!
//! Two error types reflect the two places a request can go wrong:
//!
//! * [`ExtractionError`] — the source document could not be turned into text
//!   (missing file, corrupt PDF, failed download, nothing long enough to keep).
//!   The underlying cause is carried in the message, never swallowed.
//!
//! * [`CardError`] — the top-level error returned by [`crate::cut_card`] and
//!   friends. Extraction failures are wrapped via `From`; the remaining
//!   variants cover request validation, the text-generation call, and output.
//!
//! Every error is terminal for the current request. Nothing here is retried
//! except the LLM call itself (see [`crate::pipeline::llm`]).

use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a PDF or URL into a [`crate::SourceDocument`].
#[derive(Debug, Error)]
pub enum ExtractionError {
    // ── PDF input ─────────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The bytes do not start with the `%PDF` magic.
    #[error("Input is not a valid PDF: '{origin}'\nFirst bytes: {magic:?}")]
    NotAPdf { origin: String, magic: Vec<u8> },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("Error processing PDF '{path}': {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The text layer of a single page could not be read.
    #[error("Could not read text of page {page}: {detail}")]
    PageText { page: usize, detail: String },

    /// No pdfium shared library could be bound.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or install pdfium system-wide."
    )]
    PdfiumUnavailable(String),

    /// Could not stage an uploaded PDF in a temporary file.
    #[error("Failed to stage PDF upload in a temporary file: {0}")]
    TempFile(#[source] std::io::Error),

    // ── URL input ─────────────────────────────────────────────────────────
    /// The article download failed (DNS, TLS, non-2xx status, body read).
    #[error("Error extracting article from '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Result ────────────────────────────────────────────────────────────
    /// Extraction succeeded but no paragraph survived the length filter.
    #[error("No usable text found in '{origin}' (no paragraph longer than {min_chars} characters)")]
    EmptyDocument { origin: String, min_chars: usize },
}

/// All errors returned by the top-level card-cutting API.
#[derive(Debug, Error)]
pub enum CardError {
    /// The source could not be extracted.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Malformed request or formatter input. Fails fast, before any I/O.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The text-generation call failed after all retries.
    #[error("Error calling LLM API after {attempts} attempt(s): {message}")]
    Generation { attempts: u32, message: String },

    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Could not create or write the output HTML file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unexpected internal error (task join failure, runtime creation).
    #[error("Internal error: {0}")]
    Internal(String),
}
