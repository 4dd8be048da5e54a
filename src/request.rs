//! What the caller asks for: topic, side, optional argument, and a source.

use crate::error::CardError;
use std::fmt;
use std::path::PathBuf;

/// Where the evidence comes from.
#[derive(Clone)]
pub enum CardSource {
    /// A PDF already on disk.
    PdfPath(PathBuf),
    /// An uploaded PDF held in memory. Staged in a temp file for pdfium.
    PdfBytes { filename: String, bytes: Vec<u8> },
    /// A web article.
    Url(String),
}

impl CardSource {
    /// Interpret a CLI-style argument: HTTP(S) URLs become [`CardSource::Url`],
    /// anything else is treated as a local PDF path.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if is_url(trimmed) {
            CardSource::Url(trimmed.to_string())
        } else {
            CardSource::PdfPath(PathBuf::from(trimmed))
        }
    }

    /// Short human-readable label used in logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            CardSource::PdfPath(p) => p.display().to_string(),
            CardSource::PdfBytes { filename, .. } => filename.clone(),
            CardSource::Url(u) => u.clone(),
        }
    }
}

impl fmt::Debug for CardSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardSource::PdfPath(p) => f.debug_tuple("PdfPath").field(p).finish(),
            CardSource::PdfBytes { filename, bytes } => f
                .debug_struct("PdfBytes")
                .field("filename", filename)
                .field("len", &bytes.len())
                .finish(),
            CardSource::Url(u) => f.debug_tuple("Url").field(u).finish(),
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// A single card-cutting request.
#[derive(Debug, Clone)]
pub struct CardRequest {
    /// The resolution being debated.
    pub topic: String,
    /// Which side the card should support (e.g. "affirmative").
    pub side: String,
    /// Optional specific argument the card should make.
    pub argument: Option<String>,
    pub source: CardSource,
}

impl CardRequest {
    pub fn new(topic: impl Into<String>, side: impl Into<String>, source: CardSource) -> Self {
        Self {
            topic: topic.into(),
            side: side.into(),
            argument: None,
            source,
        }
    }

    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.argument = Some(argument.into());
        self
    }

    /// Reject requests that could never produce a card, before any I/O.
    pub fn validate(&self) -> Result<(), CardError> {
        if self.topic.trim().is_empty() || self.side.trim().is_empty() {
            return Err(CardError::InvalidInput(
                "Topic and side are required".into(),
            ));
        }
        match &self.source {
            CardSource::PdfPath(p) if p.as_os_str().is_empty() => Err(CardError::InvalidInput(
                "Either PDF or URL must be provided".into(),
            )),
            CardSource::PdfBytes { filename, bytes } if filename.is_empty() || bytes.is_empty() => {
                Err(CardError::InvalidInput("No PDF file selected".into()))
            }
            CardSource::Url(u) if !is_url(u) => Err(CardError::InvalidInput(format!(
                "'{u}' is not an HTTP/HTTPS URL"
            ))),
            _ => Ok(()),
        }
    }

    /// The argument, if present and non-blank.
    pub fn argument(&self) -> Option<&str> {
        self.argument
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/article"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn parse_dispatches_on_scheme() {
        assert!(matches!(
            CardSource::parse(" https://news.example.org/a "),
            CardSource::Url(u) if u == "https://news.example.org/a"
        ));
        assert!(matches!(CardSource::parse("paper.pdf"), CardSource::PdfPath(_)));
    }

    #[test]
    fn blank_topic_or_side_rejected() {
        let src = CardSource::Url("https://example.org".into());
        let err = CardRequest::new("  ", "aff", src.clone()).validate().unwrap_err();
        assert!(err.to_string().contains("Topic and side are required"));
        assert!(CardRequest::new("topic", "", src).validate().is_err());
    }

    #[test]
    fn empty_upload_rejected() {
        let req = CardRequest::new(
            "t",
            "neg",
            CardSource::PdfBytes {
                filename: String::new(),
                bytes: vec![],
            },
        );
        assert!(matches!(req.validate(), Err(CardError::InvalidInput(_))));
    }

    #[test]
    fn non_http_url_rejected() {
        let req = CardRequest::new("t", "aff", CardSource::Url("ftp://x".into()));
        assert!(req.validate().is_err());
    }

    #[test]
    fn blank_argument_is_none() {
        let req = CardRequest::new("t", "aff", CardSource::parse("a.pdf")).with_argument("  ");
        assert_eq!(req.argument(), None);
        let req = req.with_argument(" deterrence fails ");
        assert_eq!(req.argument(), Some("deterrence fails"));
    }

    #[test]
    fn debug_does_not_dump_bytes() {
        let src = CardSource::PdfBytes {
            filename: "a.pdf".into(),
            bytes: vec![0; 4096],
        };
        let dbg = format!("{src:?}");
        assert!(dbg.contains("4096"));
        assert!(dbg.len() < 100);
    }
}
