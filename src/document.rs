//! The extracted source document and the paragraph filter that produces it.
//!
//! PDF text layers and article extractors both leave behind short fragments:
//! running headers, page numbers, captions, bylines, "Share this" buttons.
//! Anything that is not a paragraph longer than [`MIN_PARAGRAPH_CHARS`]
//! characters after trimming is dropped. The threshold is fixed; changing it
//! changes which evidence the model gets to see.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Paragraphs must be strictly longer than this many characters to be kept.
pub const MIN_PARAGRAPH_CHARS: usize = 50;

/// Separator placed between retained paragraphs.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Cleaned plain text of a PDF or article, as an ordered list of paragraphs.
///
/// Every paragraph is trimmed and longer than [`MIN_PARAGRAPH_CHARS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    paragraphs: Vec<String>,
}

impl SourceDocument {
    /// Build a document from raw text blocks (one per PDF page, or a single
    /// block for an article), keeping only qualifying paragraphs in order.
    pub fn from_blocks<I, S>(blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paragraphs = blocks
            .into_iter()
            .flat_map(|block| split_paragraphs(block.as_ref()))
            .collect();
        Self { paragraphs }
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// Paragraphs joined by a blank line, the form sent to the model.
    pub fn to_text(&self) -> String {
        self.paragraphs.join(PARAGRAPH_SEPARATOR)
    }
}

impl fmt::Display for SourceDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Split one block of text on blank-line boundaries and keep the trimmed
/// candidates longer than [`MIN_PARAGRAPH_CHARS`].
///
/// Line endings are normalised first: pdfium emits `\r\n`, which would
/// otherwise hide every paragraph break.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    text.split(PARAGRAPH_SEPARATOR)
        .map(str::trim)
        .filter(|p| p.chars().count() > MIN_PARAGRAPH_CHARS)
        .map(str::to_string)
        .collect()
}
