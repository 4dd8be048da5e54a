//! Result types returned by [`crate::cut_card`].

use serde::{Deserialize, Serialize};

/// A finished card: the model's marked-up text and its HTML rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardOutput {
    /// Raw card text as returned by the model (fences stripped).
    pub card_text: String,
    /// `card_text` run through [`crate::format_card_html`].
    pub card_html: String,
    /// Label of the source (file name, upload name, or URL).
    pub source: String,
    /// Characters of source text sent to the model.
    pub source_chars: usize,
    /// Paragraphs that survived the length filter.
    pub source_paragraphs: usize,
    pub stats: CardStats,
}

/// Timing and token accounting for one request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardStats {
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// LLM retries used (0 when the first attempt succeeded).
    pub retries: u32,
    pub extraction_duration_ms: u64,
    pub generation_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// The `{success, card_text, card_html}` body handed to web clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardResponse {
    pub success: bool,
    pub card_text: String,
    pub card_html: String,
}

impl CardOutput {
    pub fn to_response(&self) -> CardResponse {
        CardResponse {
            success: true,
            card_text: self.card_text.clone(),
            card_html: self.card_html.clone(),
        }
    }
}
