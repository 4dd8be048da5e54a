//! # card-cutter
//!
//! Cut debate evidence cards from PDFs and web articles using LLMs.
//!
//! A *card* is a piece of quoted evidence laid out as a short tagline, a
//! citation line, and a body whose key phrases are marked for emphasis. This
//! crate extracts the text of a source, asks an LLM to cut a card for a given
//! topic and side, and renders the marked-up result as HTML.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF / URL
//!  │
//!  ├─ 1. Extract   pdfium text layer, or article body via reqwest + scraper
//!  ├─ 2. Filter    keep paragraphs longer than 50 characters
//!  ├─ 3. Generate  one chat call (gpt-4-turbo-preview / claude / gemini / …)
//!  ├─ 4. Inline    ordered rewrite rules: emphasis, highlights, [sic], …
//!  └─ 5. Layout    tagline / citation / body blocks in a `debate-card` div
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use card_cutter::{cut_card, CardConfig, CardRequest, CardSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / GEMINI_API_KEY
//!     let request = CardRequest::new(
//!         "Resolved: States ought to ban lethal autonomous weapons",
//!         "affirmative",
//!         CardSource::parse("paper.pdf"),
//!     );
//!     let output = cut_card(&request, &CardConfig::default()).await?;
//!     println!("{}", output.card_html);
//!     Ok(())
//! }
//! ```
//!
//! The formatter needs no provider at all:
//!
//! ```rust
//! let html = card_cutter::format_card_html("Tag\nSmith '23 (Smith, Pub)\nA **key** point.");
//! assert!(html.contains("<strong class=\"key-impact\">key</strong>"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `cutcard` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! card-cutter = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod cut;
pub mod document;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod request;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{CardConfig, CardConfigBuilder, DEFAULT_MODEL};
pub use cut::{cut_card, cut_card_sync, cut_card_to_file, resolve_provider, write_atomic};
pub use document::{SourceDocument, MIN_PARAGRAPH_CHARS};
pub use error::{CardError, ExtractionError};
pub use extract::extract;
pub use output::{CardOutput, CardResponse, CardStats};
pub use pipeline::format::{format_card_bytes, format_card_html};
pub use pipeline::layout::CardElement;
pub use progress::{CutProgressCallback, NoopProgressCallback, ProgressCallback, Stage};
pub use request::{CardRequest, CardSource};
