//! Pipeline stages for cutting a card.
//!
//! Each submodule implements one step. Only `pdf`, `article`, and `llm` do
//! I/O; `format` and `layout` are pure string transformations.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ pdf ─────┐
//!                    ├──▶ SourceDocument ──▶ llm ──▶ format ──▶ layout
//! article ───────────┘                      (card text)  (inline)  (blocks)
//! ```
//!
//! 1. [`input`]   — validate a local PDF or stage an upload in a temp file
//! 2. [`pdf`]     — read the text layer via pdfium (`spawn_blocking`)
//! 3. [`article`] — download a web page and pull out its body text
//! 4. [`llm`]     — one chat call with retry/backoff
//! 5. [`format`]  — ordered inline rewrite rules (emphasis, highlights, …)
//! 6. [`layout`]  — tagline / citation / body classification and the HTML shell

pub mod article;
pub mod format;
pub mod input;
pub mod layout;
pub mod llm;
pub mod pdf;
