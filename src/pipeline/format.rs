//! Card formatting: model-generated card text → HTML.
//!
//! The model writes cards in a markdown-like dialect: a tagline line, a
//! citation line, then body paragraphs sprinkled with emphasis markers
//! (`***`, `**`, `__`, `_`, `[HIGHLIGHT]…[/HIGHLIGHT]`, `[...]`, `[sic]`).
//! Formatting happens in two phases:
//!
//! 1. **Inline rules**: an ordered list of pure `&str → String` rewrites
//!    ([`RULES`]). Order matters because markers nest and collide: `***`
//!    must be consumed before `**`, and `___` before `__` before `_`.
//! 2. **Layout**: the rewritten text is split into lines and classified into
//!    tagline, citation, and body paragraphs by [`crate::pipeline::layout`].
//!
//! ## Underscores and URLs
//!
//! Citations routinely end in a URL, and URLs routinely contain underscores.
//! The underscore rules therefore tokenize each line into URL spans and text
//! spans first; only underscores in text spans act as delimiters. An
//! emphasis span may still contain a whole URL. Underscores glued to the end
//! of a URL belong to the URL unless they close a span opened before it.
//!
//! Unterminated markers are left verbatim. Nothing here can fail on a `&str`.

use crate::error::CardError;
use crate::pipeline::layout::{classify_lines, render_card};
use once_cell::sync::Lazy;
use regex::Regex;

/// A named inline rewrite.
#[derive(Clone, Copy)]
pub struct InlineRule {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

/// Inline rules, applied in this order.
///
/// 1. Normalise line endings (CRLF → LF)
/// 2. Escape `&`, `<`, `>` in model text
/// 3. `***text***` → triple-emphasis span
/// 4. `**text**` → key-impact strong
/// 5. `___text___` → triple-emphasis span (URL-aware)
/// 6. `__text__` → important span (URL-aware)
/// 7. `_text_` → underline (URL-aware)
/// 8. `[HIGHLIGHT]text[/HIGHLIGHT]` → highlight span
/// 9. `[...]` → omitted marker
/// 10. `[sic]` → sic marker
pub const RULES: &[InlineRule] = &[
    InlineRule { name: "line_endings", apply: normalise_line_endings },
    InlineRule { name: "escape_html", apply: escape_html },
    InlineRule { name: "triple_emphasis", apply: triple_emphasis },
    InlineRule { name: "key_impact", apply: key_impact },
    InlineRule { name: "triple_underscore", apply: triple_underscore },
    InlineRule { name: "important", apply: important },
    InlineRule { name: "underline", apply: underline },
    InlineRule { name: "highlight", apply: highlight },
    InlineRule { name: "omission", apply: omission },
    InlineRule { name: "sic", apply: sic },
];

/// Convert card text to an HTML fragment rooted at `<div class="debate-card">`.
///
/// Total over `&str`: empty or whitespace-only input yields an empty
/// container, malformed markers pass through untouched.
pub fn format_card_html(card_text: &str) -> String {
    let inline = apply_inline_rules(card_text);
    render_card(&classify_lines(&inline))
}

/// Format card text supplied as raw bytes (file contents, request bodies).
///
/// # Errors
/// [`CardError::InvalidInput`] if the bytes are not UTF-8.
pub fn format_card_bytes(bytes: &[u8]) -> Result<String, CardError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| CardError::InvalidInput(format!("card text is not valid UTF-8: {e}")))?;
    Ok(format_card_html(text))
}

/// Run every rule in [`RULES`] over the text, without the layout phase.
pub fn apply_inline_rules(input: &str) -> String {
    RULES
        .iter()
        .fold(input.to_string(), |text, rule| (rule.apply)(&text))
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Escape HTML ──────────────────────────────────────────────────────
//
// Quotes and apostrophes stay as-is: they are legal in text content and the
// citation detector keys on the apostrophe.

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// ── Rules 3–4: Asterisk emphasis ─────────────────────────────────────────────

static RE_TRIPLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*\*(.*?)\*\*\*").unwrap());
static RE_DOUBLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

fn triple_emphasis(input: &str) -> String {
    RE_TRIPLE
        .replace_all(input, r#"<span class="triple-emphasis">${1}</span>"#)
        .to_string()
}

fn key_impact(input: &str) -> String {
    RE_DOUBLE
        .replace_all(input, r#"<strong class="key-impact">${1}</strong>"#)
        .to_string()
}

// ── Rules 5–7: URL-aware underscore emphasis ─────────────────────────────────

/// URL spans. Trailing sentence punctuation and underscores are not part of
/// the match; [`pair_delimiters`] decides who owns a trailing underscore run.
static RE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:https?://|www\.)[^\s<>"]*[^\s<>"_.,;:!?')\]]"#).unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    Url(&'a str),
}

impl Token<'_> {
    fn as_str(&self) -> &str {
        match self {
            Token::Text(s) | Token::Url(s) => s,
        }
    }
}

/// Split a single line into alternating text and URL tokens.
fn tokenize_line(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for m in RE_URL.find_iter(line) {
        if m.start() > last {
            tokens.push(Token::Text(&line[last..m.start()]));
        }
        tokens.push(Token::Url(m.as_str()));
        last = m.end();
    }
    if last < line.len() {
        tokens.push(Token::Text(&line[last..]));
    }
    tokens
}

/// Wrap text between pairs of the underscore run `delim` in `open`/`close`,
/// ignoring delimiters inside URL tokens. Delimiters pair left to right; an
/// odd one out is left verbatim. Operates on one line; markers never span
/// lines.
///
/// Underscores directly after a URL (`wiki/Foo_`) stay with the URL when no
/// span is open; with a span open they may close it (`_see https://a.org/x_`).
fn pair_delimiters(line: &str, delim: &str, open: &str, close: &str) -> String {
    let mut positions = Vec::new();
    let mut offset = 0;
    let mut after_url = false;
    for token in tokenize_line(line) {
        match token {
            Token::Url(_) => after_url = true,
            Token::Text(text) => {
                let glued = if after_url && positions.len() % 2 == 0 {
                    text.len() - text.trim_start_matches('_').len()
                } else {
                    0
                };
                positions.extend(
                    text[glued..]
                        .match_indices(delim)
                        .map(|(i, _)| offset + glued + i),
                );
                after_url = false;
            }
        }
        offset += token.as_str().len();
    }

    let paired = positions.len() - positions.len() % 2;
    if paired == 0 {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + paired * (open.len() + close.len()));
    let mut last = 0;
    for (n, &pos) in positions[..paired].iter().enumerate() {
        out.push_str(&line[last..pos]);
        out.push_str(if n % 2 == 0 { open } else { close });
        last = pos + delim.len();
    }
    out.push_str(&line[last..]);
    out
}

fn map_lines(input: &str, f: impl Fn(&str) -> String) -> String {
    input.split('\n').map(f).collect::<Vec<_>>().join("\n")
}

fn triple_underscore(input: &str) -> String {
    map_lines(input, |line| {
        pair_delimiters(line, "___", r#"<span class="triple-emphasis">"#, "</span>")
    })
}

fn important(input: &str) -> String {
    map_lines(input, |line| {
        pair_delimiters(line, "__", r#"<span class="important">"#, "</span>")
    })
}

fn underline(input: &str) -> String {
    map_lines(input, |line| pair_delimiters(line, "_", "<u>", "</u>"))
}

// ── Rules 7–9: Bracket markers ───────────────────────────────────────────────

static RE_HIGHLIGHT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[HIGHLIGHT\](.*?)\[/HIGHLIGHT\]").unwrap());
static RE_OMISSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\s*(?:\.+|…)\s*\]").unwrap());
static RE_SIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\[sic\]").unwrap());

fn highlight(input: &str) -> String {
    RE_HIGHLIGHT
        .replace_all(input, r#"<span class="highlight">${1}</span>"#)
        .to_string()
}

// Kept even though the prompt asks for no ellipses; older cards use them.
fn omission(input: &str) -> String {
    RE_OMISSION
        .replace_all(input, r#"<span class="omitted">${0}</span>"#)
        .to_string()
}

fn sic(input: &str) -> String {
    RE_SIC
        .replace_all(input, r#"<span class="sic">${0}</span>"#)
        .to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────────
