//! Card layout: classify formatted lines into tagline, citation, and body.
//!
//! Classification is a single pass over the lines with two states:
//!
//! ```text
//!   AwaitingTagline ──first non-blank line──▶ InBody
//! ```
//!
//! In `InBody` each non-blank line is either a citation (checked per line) or
//! body text. Consecutive body lines share one paragraph; a blank line or a
//! citation closes it. Once the tagline is taken it is never revisited, so a
//! citation-looking first line is still the tagline.
//!
//! Citation detection is a heuristic: an apostrophe followed by two digits
//! (`Smith '23`) on a line that also has both parentheses. A body sentence
//! quoting a year in parentheses will be misread as a citation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One block of a rendered card. Text is already inline-formatted HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "html", rename_all = "snake_case")]
pub enum CardElement {
    Tagline(String),
    Citation(String),
    /// The original lines of one paragraph, joined with `<br>` on render.
    Body(Vec<String>),
}

impl CardElement {
    pub fn to_html(&self) -> String {
        match self {
            CardElement::Tagline(text) => format!("<h4 class=\"tagline\">{text}</h4>"),
            CardElement::Citation(text) => format!("<p class=\"citation\">{text}</p>"),
            CardElement::Body(lines) => {
                format!("<p class=\"card-body\">{}</p>", lines.join("<br>\n"))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    AwaitingTagline,
    InBody,
}

struct LineClassifier {
    state: LineState,
    paragraph: Option<Vec<String>>,
    elements: Vec<CardElement>,
}

impl LineClassifier {
    fn new() -> Self {
        Self {
            state: LineState::AwaitingTagline,
            paragraph: None,
            elements: Vec::new(),
        }
    }

    fn feed(&mut self, raw: &str) {
        let line = raw.trim();
        match self.state {
            LineState::AwaitingTagline if line.is_empty() => {}
            LineState::AwaitingTagline => {
                self.elements.push(CardElement::Tagline(line.to_string()));
                self.state = LineState::InBody;
            }
            LineState::InBody if line.is_empty() => self.close_paragraph(),
            LineState::InBody if is_citation(line) => {
                self.close_paragraph();
                self.elements.push(CardElement::Citation(line.to_string()));
            }
            LineState::InBody => self
                .paragraph
                .get_or_insert_with(Vec::new)
                .push(line.to_string()),
        }
    }

    fn close_paragraph(&mut self) {
        if let Some(lines) = self.paragraph.take() {
            self.elements.push(CardElement::Body(lines));
        }
    }

    fn finish(mut self) -> Vec<CardElement> {
        self.close_paragraph();
        self.elements
    }
}

static RE_CITATION_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"['’]\d{2}").unwrap());

/// `Smith '23 (…)` style attribution line.
pub fn is_citation(line: &str) -> bool {
    RE_CITATION_YEAR.is_match(line) && line.contains('(') && line.contains(')')
}

/// Classify every line of inline-formatted card text, in order.
pub fn classify_lines(text: &str) -> Vec<CardElement> {
    let mut classifier = LineClassifier::new();
    for line in text.lines() {
        classifier.feed(line);
    }
    classifier.finish()
}

/// Wrap elements in the `debate-card` container, one element per line.
pub fn render_card(elements: &[CardElement]) -> String {
    let mut html = String::from("<div class=\"debate-card\">");
    for element in elements {
        html.push('\n');
        html.push_str(&element.to_html());
    }
    if !elements.is_empty() {
        html.push('\n');
    }
    html.push_str("</div>");
    html
}
