//! Web article extraction: download a page and pull out its body text.
//!
//! The heuristic is deliberately small. Boilerplate containers (navigation,
//! headers, footers, asides, forms, scripts) are skipped, the `<article>`
//! element is preferred over `<main>` over `<body>`, and each paragraph-level
//! block becomes one paragraph. The shared length filter in
//! [`crate::document`] then discards bylines, captions, and button labels.

use crate::document::SourceDocument;
use crate::error::{CardError, ExtractionError};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Elements whose subtree never contains article text.
const BOILERPLATE: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "figure",
];

static ROOT_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["article", "main", "body"]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});

static BLOCK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p, h1, h2, h3, h4, h5, h6, li, blockquote").unwrap());

/// Download `url` and extract its article body as a [`SourceDocument`].
pub async fn extract_article(url: &str, timeout_secs: u64) -> Result<SourceDocument, CardError> {
    info!("Fetching article: {}", url);
    let html = fetch_html(url, timeout_secs).await?;
    debug!("Fetched {} bytes of HTML", html.len());

    // scraper's DOM is !Send; parse off the async worker.
    let body = tokio::task::spawn_blocking(move || article_text(&html))
        .await
        .map_err(|e| CardError::Internal(format!("HTML parse task panicked: {e}")))?;

    Ok(SourceDocument::from_blocks([body]))
}

async fn fetch_html(url: &str, timeout_secs: u64) -> Result<String, ExtractionError> {
    let download_failed = |reason: String| ExtractionError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| download_failed(e.to_string()))?;

    let response = client
        .get(url)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                ExtractionError::DownloadTimeout {
                    url: url.to_string(),
                    secs: timeout_secs,
                }
            } else {
                download_failed(e.to_string())
            }
        })?;

    if !response.status().is_success() {
        return Err(download_failed(format!("HTTP {}", response.status())));
    }

    response
        .text()
        .await
        .map_err(|e| download_failed(e.to_string()))
}

/// Extract article text from an HTML document: one paragraph per block,
/// separated by blank lines. Returns an empty string if nothing is found.
pub fn article_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let Some(root) = ROOT_SELECTORS
        .iter()
        .find_map(|sel| document.select(sel).next())
    else {
        return String::new();
    };

    root.select(&BLOCK_SELECTOR)
        .filter(|el| !inside_boilerplate(el, &root))
        .filter(|el| !has_block_ancestor_within(el, &root))
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn inside_boilerplate(el: &ElementRef<'_>, root: &ElementRef<'_>) -> bool {
    el.ancestors()
        .take_while(|n| n.id() != root.id())
        .filter_map(ElementRef::wrap)
        .any(|a| BOILERPLATE.contains(&a.value().name()))
}

/// Nested blocks (`<li><p>…</p></li>`, `<blockquote><p>…`) would otherwise
/// emit their text twice; keep only the outermost block.
fn has_block_ancestor_within(el: &ElementRef<'_>, root: &ElementRef<'_>) -> bool {
    el.ancestors()
        .take_while(|n| n.id() != root.id())
        .filter_map(ElementRef::wrap)
        .any(|a| {
            matches!(
                a.value().name(),
                "p" | "li" | "blockquote" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
            )
        })
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_A: &str = "Nuclear deterrence has held for decades, but the margin for error keeps shrinking every year.";
    const LONG_B: &str = "Analysts warn that automated early-warning systems compress decision time to mere minutes.";

    #[test]
    fn prefers_article_over_body() {
        let html = format!(
            "<html><body><p>Outside the article, this paragraph should never be part of the result text.</p>\
             <article><p>{LONG_A}</p><p>{LONG_B}</p></article></body></html>"
        );
        assert_eq!(article_text(&html), format!("{LONG_A}\n\n{LONG_B}"));
    }

    #[test]
    fn skips_boilerplate_containers() {
        let html = format!(
            "<html><body><nav><p>Home | World | Politics | Subscribe to our newsletter today for free</p></nav>\
             <main><p>{LONG_A}</p><footer><p>Copyright 2024 Example News Corporation, all rights reserved.</p></footer></main>\
             <script>var x = 'ignored';</script></body></html>"
        );
        assert_eq!(article_text(&html), LONG_A);
    }

    #[test]
    fn collapses_inline_whitespace_and_markup() {
        let html = "<article><p>Deterrence   is\n   <em>unstable</em> and <a href='#'>fragile</a>.</p></article>";
        assert_eq!(article_text(html), "Deterrence is unstable and fragile.");
    }

    #[test]
    fn nested_blocks_are_not_duplicated() {
        let html = format!("<article><blockquote><p>{LONG_A}</p></blockquote></article>");
        assert_eq!(article_text(&html), LONG_A);
    }

    #[test]
    fn short_fragments_fall_to_length_filter() {
        let html = format!("<article><p>By Jane Doe</p><p>{LONG_B}</p><li>Share</li></article>");
        let doc = SourceDocument::from_blocks([article_text(&html)]);
        assert_eq!(doc.paragraphs(), &[LONG_B.to_string()]);
    }

    #[test]
    fn empty_html_yields_empty_text() {
        assert_eq!(article_text(""), "");
    }
}
