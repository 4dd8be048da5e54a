//! Card-cutting entry points.
//!
//! A request runs top to bottom with no shared state:
//!
//! ```text
//! validate ──▶ provider ──▶ extract ──▶ generate ──▶ format
//! ```
//!
//! Any failure ends the request; there are no partial cards.

use crate::config::{CardConfig, DEFAULT_MODEL};
use crate::error::CardError;
use crate::extract::extract;
use crate::output::{CardOutput, CardStats};
use crate::pipeline::{format, llm};
use crate::progress::Stage;
use crate::request::CardRequest;
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Environment variable naming the provider (e.g. `openai`, `anthropic`).
pub const PROVIDER_ENV: &str = "CARDCUTTER_LLM_PROVIDER";
/// Environment variable naming the model, used together with [`PROVIDER_ENV`].
pub const MODEL_ENV: &str = "CARDCUTTER_MODEL";

/// Cut one evidence card.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// - [`CardError::InvalidInput`] for a blank topic/side or missing source,
///   before any I/O
/// - [`CardError::ProviderNotConfigured`] when no LLM can be resolved
/// - [`CardError::Extraction`] when the source cannot be read or is empty
/// - [`CardError::Generation`] when every LLM attempt failed
pub async fn cut_card(request: &CardRequest, config: &CardConfig) -> Result<CardOutput, CardError> {
    let total_start = Instant::now();
    request.validate()?;
    info!(
        "Cutting card: topic={:?} side={:?} source={}",
        request.topic,
        request.side,
        request.source.describe()
    );

    let provider = resolve_provider(config)?;
    debug!(
        "Provider resolved (model override: {})",
        config.model.as_deref().unwrap_or("none")
    );

    // ── Extract ──────────────────────────────────────────────────────────
    let extract_start = Instant::now();
    let document = tracked(config, Stage::Extract, extract(&request.source, config)).await?;
    let extraction_duration_ms = extract_start.elapsed().as_millis() as u64;
    let source_text = document.to_text();

    // ── Generate ─────────────────────────────────────────────────────────
    let generated = tracked(
        config,
        Stage::Generate,
        llm::generate_card_text(&provider, request, &document, config),
    )
    .await?;

    // ── Format ───────────────────────────────────────────────────────────
    let card_html = tracked(config, Stage::Format, async {
        Ok(format::format_card_html(&generated.card_text))
    })
    .await?;

    let stats = CardStats {
        input_tokens: generated.input_tokens as u64,
        output_tokens: generated.output_tokens as u64,
        retries: generated.retries,
        extraction_duration_ms,
        generation_duration_ms: generated.duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Card complete: {} tokens in / {} out, {}ms total",
        stats.input_tokens, stats.output_tokens, stats.total_duration_ms
    );

    Ok(CardOutput {
        card_text: generated.card_text,
        card_html,
        source: request.source.describe(),
        source_chars: source_text.chars().count(),
        source_paragraphs: document.len(),
        stats,
    })
}

/// Cut a card and write its HTML directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn cut_card_to_file(
    request: &CardRequest,
    output_path: impl AsRef<Path>,
    config: &CardConfig,
) -> Result<CardOutput, CardError> {
    let output = cut_card(request, config).await?;
    write_atomic(output_path.as_ref(), &output.card_html).await?;
    Ok(output)
}

/// Synchronous wrapper around [`cut_card`].
///
/// Creates a temporary tokio runtime internally.
pub fn cut_card_sync(request: &CardRequest, config: &CardConfig) -> Result<CardOutput, CardError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CardError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(cut_card(request, config))
}

/// Write `contents` to `path` via a sibling `.tmp` file and a rename.
pub async fn write_atomic(path: &Path, contents: &str) -> Result<(), CardError> {
    let write_failed = |e| CardError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(write_failed)?;
    }

    let tmp_path = path.with_extension("html.tmp");
    tokio::fs::write(&tmp_path, contents)
        .await
        .map_err(write_failed)?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(write_failed)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Run one stage, reporting start/complete/error to the progress callback.
async fn tracked<T, F>(config: &CardConfig, stage: Stage, fut: F) -> Result<T, CardError>
where
    F: std::future::Future<Output = Result<T, CardError>>,
{
    let cb = config.progress_callback.as_ref();
    if let Some(cb) = cb {
        cb.on_stage_start(stage);
    }
    let start = Instant::now();
    let result = fut.await;
    if let Some(cb) = cb {
        match &result {
            Ok(_) => cb.on_stage_complete(stage, start.elapsed().as_millis() as u64),
            Err(e) => cb.on_stage_error(stage, &e.to_string()),
        }
    }
    result
}

/// Model used for a named provider when none was configured. Empty lets
/// the provider pick its own default.
fn default_model_for(provider_name: &str) -> &'static str {
    if provider_name.eq_ignore_ascii_case("openai") {
        DEFAULT_MODEL
    } else {
        ""
    }
}

fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, CardError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        CardError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`), used as-is.
/// 2. **Named provider + model** (`config.provider_name`); without a model,
///    OpenAI gets [`DEFAULT_MODEL`] and other providers their own default.
/// 3. **Environment pair** ([`PROVIDER_ENV`] + [`MODEL_ENV`]), when both are
///    set and non-empty.
/// 4. **OpenAI** when `OPENAI_API_KEY` is present.
/// 5. **Full auto-detection** (`ProviderFactory::from_env`).
pub fn resolve_provider(config: &CardConfig) -> Result<Arc<dyn LLMProvider>, CardError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        let model = config
            .model
            .as_deref()
            .unwrap_or_else(|| default_model_for(name));
        return create_provider(name, model);
    }

    if let (Ok(prov), Ok(model)) = (std::env::var(PROVIDER_ENV), std::env::var(MODEL_ENV)) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
            return create_provider("openai", model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| CardError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::CutProgressCallback;
    use crate::request::CardSource;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl CutProgressCallback for Recorder {
        fn on_stage_start(&self, stage: Stage) {
            self.0.lock().unwrap().push(format!("start {stage:?}"));
        }
        fn on_stage_complete(&self, stage: Stage, _duration_ms: u64) {
            self.0.lock().unwrap().push(format!("done {stage:?}"));
        }
        fn on_stage_error(&self, stage: Stage, _error: &str) {
            self.0.lock().unwrap().push(format!("error {stage:?}"));
        }
    }

    #[test]
    fn openai_default_model_not_sent_to_other_providers() {
        assert_eq!(default_model_for("openai"), DEFAULT_MODEL);
        assert_eq!(default_model_for("OpenAI"), DEFAULT_MODEL);
        assert_eq!(default_model_for("anthropic"), "");
        assert_eq!(default_model_for("ollama"), "");
    }

    #[tokio::test]
    async fn invalid_request_fails_before_io() {
        let request = CardRequest::new("", "aff", CardSource::parse("missing.pdf"));
        let err = cut_card(&request, &CardConfig::default()).await.unwrap_err();
        assert!(matches!(err, CardError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn tracked_reports_success_and_failure() {
        let recorder = Arc::new(Recorder::default());
        let config = CardConfig::builder()
            .progress_callback(recorder.clone())
            .build()
            .unwrap();

        let ok: Result<u8, CardError> = tracked(&config, Stage::Format, async { Ok(1) }).await;
        assert_eq!(ok.unwrap(), 1);
        let err: Result<u8, CardError> = tracked(&config, Stage::Extract, async {
            Err(CardError::Internal("boom".into()))
        })
        .await;
        assert!(err.is_err());

        let events = recorder.0.lock().unwrap().clone();
        assert_eq!(
            events,
            vec!["start Format", "done Format", "start Extract", "error Extract"]
        );
    }

    #[tokio::test]
    async fn write_atomic_creates_parent_and_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards").join("card.html");
        write_atomic(&path, "<div class=\"debate-card\"></div>")
            .await
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "<div class=\"debate-card\"></div>"
        );
        assert!(!path.with_extension("html.tmp").exists());
    }
}
