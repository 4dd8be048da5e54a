//! Text generation: ask the model to cut a card from the source text.
//!
//! This module is intentionally thin. Prompt wording lives in
//! [`crate::prompts`]; this file builds the two-message request, applies the
//! timeout and retry policy, and tidies the response.
//!
//! ## Retry Strategy
//!
//! Failed or timed-out calls are retried up to `max_retries` times with
//! exponential backoff (`retry_backoff_ms * 2^(attempt-1)`): with the
//! defaults that is 500 ms then 1 s. An empty response counts as a failure.

use crate::config::CardConfig;
use crate::document::SourceDocument;
use crate::error::CardError;
use crate::prompts::{build_user_prompt, DEFAULT_SYSTEM_PROMPT};
use crate::request::CardRequest;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, warn};

/// The model's answer plus accounting.
#[derive(Debug, Clone)]
pub struct GeneratedCard {
    pub card_text: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub retries: u32,
    pub duration_ms: u64,
}

/// Generate card text for `request` from the extracted `source`.
///
/// ## Message Layout
///
/// 1. **System message**: the card-cutting rules (or the configured override)
/// 2. **User message**: topic, side, optional argument, and the source text
///
/// # Errors
/// [`CardError::Generation`] once every attempt has failed.
pub async fn generate_card_text(
    provider: &Arc<dyn LLMProvider>,
    request: &CardRequest,
    source: &SourceDocument,
    config: &CardConfig,
) -> Result<GeneratedCard, CardError> {
    let start = Instant::now();
    let system_prompt = config
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);

    let messages = vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user(build_user_prompt(
            &request.topic,
            &request.side,
            request.argument(),
            &source.to_text(),
        )),
    ];

    let options = build_options(config);
    let call_timeout = Duration::from_secs(config.api_timeout_secs);
    let mut last_err: Option<String> = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            let backoff = config.retry_backoff_ms * 2u64.pow(attempt - 1);
            warn!(
                "Card generation: retry {}/{} after {}ms",
                attempt, config.max_retries, backoff
            );
            sleep(Duration::from_millis(backoff)).await;
        }

        let outcome = timeout(call_timeout, provider.chat(&messages, Some(&options))).await;
        match outcome {
            Ok(Ok(response)) => {
                let card_text = strip_outer_fences(&response.content);
                if card_text.trim().is_empty() {
                    warn!("Card generation: attempt {} returned empty text", attempt + 1);
                    last_err = Some("model returned an empty card".to_string());
                    continue;
                }

                let duration = start.elapsed();
                debug!(
                    "Card generated: {} input tokens, {} output tokens, {:?}",
                    response.prompt_tokens, response.completion_tokens, duration
                );
                return Ok(GeneratedCard {
                    card_text,
                    input_tokens: response.prompt_tokens,
                    output_tokens: response.completion_tokens,
                    retries: attempt,
                    duration_ms: duration.as_millis() as u64,
                });
            }
            Ok(Err(e)) => {
                let err_msg = e.to_string();
                warn!("Card generation: attempt {} failed — {}", attempt + 1, err_msg);
                last_err = Some(err_msg);
            }
            Err(_) => {
                warn!(
                    "Card generation: attempt {} timed out after {}s",
                    attempt + 1,
                    config.api_timeout_secs
                );
                last_err = Some(format!("timed out after {}s", config.api_timeout_secs));
            }
        }
    }

    Err(CardError::Generation {
        attempts: config.max_retries + 1,
        message: last_err.unwrap_or_else(|| "Unknown error".to_string()),
    })
}

/// Build `CompletionOptions` from the card config.
fn build_options(config: &CardConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:[A-Za-z]+)?\n(.*)\n```\s*$").unwrap());

/// Models sometimes wrap the whole card in a code fence despite the prompt.
fn strip_outer_fences(input: &str) -> String {
    let trimmed = input.trim();
    match RE_OUTER_FENCES.captures(trimmed) {
        Some(caps) => caps[1].to_string(),
        None => trimmed.to_string(),
    }
}
