//! CLI binary for card-cutter.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `CardConfig` / `CardRequest` and prints results.

use anyhow::{Context, Result};
use card_cutter::{
    cut_card, extract, format_card_bytes, write_atomic, CardConfig, CardRequest, CardSource,
    CutProgressCallback, ProgressCallback, Stage,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal spinner that prints one line per finished stage.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Starting");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl CutProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: Stage) {
        self.bar.set_prefix(stage.to_string());
        self.bar.set_message("…");
    }

    fn on_stage_complete(&self, stage: Stage, duration_ms: u64) {
        self.bar.println(format!(
            "  {} {:<24} {}",
            green("✓"),
            stage.to_string(),
            dim(&format!("{:.1}s", duration_ms as f64 / 1000.0)),
        ));
        if stage == Stage::Format {
            self.bar.finish_and_clear();
        }
    }

    fn on_stage_error(&self, stage: Stage, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let first_line = error.lines().next().unwrap_or_default();
        let msg: String = if first_line.chars().count() > 80 {
            first_line.chars().take(79).chain(['…']).collect()
        } else {
            first_line.to_string()
        };
        self.bar.println(format!("  {} {:<24} {}", red("✗"), stage.to_string(), red(&msg)));
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Cut a card from a PDF (HTML to stdout)
  cutcard --topic "Resolved: States ought to ban lethal autonomous weapons" \
          --side affirmative paper.pdf

  # From a web article, with a specific argument, to a file
  cutcard --topic "..." --side negative --argument "deterrence fails" \
          https://example.org/article -o card.html

  # Structured JSON (card text, HTML, stats)
  cutcard --topic "..." --side aff paper.pdf --json

  # Format card text you already have (no API key needed)
  cutcard --format-only card.txt
  pbpaste | cutcard --format-only -

  # Show the text that would be sent to the model (no API key needed)
  cutcard --extract-only paper.pdf

CARD MARKUP:
  ***text***, ___text___      triple emphasis
  **text**                    key impact (bold)
  __text__                    important
  _text_                      underline
  [HIGHLIGHT]text[/HIGHLIGHT] highlight
  [...]                       omission
  [sic]                       sic

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY            OpenAI API key
  ANTHROPIC_API_KEY         Anthropic API key
  GEMINI_API_KEY            Google Gemini API key
  CARDCUTTER_LLM_PROVIDER   Provider (same as --provider)
  CARDCUTTER_MODEL          Model ID (same as --model; OpenAI default: gpt-4-turbo-preview)
  PDFIUM_LIB_PATH           Path to libpdfium (file or directory)

  A .env file in the working directory is loaded automatically.
"#;

/// Cut debate evidence cards from PDFs and web articles using LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "cutcard",
    version,
    about = "Cut debate evidence cards from PDFs and web articles using LLMs",
    long_about = "Extract the text of a PDF or web article, ask an LLM to cut a debate \
evidence card (tagline, citation, emphasised body) for a given topic and side, and render \
the card as HTML. Supports OpenAI, Anthropic, Google Gemini, Azure OpenAI, and any \
OpenAI-compatible endpoint (Ollama, vLLM, LiteLLM, etc.).",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS article URL.
    #[arg(required_unless_present = "format_only")]
    input: Option<String>,

    /// The resolution being debated.
    #[arg(long, env = "CARDCUTTER_TOPIC",
          required_unless_present_any = ["format_only", "extract_only"])]
    topic: Option<String>,

    /// Side the card supports (e.g. affirmative, negative).
    #[arg(long, env = "CARDCUTTER_SIDE",
          required_unless_present_any = ["format_only", "extract_only"])]
    side: Option<String>,

    /// Specific argument the card must support.
    #[arg(long, env = "CARDCUTTER_ARGUMENT")]
    argument: Option<String>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long, env = "CARDCUTTER_OUTPUT")]
    output: Option<PathBuf>,

    /// Format existing card text from FILE (or `-` for stdin); no LLM call.
    #[arg(long, value_name = "FILE", conflicts_with_all = ["input", "extract_only"])]
    format_only: Option<String>,

    /// Print the extracted source text only; no LLM call.
    #[arg(long)]
    extract_only: bool,

    /// LLM model ID (OpenAI default: gpt-4-turbo-preview).
    #[arg(long, env = "CARDCUTTER_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(
        long,
        env = "CARDCUTTER_LLM_PROVIDER",
        long_help = "LLM provider. Auto-detected from API key env vars if not set.\n\
          Supported: openai, anthropic, gemini, azure, ollama, or any OpenAI-compatible URL."
    )]
    provider: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "CARDCUTTER_TEMPERATURE", default_value_t = 0.7)]
    temperature: f32,

    /// Max LLM output tokens.
    #[arg(long, env = "CARDCUTTER_MAX_TOKENS", default_value_t = 2000)]
    max_tokens: usize,

    /// Retries on LLM failure.
    #[arg(long, env = "CARDCUTTER_MAX_RETRIES", default_value_t = 2)]
    max_retries: u32,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "CARDCUTTER_PASSWORD")]
    password: Option<String>,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "CARDCUTTER_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Output structured JSON (CardOutput) instead of HTML.
    #[arg(long, env = "CARDCUTTER_JSON")]
    json: bool,

    /// Disable progress spinner.
    #[arg(long, env = "CARDCUTTER_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "CARDCUTTER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "CARDCUTTER_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "CARDCUTTER_DOWNLOAD_TIMEOUT", default_value_t = 30)]
    download_timeout: u64,

    /// LLM call timeout in seconds.
    #[arg(long, env = "CARDCUTTER_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner covers INFO-level feedback while it is active.
    let show_progress =
        !cli.quiet && !cli.no_progress && !cli.json && cli.format_only.is_none() && !cli.extract_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Format-only mode ─────────────────────────────────────────────────
    if let Some(ref path) = cli.format_only {
        let bytes = read_card_text(path).await?;
        let html = format_card_bytes(&bytes).context("Failed to format card text")?;
        return emit(&cli, &html).await;
    }

    let input = cli
        .input
        .as_deref()
        .context("A PDF path or article URL is required")?;
    let source = CardSource::parse(input);

    // ── Extract-only mode ────────────────────────────────────────────────
    if cli.extract_only {
        let config = build_config(&cli, None).await?;
        let document = extract(&source, &config)
            .await
            .context("Failed to extract source text")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&document).context("Failed to serialize document")?
            );
        } else {
            println!("{document}");
        }
        if !cli.quiet {
            eprintln!(
                "{} {} paragraphs from {}",
                green("✔"),
                bold(&document.len().to_string()),
                source.describe()
            );
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn CutProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb).await?;

    let mut request = CardRequest::new(
        cli.topic.clone().unwrap_or_default(),
        cli.side.clone().unwrap_or_default(),
        source,
    );
    if let Some(ref argument) = cli.argument {
        request = request.with_argument(argument.clone());
    }

    // ── Cut ──────────────────────────────────────────────────────────────
    let output = cut_card(&request, &config)
        .await
        .context("Card cutting failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        emit(&cli, &json).await?;
    } else {
        emit(&cli, &output.card_html).await?;
    }

    if !cli.quiet {
        eprintln!(
            "{}  {} paragraphs  {}ms{}",
            green("✔"),
            output.source_paragraphs,
            output.stats.total_duration_ms,
            match cli.output {
                Some(ref p) => format!("  →  {}", bold(&p.display().to_string())),
                None => String::new(),
            },
        );
        eprintln!(
            "   {} tokens in  /  {} tokens out",
            dim(&output.stats.input_tokens.to_string()),
            dim(&output.stats.output_tokens.to_string()),
        );
    }

    Ok(())
}

/// Read card text from a file, or from stdin when `path` is `-`.
async fn read_card_text(path: &str) -> Result<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read card text from stdin")?;
        Ok(buf)
    } else {
        tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read card text from {:?}", path))
    }
}

/// Write to `--output` (atomically) or stdout.
async fn emit(cli: &Cli, contents: &str) -> Result<()> {
    if let Some(ref path) = cli.output {
        write_atomic(path, contents)
            .await
            .context("Failed to write output")?;
        return Ok(());
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(contents.as_bytes())
        .context("Failed to write to stdout")?;
    // Ensure a trailing newline on stdout.
    if !contents.ends_with('\n') {
        handle.write_all(b"\n").ok();
    }
    Ok(())
}

/// Map CLI args to `CardConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<CardConfig> {
    let mut builder = CardConfig::builder()
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .max_retries(cli.max_retries)
        .download_timeout_secs(cli.download_timeout)
        .api_timeout_secs(cli.api_timeout);

    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(ref password) = cli.password {
        builder = builder.password(password.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn env_of(id: &str) -> Option<String> {
        Cli::command()
            .get_arguments()
            .find(|a| a.get_id() == id)
            .and_then(|a| a.get_env())
            .map(|e| e.to_string_lossy().into_owned())
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn provider_and_model_env_match_library() {
        assert_eq!(env_of("provider").as_deref(), Some(card_cutter::cut::PROVIDER_ENV));
        assert_eq!(env_of("model").as_deref(), Some(card_cutter::cut::MODEL_ENV));
        assert!(AFTER_HELP.contains(card_cutter::cut::PROVIDER_ENV));
    }
}
