//! Progress-callback trait for stage-level events.
//!
//! Cutting a card is three stages: extract the source, generate the card
//! text, format it as HTML. Generation dominates wall-clock time (seconds to
//! tens of seconds), so callers that show a spinner or stream status to a UI
//! want to know when each stage starts and ends.
//!
//! Inject an [`Arc<dyn CutProgressCallback>`] via
//! [`crate::config::CardConfigBuilder::progress_callback`].
//!
//! # Example
//!
//! ```rust
//! use card_cutter::{CardConfig, CutProgressCallback, Stage};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl CutProgressCallback for Printer {
//!     fn on_stage_start(&self, stage: Stage) {
//!         eprintln!("{stage}…");
//!     }
//! }
//!
//! let config = CardConfig::builder()
//!     .progress_callback(Arc::new(Printer))
//!     .build()
//!     .unwrap();
//! ```

use std::fmt;
use std::sync::Arc;

/// One step of the cut pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Extract,
    Generate,
    Format,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Extract => "Extracting source text",
            Stage::Generate => "Cutting card",
            Stage::Format => "Formatting HTML",
        })
    }
}

/// Called by [`crate::cut_card`] as it moves through each [`Stage`].
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync` because the
/// config is shared with spawned blocking tasks.
pub trait CutProgressCallback: Send + Sync {
    /// Called just before a stage begins.
    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called when a stage finishes successfully.
    ///
    /// # Arguments
    /// * `stage`       — the stage that completed
    /// * `duration_ms` — wall-clock time spent in the stage
    fn on_stage_complete(&self, stage: Stage, duration_ms: u64) {
        let _ = (stage, duration_ms);
    }

    /// Called when a stage fails. The request ends after this call.
    fn on_stage_error(&self, stage: Stage, error: &str) {
        let _ = (stage, error);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl CutProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::CardConfig`].
pub type ProgressCallback = Arc<dyn CutProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl CutProgressCallback for Recorder {
        fn on_stage_start(&self, stage: Stage) {
            self.events.lock().unwrap().push(format!("start {stage:?}"));
        }

        fn on_stage_complete(&self, stage: Stage, _duration_ms: u64) {
            self.events.lock().unwrap().push(format!("done {stage:?}"));
        }

        fn on_stage_error(&self, stage: Stage, error: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("error {stage:?}: {error}"));
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_stage_start(Stage::Extract);
        cb.on_stage_complete(Stage::Extract, 12);
        cb.on_stage_error(Stage::Generate, "boom");
    }

    #[test]
    fn recorder_sees_events_in_order() {
        let rec = Recorder::default();
        rec.on_stage_start(Stage::Extract);
        rec.on_stage_complete(Stage::Extract, 3);
        rec.on_stage_start(Stage::Generate);
        rec.on_stage_error(Stage::Generate, "timeout");

        let events = rec.events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                "start Extract",
                "done Extract",
                "start Generate",
                "error Generate: timeout"
            ]
        );
    }

    #[test]
    fn stage_display_is_human_readable() {
        assert_eq!(Stage::Generate.to_string(), "Cutting card");
    }
}
