use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::ToneAnalyzer;

#[derive(Default)]
struct WatchState {
    suggestion: RwLock<Option<String>>,
    /// Bumped on every edit; an analysis only lands if it still matches.
    generation: AtomicU64,
    in_flight: AtomicUsize,
}

/// Debounced tone analysis driven by script edits.
///
/// Each call to [`ToneWatcher::script_changed`] cancels the pending timer and
/// starts a new one. When a timer survives the full debounce window the
/// analysis runs, and its result is applied only if no newer edit arrived in
/// the meantime (last write wins).
pub struct ToneWatcher {
    analyzer: ToneAnalyzer,
    debounce: Duration,
    trigger_min_chars: usize,
    state: Arc<WatchState>,
    pending: Mutex<Option<CancellationToken>>,
}

impl ToneWatcher {
    /// `trigger_min_chars`: the script must be strictly longer than this for
    /// a timer to start an analysis.
    pub fn new(analyzer: ToneAnalyzer, debounce: Duration, trigger_min_chars: usize) -> Self {
        Self {
            analyzer,
            debounce,
            trigger_min_chars,
            state: Arc::new(WatchState::default()),
            pending: Mutex::new(None),
        }
    }

    /// Latest accepted tone suggestion.
    pub fn suggestion(&self) -> Option<String> {
        self.state.suggestion.read().clone()
    }

    pub fn set_suggestion(&self, tone: Option<String>) {
        *self.state.suggestion.write() = tone;
    }

    /// True while at least one analysis request is outstanding.
    pub fn is_analyzing(&self) -> bool {
        self.state.in_flight.load(Ordering::Acquire) > 0
    }

    pub fn analyzer(&self) -> &ToneAnalyzer {
        &self.analyzer
    }

    /// Record an edit and (re)arm the debounce timer.
    ///
    /// Must be called from within a Tokio runtime; outside one the edit is
    /// still recorded but no analysis is scheduled.
    pub fn script_changed(&self, script: &str, enabled: bool) {
        let token = CancellationToken::new();
        let generation = {
            // Bump and swap under one lock so the newest edit always owns the live timer
            let mut pending = self.pending.lock();
            let generation = self.state.generation.fetch_add(1, Ordering::AcqRel) + 1;
            if let Some(previous) = pending.replace(token.clone()) {
                previous.cancel();
            }
            generation
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No async runtime available; tone analysis not scheduled");
                return;
            }
        };

        let script = script.to_string();
        let analyzer = self.analyzer.clone();
        let state = Arc::clone(&self.state);
        let debounce = self.debounce;
        let trigger_min_chars = self.trigger_min_chars;

        runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(generation, "Tone timer superseded");
                    return;
                }
                _ = tokio::time::sleep(debounce) => {}
            }

            if !enabled || script.trim().is_empty() || script.chars().count() <= trigger_min_chars {
                debug!(generation, enabled, "Tone timer fired without analysis");
                return;
            }

            state.in_flight.fetch_add(1, Ordering::AcqRel);
            let tone = analyzer.analyze(&script).await;
            state.in_flight.fetch_sub(1, Ordering::AcqRel);

            if state.generation.load(Ordering::Acquire) != generation {
                debug!(generation, "Discarding tone for stale script");
                return;
            }
            if let Some(tone) = tone {
                *state.suggestion.write() = Some(tone);
            }
        });
    }

    /// Cancel the pending timer and ignore any in-flight result.
    pub fn cancel_pending(&self) {
        let mut pending = self.pending.lock();
        self.state.generation.fetch_add(1, Ordering::AcqRel);
        if let Some(token) = pending.take() {
            token.cancel();
        }
    }

    pub fn shutdown(&self) {
        self.cancel_pending();
        debug!("Tone watcher stopped");
    }
}

impl Drop for ToneWatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
