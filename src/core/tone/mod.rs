//! Tone analysis.
//!
//! [`ToneAnalyzer`] asks the text model for a single adjective describing how
//! a script should be spoken. [`ToneWatcher`] wraps it with a debounce so a
//! burst of edits triggers at most one analysis, and results from superseded
//! edits are dropped.

mod analyzer;
mod watcher;

pub use analyzer::{ToneAnalyzer, sanitize_tone, tone_prompt};
pub use watcher::ToneWatcher;
