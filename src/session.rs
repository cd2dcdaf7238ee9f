//! Studio session: the owner of all mutable studio state.
//!
//! A [`StudioSession`] holds the script, the voice and speed selection, the
//! tone feature flag and suggestion, the refinement mode and the single live
//! audio artifact. It wires the tone watcher, the refiner and the synthesis
//! orchestrator to one resilient client.
//!
//! # Example
//! ```rust,no_run
//! use voiceover_studio::{StudioConfig, StudioSession};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let session = StudioSession::new(StudioConfig::from_env()?)?;
//! session.set_script("Selamat datang di acara kami.");
//! session.set_voice("Charon")?;
//! let artifact = session.generate().await?;
//! println!("{} ({:.1}s)", artifact.handle(), artifact.duration_secs());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::{debug, error, info};

use crate::config::StudioConfig;
use crate::core::audio::{ArtifactStore, AudioArtifact};
use crate::core::client::{BoxedTransport, ReqwestTransport, ResilientClient};
use crate::core::gemini::TextGenerator;
use crate::core::refine::{RefinementMode, ScriptRefiner};
use crate::core::synthesis::{SpeedFactor, SynthesisOrchestrator, SynthesisRequest};
use crate::core::tone::{ToneAnalyzer, ToneWatcher};
use crate::core::voices::VoiceProfile;
use crate::errors::{StudioError, StudioResult};

#[derive(Debug, Clone)]
struct SessionState {
    script: String,
    voice: VoiceProfile,
    speed: SpeedFactor,
    tone_enabled: bool,
    mode: RefinementMode,
    current: Option<Arc<AudioArtifact>>,
}

/// Clears the refinement flag when a refinement ends, however it ends.
struct RefineGuard<'a>(&'a AtomicBool);

impl Drop for RefineGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct StudioSession {
    config: StudioConfig,
    state: RwLock<SessionState>,
    tone: ToneWatcher,
    refiner: ScriptRefiner,
    synthesizer: SynthesisOrchestrator,
    artifacts: ArtifactStore,
    refining: AtomicBool,
    synthesis_generation: AtomicU64,
}

impl StudioSession {
    /// Create a session talking to the configured API over HTTPS.
    pub fn new(config: StudioConfig) -> StudioResult<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.api_key.clone())?);
        Self::with_transport(config, transport)
    }

    /// Create a session on top of an arbitrary transport.
    pub fn with_transport(config: StudioConfig, transport: BoxedTransport) -> StudioResult<Self> {
        let voice = VoiceProfile::find(&config.default_voice)
            .copied()
            .ok_or_else(|| {
                StudioError::ValidationError(format!("Unknown voice '{}'", config.default_voice))
            })?;
        let speed = SpeedFactor::new(config.default_speed)?;

        let client = ResilientClient::new(transport, config.retry_policy());
        let text = TextGenerator::new(client.clone(), config.text_endpoint());

        let tone = ToneWatcher::new(
            ToneAnalyzer::new(text.clone(), config.tone_execute_min_chars),
            config.tone_debounce(),
            config.tone_trigger_min_chars,
        );
        let refiner = ScriptRefiner::new(text, config.script_language.clone());
        let synthesizer = SynthesisOrchestrator::new(client, config.speech_endpoint());

        let state = SessionState {
            script: String::new(),
            voice,
            speed,
            tone_enabled: config.tone_enabled,
            mode: RefinementMode::default(),
            current: None,
        };

        debug!(voice = voice.id, speed = speed.value(), "Studio session created");

        Ok(Self {
            config,
            state: RwLock::new(state),
            tone,
            refiner,
            synthesizer,
            artifacts: ArtifactStore::new(),
            refining: AtomicBool::new(false),
            synthesis_generation: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn script(&self) -> String {
        self.state.read().script.clone()
    }

    /// Replace the script and restart the tone debounce.
    pub fn set_script(&self, script: impl Into<String>) {
        let script = script.into();
        let enabled = {
            let mut state = self.state.write();
            state.script.clone_from(&script);
            state.tone_enabled
        };
        self.tone.script_changed(&script, enabled);
    }

    pub fn voice(&self) -> VoiceProfile {
        self.state.read().voice
    }

    /// Select a voice by catalog id.
    pub fn set_voice(&self, id: &str) -> StudioResult<()> {
        let voice = VoiceProfile::find(id)
            .copied()
            .ok_or_else(|| StudioError::ValidationError(format!("Unknown voice '{id}'")))?;
        self.state.write().voice = voice;
        Ok(())
    }

    pub fn speed(&self) -> SpeedFactor {
        self.state.read().speed
    }

    pub fn set_speed(&self, speed: f32) -> StudioResult<()> {
        let speed = SpeedFactor::new(speed)?;
        self.state.write().speed = speed;
        Ok(())
    }

    pub fn tone_enabled(&self) -> bool {
        self.state.read().tone_enabled
    }

    /// Toggle automatic tone detection. Toggling restarts the debounce.
    pub fn set_tone_enabled(&self, enabled: bool) {
        let script = {
            let mut state = self.state.write();
            state.tone_enabled = enabled;
            state.script.clone()
        };
        self.tone.script_changed(&script, enabled);
    }

    pub fn tone_suggestion(&self) -> Option<String> {
        self.tone.suggestion()
    }

    pub fn is_analyzing_tone(&self) -> bool {
        self.tone.is_analyzing()
    }

    /// Run a tone analysis immediately, bypassing the debounce.
    ///
    /// Any pending debounced analysis is cancelled. Returns the suggestion in
    /// effect afterwards; a failed or empty analysis keeps the previous one.
    pub async fn analyze_tone_now(&self) -> Option<String> {
        self.tone.cancel_pending();
        let (script, enabled) = {
            let state = self.state.read();
            (state.script.clone(), state.tone_enabled)
        };
        if enabled {
            if let Some(tone) = self.tone.analyzer().analyze(&script).await {
                self.tone.set_suggestion(Some(tone));
            }
        }
        self.tone.suggestion()
    }

    pub fn refinement_mode(&self) -> RefinementMode {
        self.state.read().mode
    }

    pub fn set_refinement_mode(&self, mode: RefinementMode) {
        self.state.write().mode = mode;
    }

    pub fn is_refining(&self) -> bool {
        self.refining.load(Ordering::Acquire)
    }

    /// Rewrite the script with the selected refinement mode.
    ///
    /// On success the script is replaced by the rewrite and returned.
    ///
    /// # Errors
    /// - `ValidationError` if another refinement is still running
    /// - `RefinementError` if the request fails; the script is left untouched
    pub async fn refine(&self) -> StudioResult<String> {
        if self
            .refining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(StudioError::ValidationError(
                "A refinement is already running.".to_string(),
            ));
        }
        let _guard = RefineGuard(&self.refining);

        let (script, mode) = {
            let state = self.state.read();
            (state.script.clone(), state.mode)
        };

        let refined = self.refiner.refine(&script, mode).await.inspect_err(|e| {
            error!(mode = %mode, error = %e, "Refinement failed");
        })?;

        if refined != script {
            self.set_script(refined.clone());
        }
        Ok(refined)
    }

    /// Snapshot of everything a synthesis needs right now.
    pub fn synthesis_request(&self) -> SynthesisRequest {
        let state = self.state.read();
        SynthesisRequest {
            script: state.script.clone(),
            voice: state.voice,
            speed: state.speed,
            tone_enabled: state.tone_enabled,
            tone: self.tone.suggestion(),
        }
    }

    /// Synthesize the current script and install the result as the live artifact.
    ///
    /// The previous artifact is released as soon as the request passes
    /// validation, so the slot is empty while generation runs.
    ///
    /// # Errors
    /// - `ValidationError` for an empty script (nothing is released or sent)
    /// - `SynthesisError` if the speech call fails or returns no usable audio
    /// - `Superseded` if a newer generation started before this one finished
    pub async fn generate(&self) -> StudioResult<Arc<AudioArtifact>> {
        let request = self.synthesis_request();
        request.validate()?;

        let generation = self.synthesis_generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.release_current();

        let audio = self.synthesizer.synthesize(&request).await?;

        let mut state = self.state.write();
        if self.synthesis_generation.load(Ordering::Acquire) != generation {
            debug!(generation, "Discarding superseded synthesis");
            return Err(StudioError::Superseded);
        }

        let handle = self.artifacts.register(audio.wav.clone());
        let artifact = Arc::new(AudioArtifact::new(audio, handle));
        if let Some(previous) = state.current.replace(Arc::clone(&artifact)) {
            self.artifacts.revoke(previous.handle());
        }
        drop(state);

        info!(
            handle = %artifact.handle(),
            file_name = %artifact.file_name(),
            duration_secs = artifact.duration_secs(),
            "Voice-over ready"
        );
        Ok(artifact)
    }

    pub fn current_artifact(&self) -> Option<Arc<AudioArtifact>> {
        self.state.read().current.clone()
    }

    pub fn artifact_store(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Save the live artifact into `dir`, or the configured output directory.
    pub async fn download(&self, dir: Option<&Path>) -> StudioResult<PathBuf> {
        let artifact = self.current_artifact().ok_or_else(|| {
            StudioError::ValidationError("Generate a voice-over first.".to_string())
        })?;
        let dir = dir.unwrap_or(&self.config.output_dir);
        let path = artifact.save_to(dir).await?;
        info!(path = %path.display(), mime_type = artifact.mime_type(), "Voice-over saved");
        Ok(path)
    }

    fn release_current(&self) {
        if let Some(previous) = self.state.write().current.take() {
            self.artifacts.revoke(previous.handle());
        }
    }

    /// Tear down: cancel pending tone work, drop late results and release the artifact.
    pub fn shutdown(&self) {
        self.tone.shutdown();
        self.synthesis_generation.fetch_add(1, Ordering::AcqRel);
        self.release_current();
        debug!("Studio session shut down");
    }
}
