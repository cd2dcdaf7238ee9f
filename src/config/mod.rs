//! Configuration module for the voice-over studio
//!
//! This module handles studio configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//!
//! # Example
//! ```rust,no_run
//! use voiceover_studio::config::StudioConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = StudioConfig::from_env()?;
//!
//! // Load from YAML file with environment variable fallbacks
//! let config_path = PathBuf::from("studio.yaml");
//! let config = StudioConfig::from_file(&config_path)?;
//!
//! println!("Speech endpoint: {}", config.speech_endpoint());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

mod env;
mod yaml;

pub use yaml::YamlConfig;

use crate::core::client::RetryPolicy;
use crate::core::synthesis::SpeedFactor;
use crate::core::voices::VoiceProfile;

/// Default Generative Language API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used for tone analysis and script refinement.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

/// Default model used for speech synthesis.
pub const DEFAULT_SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Studio configuration
///
/// Contains everything a [`crate::session::StudioSession`] needs:
/// - Remote API settings (key, base URL, models)
/// - Retry policy for every remote call
/// - Tone analysis debounce and thresholds
/// - Defaults for voice, speed and script language
/// - Where downloaded artifacts are written
#[derive(Debug, Clone, PartialEq)]
pub struct StudioConfig {
    // Remote API settings
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub text_model: String,
    pub speech_model: String,

    // Retry settings
    pub max_retries: u32,
    pub initial_backoff_ms: u64,

    // Tone analysis settings
    pub tone_enabled: bool,
    pub tone_debounce_ms: u64,
    /// Script must be longer than this for the debounce timer to fire an analysis
    pub tone_trigger_min_chars: usize,
    /// Script must be at least this long for an analysis to execute at all
    pub tone_execute_min_chars: usize,

    // Session defaults
    pub default_voice: String,
    pub default_speed: f32,
    /// Language the refinement instructions ask the model to write in
    pub script_language: String,

    // Artifact output
    pub output_dir: PathBuf,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            speech_model: DEFAULT_SPEECH_MODEL.to_string(),
            max_retries: 5,
            initial_backoff_ms: 1000,
            tone_enabled: true,
            tone_debounce_ms: 1500,
            tone_trigger_min_chars: 10,
            tone_execute_min_chars: 5,
            default_voice: VoiceProfile::default().id.to_string(),
            default_speed: 1.0,
            script_language: "Indonesian".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl StudioConfig {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults. The `.env` file, if any, is loaded
    /// by the binary before this is called.
    ///
    /// # Errors
    /// Returns an error if a variable has an invalid format or validation fails.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = Self::default();
        env::apply_env(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable fallbacks
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = YamlConfig::from_file(path)?;

        let mut config = Self::default();
        env::apply_env(&mut config)?;
        yaml_config.apply(&mut config);

        config.validate()?;
        Ok(config)
    }

    /// Validate the merged configuration
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        let base = url::Url::parse(&self.api_base_url)
            .map_err(|e| format!("Invalid api_base_url '{}': {e}", self.api_base_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(format!("api_base_url must use http or https, got '{}'", base.scheme()).into());
        }

        if self.text_model.trim().is_empty() || self.speech_model.trim().is_empty() {
            return Err("text_model and speech_model must not be empty".into());
        }

        if self.initial_backoff_ms == 0 {
            return Err("initial_backoff_ms must be greater than zero".into());
        }

        if self.tone_debounce_ms == 0 {
            return Err("tone_debounce_ms must be greater than zero".into());
        }

        if VoiceProfile::find(&self.default_voice).is_none() {
            return Err(format!("Unknown default_voice '{}'", self.default_voice).into());
        }

        SpeedFactor::new(self.default_speed).map_err(|e| e.to_string())?;

        Ok(())
    }

    /// Retry policy applied to every remote call
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_millis(self.initial_backoff_ms),
        )
    }

    /// Debounce window for tone analysis
    pub fn tone_debounce(&self) -> Duration {
        Duration::from_millis(self.tone_debounce_ms)
    }

    /// Full URL of the text-generation endpoint
    pub fn text_endpoint(&self) -> String {
        generate_content_url(&self.api_base_url, &self.text_model)
    }

    /// Full URL of the speech endpoint
    pub fn speech_endpoint(&self) -> String {
        generate_content_url(&self.api_base_url, &self.speech_model)
    }
}

fn generate_content_url(base: &str, model: &str) -> String {
    format!("{}/models/{model}:generateContent", base.trim_end_matches('/'))
}
