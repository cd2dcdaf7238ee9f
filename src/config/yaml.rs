use serde::Deserialize;
use std::path::PathBuf;

use super::StudioConfig;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present in
/// the file override environment variables and defaults.
///
/// # Example YAML structure
/// ```yaml
/// api:
///   api_key: "your-api-key"
///   base_url: "https://generativelanguage.googleapis.com/v1beta"
///   text_model: "gemini-2.5-flash-preview-09-2025"
///   speech_model: "gemini-2.5-flash-preview-tts"
///
/// retry:
///   max_retries: 5
///   initial_backoff_ms: 1000
///
/// tone:
///   enabled: true
///   debounce_ms: 1500
///   trigger_min_chars: 10
///   execute_min_chars: 5
///
/// session:
///   default_voice: "Kore"
///   default_speed: 1.0
///   script_language: "Indonesian"
///
/// output:
///   dir: "./voiceovers"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub api: Option<ApiYaml>,
    pub retry: Option<RetryYaml>,
    pub tone: Option<ToneYaml>,
    pub session: Option<SessionYaml>,
    pub output: Option<OutputYaml>,
}

/// Remote API settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ApiYaml {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub text_model: Option<String>,
    pub speech_model: Option<String>,
}

/// Retry settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RetryYaml {
    pub max_retries: Option<u32>,
    pub initial_backoff_ms: Option<u64>,
}

/// Tone analysis settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ToneYaml {
    pub enabled: Option<bool>,
    pub debounce_ms: Option<u64>,
    pub trigger_min_chars: Option<usize>,
    pub execute_min_chars: Option<usize>,
}

/// Session defaults from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SessionYaml {
    pub default_voice: Option<String>,
    pub default_speed: Option<f32>,
    pub script_language: Option<String>,
}

/// Artifact output settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct OutputYaml {
    pub dir: Option<PathBuf>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the YAML is malformed.
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }

    /// Overlay every value present in the file onto `config`.
    pub fn apply(self, config: &mut StudioConfig) {
        if let Some(api) = self.api {
            if let Some(key) = api.api_key {
                config.api_key = Some(key);
            }
            if let Some(base) = api.base_url {
                config.api_base_url = base;
            }
            if let Some(model) = api.text_model {
                config.text_model = model;
            }
            if let Some(model) = api.speech_model {
                config.speech_model = model;
            }
        }

        if let Some(retry) = self.retry {
            if let Some(retries) = retry.max_retries {
                config.max_retries = retries;
            }
            if let Some(backoff) = retry.initial_backoff_ms {
                config.initial_backoff_ms = backoff;
            }
        }

        if let Some(tone) = self.tone {
            if let Some(enabled) = tone.enabled {
                config.tone_enabled = enabled;
            }
            if let Some(debounce) = tone.debounce_ms {
                config.tone_debounce_ms = debounce;
            }
            if let Some(trigger) = tone.trigger_min_chars {
                config.tone_trigger_min_chars = trigger;
            }
            if let Some(execute) = tone.execute_min_chars {
                config.tone_execute_min_chars = execute;
            }
        }

        if let Some(session) = self.session {
            if let Some(voice) = session.default_voice {
                config.default_voice = voice;
            }
            if let Some(speed) = session.default_speed {
                config.default_speed = speed;
            }
            if let Some(language) = session.script_language {
                config.script_language = language;
            }
        }

        if let Some(dir) = self.output.and_then(|o| o.dir) {
            config.output_dir = dir;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_config_full() {
        let yaml = r#"
api:
  api_key: "key-123"
  base_url: "http://127.0.0.1:8080/v1beta"
  text_model: "text-model"
  speech_model: "speech-model"

retry:
  max_retries: 2
  initial_backoff_ms: 50

tone:
  enabled: false
  debounce_ms: 300
  trigger_min_chars: 20
  execute_min_chars: 8

session:
  default_voice: "Leda"
  default_speed: 1.5
  script_language: "English"

output:
  dir: "/tmp/voiceovers"
"#;

        let yaml_config: YamlConfig = serde_yaml::from_str(yaml).unwrap();
        let mut config = StudioConfig::default();
        yaml_config.apply(&mut config);

        assert_eq!(config.api_key.as_deref(), Some("key-123"));
        assert_eq!(config.api_base_url, "http://127.0.0.1:8080/v1beta");
        assert_eq!(config.text_model, "text-model");
        assert_eq!(config.speech_model, "speech-model");
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.initial_backoff_ms, 50);
        assert!(!config.tone_enabled);
        assert_eq!(config.tone_debounce_ms, 300);
        assert_eq!(config.tone_trigger_min_chars, 20);
        assert_eq!(config.tone_execute_min_chars, 8);
        assert_eq!(config.default_voice, "Leda");
        assert!((config.default_speed - 1.5).abs() < f32::EPSILON);
        assert_eq!(config.script_language, "English");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/voiceovers"));
    }

    #[test]
    fn test_yaml_config_partial_keeps_defaults() {
        let yaml = r#"
retry:
  max_retries: 0
"#;
        let yaml_config: YamlConfig = serde_yaml::from_str(yaml).unwrap();
        let mut config = StudioConfig::default();
        yaml_config.apply(&mut config);

        assert_eq!(config.max_retries, 0);
        assert_eq!(config.initial_backoff_ms, 1000);
        assert_eq!(config.default_voice, "Kore");
    }

    #[test]
    fn test_yaml_config_empty() {
        let yaml_config: YamlConfig = serde_yaml::from_str("").unwrap_or_default();
        let mut config = StudioConfig::default();
        yaml_config.apply(&mut config);
        assert_eq!(config, StudioConfig::default());
    }

    #[test]
    fn test_from_file_missing() {
        let path = PathBuf::from("/nonexistent/studio.yaml");
        assert!(YamlConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_from_file_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.yaml");
        fs::write(&path, "retry: [not, a, map").unwrap();
        assert!(YamlConfig::from_file(&path).is_err());
    }
}
