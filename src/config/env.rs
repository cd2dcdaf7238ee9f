use std::path::PathBuf;
use std::str::FromStr;

use super::StudioConfig;

/// Read a variable, treating empty values as unset.
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str) -> Result<Option<T>, Box<dyn std::error::Error>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("Invalid value for {key} ('{raw}'): {e}").into()),
        None => Ok(None),
    }
}

fn parse_bool(key: &str) -> Result<Option<bool>, Box<dyn std::error::Error>> {
    match env_var(key) {
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(format!("Invalid boolean for {key}: '{raw}'").into()),
        },
        None => Ok(None),
    }
}

/// Overlay environment variables onto `config`.
pub(super) fn apply_env(config: &mut StudioConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(key) = env_var("GEMINI_API_KEY") {
        config.api_key = Some(key);
    }
    if let Some(base) = env_var("STUDIO_API_BASE_URL") {
        config.api_base_url = base;
    }
    if let Some(model) = env_var("STUDIO_TEXT_MODEL") {
        config.text_model = model;
    }
    if let Some(model) = env_var("STUDIO_SPEECH_MODEL") {
        config.speech_model = model;
    }
    if let Some(retries) = parse_env("STUDIO_MAX_RETRIES")? {
        config.max_retries = retries;
    }
    if let Some(backoff) = parse_env("STUDIO_INITIAL_BACKOFF_MS")? {
        config.initial_backoff_ms = backoff;
    }
    if let Some(enabled) = parse_bool("STUDIO_AUTO_TONE")? {
        config.tone_enabled = enabled;
    }
    if let Some(debounce) = parse_env("STUDIO_TONE_DEBOUNCE_MS")? {
        config.tone_debounce_ms = debounce;
    }
    if let Some(voice) = env_var("STUDIO_DEFAULT_VOICE") {
        config.default_voice = voice;
    }
    if let Some(speed) = parse_env("STUDIO_DEFAULT_SPEED")? {
        config.default_speed = speed;
    }
    if let Some(language) = env_var("STUDIO_SCRIPT_LANGUAGE") {
        config.script_language = language;
    }
    if let Some(dir) = env_var("STUDIO_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }
    Ok(())
}
