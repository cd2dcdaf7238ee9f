//! Speed, pace and narration prompt composition.

use std::fmt;

use crate::errors::{StudioError, StudioResult};

/// Slowest accepted speed factor.
pub const MIN_SPEED: f32 = 0.5;

/// Fastest accepted speed factor.
pub const MAX_SPEED: f32 = 2.0;

const SLOW_BELOW: f32 = 0.8;
const FAST_ABOVE: f32 = 1.2;

/// Speaking speed in `[0.5, 2.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SpeedFactor(f32);

impl SpeedFactor {
    /// Validate `value` against the closed range.
    pub fn new(value: f32) -> StudioResult<Self> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&value) {
            return Err(StudioError::ValidationError(format!(
                "Speed must be between {MIN_SPEED} and {MAX_SPEED}, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    /// Bucket used in the narration prompt.
    pub fn pace(&self) -> Pace {
        Pace::from_speed(self.0)
    }
}

impl Default for SpeedFactor {
    fn default() -> Self {
        Self(1.0)
    }
}

impl TryFrom<f32> for SpeedFactor {
    type Error = StudioError;

    fn try_from(value: f32) -> StudioResult<Self> {
        Self::new(value)
    }
}

/// Discrete pace bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    Slow,
    Normal,
    Fast,
}

impl Pace {
    /// Open-interval classification: exactly 0.8 and 1.2 are `Normal`.
    pub fn from_speed(speed: f32) -> Self {
        if speed > FAST_ABOVE {
            Self::Fast
        } else if speed < SLOW_BELOW {
            Self::Slow
        } else {
            Self::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Normal => "normal",
            Self::Fast => "fast",
        }
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the instruction sent to the speech model.
///
/// With a tone, the model is asked for expressive narration in that tone;
/// without one, a plain professional reading at the given pace.
pub fn compose_prompt(script: &str, pace: Pace, tone: Option<&str>) -> String {
    match tone {
        Some(tone) => format!(
            "Narrate the following text with a {tone} tone. Maintain a {pace} pace. \
             The delivery should be expressive and professional. Text: \"{script}\""
        ),
        None => format!("Speak in a professional tone at {pace} speed: \"{script}\""),
    }
}
