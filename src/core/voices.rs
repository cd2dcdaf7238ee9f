//! Prebuilt voice catalog.
//!
//! | Voice | Gender | Style |
//! |-------|--------|-------|
//! | Kore | Female | Neutral / professional (default) |
//! | Zephyr | Male | Warm / narrative |
//! | Puck | Male | Energetic |
//! | Charon | Male | Deep / formal |
//! | Leda | Female | Soft / calm |
//! | Orus | Male | Authoritative |

use std::fmt;

use serde::Serialize;

/// Presented gender of a prebuilt voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceGender {
    Female,
    Male,
}

impl VoiceGender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
        }
    }
}

impl fmt::Display for VoiceGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry of the fixed voice catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoiceProfile {
    /// Voice name sent as `prebuiltVoiceConfig.voiceName`
    pub id: &'static str,
    pub gender: VoiceGender,
    pub style: &'static str,
}

static CATALOG: [VoiceProfile; 6] = [
    VoiceProfile {
        id: "Kore",
        gender: VoiceGender::Female,
        style: "Neutral/Professional",
    },
    VoiceProfile {
        id: "Zephyr",
        gender: VoiceGender::Male,
        style: "Warm/Narrative",
    },
    VoiceProfile {
        id: "Puck",
        gender: VoiceGender::Male,
        style: "Energetic",
    },
    VoiceProfile {
        id: "Charon",
        gender: VoiceGender::Male,
        style: "Deep/Formal",
    },
    VoiceProfile {
        id: "Leda",
        gender: VoiceGender::Female,
        style: "Soft/Calm",
    },
    VoiceProfile {
        id: "Orus",
        gender: VoiceGender::Male,
        style: "Authoritative",
    },
];

impl VoiceProfile {
    /// Every catalog entry, default voice first.
    pub fn all() -> &'static [VoiceProfile] {
        &CATALOG
    }

    /// Look up a voice by id (case-insensitive).
    pub fn find(id: &str) -> Option<&'static VoiceProfile> {
        CATALOG.iter().find(|v| v.id.eq_ignore_ascii_case(id.trim()))
    }
}

impl Default for VoiceProfile {
    fn default() -> Self {
        CATALOG[0]
    }
}

impl fmt::Display for VoiceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.id, self.gender, self.style)
    }
}
