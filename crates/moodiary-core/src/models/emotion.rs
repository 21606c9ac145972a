//! Emotion category model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A mood tag classifying a diary entry.
///
/// The set is closed: entries are persisted with the lowercase raw key
/// (`as_str`), and a key that maps to no variant is a representational
/// error ([`Error::UnknownEmotion`]), never an empty or default category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Excited,
    Calm,
    Tired,
    Sad,
    Angry,
}

impl Emotion {
    /// All emotion categories, in display order.
    pub const ALL: [Self; 6] = [
        Self::Happy,
        Self::Excited,
        Self::Calm,
        Self::Tired,
        Self::Sad,
        Self::Angry,
    ];

    /// The raw string key this emotion is persisted under.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Excited => "excited",
            Self::Calm => "calm",
            Self::Tired => "tired",
            Self::Sad => "sad",
            Self::Angry => "angry",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "happy" => Ok(Self::Happy),
            "excited" => Ok(Self::Excited),
            "calm" => Ok(Self::Calm),
            "tired" => Ok(Self::Tired),
            "sad" => Ok(Self::Sad),
            "angry" => Ok(Self::Angry),
            other => Err(Error::UnknownEmotion(other.to_string())),
        }
    }
}
