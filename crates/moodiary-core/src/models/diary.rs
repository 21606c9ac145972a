//! Diary entry model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

use super::emotion::Emotion;

/// A unique identifier for a diary entry, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiaryId(Uuid);

impl DiaryId {
    /// Create a new unique diary ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for DiaryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DiaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DiaryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// An image attached to a diary entry.
///
/// Images are exclusively owned by their entry; they are stored and deleted
/// with it and never shared between entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryImage {
    /// Raw encoded image bytes.
    pub bytes: Vec<u8>,
}

impl DiaryImage {
    /// Create an image payload from encoded bytes.
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::InvalidInput(
                "Diary image bytes cannot be empty".to_string(),
            ));
        }
        Ok(Self { bytes })
    }
}

/// A diary entry in the journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    /// Unique identifier, immutable, assigned at creation
    pub id: DiaryId,
    /// Emotion category tag
    pub emotion: Emotion,
    /// Free-text body
    pub content: String,
    /// Creation timestamp (Unix ms); the sole ordering key
    pub created_at: i64,
    /// Attached images, owned by this entry
    pub images: Vec<DiaryImage>,
}

impl DiaryEntry {
    /// Create a new entry stamped with the current time and a fresh id.
    pub fn new(emotion: Emotion, content: impl Into<String>) -> Result<Self> {
        let content = content.into().trim().to_string();
        if content.is_empty() {
            return Err(Error::InvalidInput(
                "Diary content cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            id: DiaryId::new(),
            emotion,
            content,
            created_at: chrono::Utc::now().timestamp_millis(),
            images: Vec::new(),
        })
    }

    /// Attach images to this entry.
    #[must_use]
    pub fn with_images(mut self, images: Vec<DiaryImage>) -> Self {
        self.images = images;
        self
    }
}
