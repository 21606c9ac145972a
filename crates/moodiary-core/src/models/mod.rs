//! Data models for moodiary

mod diary;
mod emotion;

pub use diary::{DiaryEntry, DiaryId, DiaryImage};
pub use emotion::Emotion;
