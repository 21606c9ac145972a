//! moodiary-core - Core library for moodiary
//!
//! This crate contains the shared models, database layer, and the reactive
//! diary store used by all moodiary interfaces.

pub mod db;
pub mod error;
pub mod models;
pub mod quotes;
pub mod store;
pub mod week;

pub use error::{Error, Result};
pub use models::{DiaryEntry, DiaryId, DiaryImage, Emotion};
pub use store::DiaryStore;
