//! Database layer for moodiary

mod connection;
mod migrations;
mod repository;

pub use connection::Database;
pub use repository::{DiaryRepository, LibSqlDiaryRepository, WeeklySummary};
