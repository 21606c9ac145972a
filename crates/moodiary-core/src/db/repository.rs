//! Diary repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite stores image positions as i64

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Datelike, TimeZone, Utc, Weekday};
use libsql::params;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{DiaryEntry, DiaryId, DiaryImage, Emotion};
use crate::week;

use super::connection::Database;

/// Emotions recorded per weekday of one week window.
pub type WeeklySummary = HashMap<Weekday, Vec<Emotion>>;

/// Trait for durable diary storage operations (async)
///
/// The store talks to storage exclusively through this trait, so a test
/// double can stand in for the real database.
#[allow(async_fn_in_trait)]
pub trait DiaryRepository {
    /// Fetch every stored diary entry, newest first
    async fn fetch_all(&self) -> Result<Vec<DiaryEntry>>;

    /// Emotions grouped by weekday for the week containing `date`
    async fn fetch_weekly_summary(&self, date: DateTime<Utc>) -> Result<WeeklySummary>;

    /// One representative image (or none) per stored diary entry, newest first
    async fn fetch_first_images(&self) -> Result<Vec<(Option<DiaryImage>, DiaryId)>>;

    /// Persist a new entry together with its images
    async fn save(&self, entry: &DiaryEntry) -> Result<()>;

    /// Replace a stored entry (and its images) by id
    async fn update(&self, entry: &DiaryEntry) -> Result<()>;

    /// Delete an entry and its images by id
    async fn delete(&self, id: &DiaryId) -> Result<()>;
}

/// libSQL implementation of `DiaryRepository`
pub struct LibSqlDiaryRepository {
    db: Database,
}

impl LibSqlDiaryRepository {
    /// Create a repository over an already-opened database
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the repository at the given filesystem path
    pub async fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Database::open(path).await?))
    }

    /// Open an in-memory repository (primarily for tests)
    pub async fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory().await?))
    }

    /// Load all images keyed by diary id, ordered by position.
    async fn fetch_images(&self) -> Result<HashMap<String, Vec<DiaryImage>>> {
        let mut rows = self
            .db
            .connection()
            .query(
                "SELECT diary_id, data FROM diary_images ORDER BY diary_id, position",
                (),
            )
            .await?;

        let mut images: HashMap<String, Vec<DiaryImage>> = HashMap::new();
        while let Some(row) = rows.next().await? {
            let diary_id: String = row.get(0)?;
            let data: Vec<u8> = row.get(1)?;
            images.entry(diary_id).or_default().push(DiaryImage { bytes: data });
        }

        Ok(images)
    }

    async fn insert_images(&self, diary_id: &DiaryId, images: &[DiaryImage]) -> Result<()> {
        for (position, image) in images.iter().enumerate() {
            self.db
                .connection()
                .execute(
                    "INSERT INTO diary_images (id, diary_id, position, data) VALUES (?, ?, ?, ?)",
                    params![
                        Uuid::now_v7().to_string(),
                        diary_id.as_str(),
                        position as i64,
                        image.bytes.clone()
                    ],
                )
                .await?;
        }
        Ok(())
    }

    async fn rollback(&self) {
        self.db.connection().execute("ROLLBACK", ()).await.ok();
    }
}

impl DiaryRepository for LibSqlDiaryRepository {
    async fn fetch_all(&self) -> Result<Vec<DiaryEntry>> {
        let mut images = self.fetch_images().await?;

        let mut rows = self
            .db
            .connection()
            .query(
                "SELECT id, emotion, content, created_at FROM diaries ORDER BY created_at DESC",
                (),
            )
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            let raw_id: String = row.get(0)?;
            let raw_emotion: String = row.get(1)?;

            // A row that violates the model invariants is excluded rather
            // than surfaced as a default-valued entry.
            let Ok(id) = raw_id.parse::<DiaryId>() else {
                tracing::warn!("Skipping diary row with malformed id: {raw_id}");
                continue;
            };
            let Ok(emotion) = raw_emotion.parse::<Emotion>() else {
                tracing::warn!("Skipping diary {raw_id} with unknown emotion key: {raw_emotion}");
                continue;
            };

            entries.push(DiaryEntry {
                id,
                emotion,
                content: row.get(2)?,
                created_at: row.get(3)?,
                images: images.remove(&raw_id).unwrap_or_default(),
            });
        }

        Ok(entries)
    }

    async fn fetch_weekly_summary(&self, date: DateTime<Utc>) -> Result<WeeklySummary> {
        let (start, end) = week::week_bounds(date);

        let mut rows = self
            .db
            .connection()
            .query(
                "SELECT emotion, created_at FROM diaries
                 WHERE created_at >= ? AND created_at < ?
                 ORDER BY created_at ASC",
                params![start, end],
            )
            .await?;

        let mut summary = WeeklySummary::new();
        while let Some(row) = rows.next().await? {
            let raw_emotion: String = row.get(0)?;
            let created_at: i64 = row.get(1)?;

            let Ok(emotion) = raw_emotion.parse::<Emotion>() else {
                tracing::warn!("Skipping summary row with unknown emotion key: {raw_emotion}");
                continue;
            };
            let Some(created) = Utc.timestamp_millis_opt(created_at).single() else {
                tracing::warn!("Skipping summary row with out-of-range timestamp: {created_at}");
                continue;
            };

            summary.entry(created.weekday()).or_default().push(emotion);
        }

        Ok(summary)
    }

    async fn fetch_first_images(&self) -> Result<Vec<(Option<DiaryImage>, DiaryId)>> {
        let mut rows = self
            .db
            .connection()
            .query(
                "SELECT d.id,
                        (SELECT i.data FROM diary_images i
                          WHERE i.diary_id = d.id
                          ORDER BY i.position ASC
                          LIMIT 1)
                 FROM diaries d
                 ORDER BY d.created_at DESC",
                (),
            )
            .await?;

        let mut firsts = Vec::new();
        while let Some(row) = rows.next().await? {
            let raw_id: String = row.get(0)?;
            let Ok(id) = raw_id.parse::<DiaryId>() else {
                tracing::warn!("Skipping first-image row with malformed id: {raw_id}");
                continue;
            };
            let data: Option<Vec<u8>> = row.get(1)?;
            firsts.push((data.map(|bytes| DiaryImage { bytes }), id));
        }

        Ok(firsts)
    }

    async fn save(&self, entry: &DiaryEntry) -> Result<()> {
        let conn = self.db.connection();
        conn.execute("BEGIN TRANSACTION", ()).await?;

        let inserted = conn
            .execute(
                "INSERT INTO diaries (id, emotion, content, created_at) VALUES (?, ?, ?, ?)",
                params![
                    entry.id.as_str(),
                    entry.emotion.as_str(),
                    entry.content.clone(),
                    entry.created_at
                ],
            )
            .await;
        if let Err(error) = inserted {
            self.rollback().await;
            return Err(error.into());
        }

        if let Err(error) = self.insert_images(&entry.id, &entry.images).await {
            self.rollback().await;
            return Err(error);
        }

        conn.execute("COMMIT", ()).await?;
        Ok(())
    }

    async fn update(&self, entry: &DiaryEntry) -> Result<()> {
        let conn = self.db.connection();
        conn.execute("BEGIN TRANSACTION", ()).await?;

        let updated = conn
            .execute(
                "UPDATE diaries SET emotion = ?, content = ?, created_at = ? WHERE id = ?",
                params![
                    entry.emotion.as_str(),
                    entry.content.clone(),
                    entry.created_at,
                    entry.id.as_str()
                ],
            )
            .await;
        match updated {
            Err(error) => {
                self.rollback().await;
                return Err(error.into());
            }
            Ok(0) => {
                self.rollback().await;
                return Err(Error::NotFound(entry.id.to_string()));
            }
            Ok(_) => {}
        }

        // Images are replaced wholesale with the entry
        if let Err(error) = conn
            .execute(
                "DELETE FROM diary_images WHERE diary_id = ?",
                [entry.id.as_str()],
            )
            .await
        {
            self.rollback().await;
            return Err(error.into());
        }
        if let Err(error) = self.insert_images(&entry.id, &entry.images).await {
            self.rollback().await;
            return Err(error);
        }

        conn.execute("COMMIT", ()).await?;
        Ok(())
    }

    async fn delete(&self, id: &DiaryId) -> Result<()> {
        // Image rows cascade with the diary row
        let rows = self
            .db
            .connection()
            .execute("DELETE FROM diaries WHERE id = ?", [id.as_str()])
            .await?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        Ok(())
    }
}
