//! Database migrations

use crate::error::Result;
use libsql::Connection;

/// Current schema version
const CURRENT_VERSION: i32 = 1;

/// Run all pending migrations
pub async fn run(conn: &Connection) -> Result<()> {
    let version = get_version(conn).await?;

    if version < 1 {
        migrate_v1(conn).await?;
    }

    Ok(())
}

/// Get the current schema version
async fn get_version(conn: &Connection) -> Result<i32> {
    // Check if schema_version table exists
    let mut rows = conn
        .query(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            (),
        )
        .await?;

    let exists: bool = if let Some(row) = rows.next().await? {
        row.get::<i32>(0)? != 0
    } else {
        false
    };

    if !exists {
        return Ok(0);
    }

    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM schema_version", ())
        .await?;

    let version: i32 = if let Some(row) = rows.next().await? {
        row.get(0)?
    } else {
        0
    };

    Ok(version)
}

/// Migration to version 1: Initial schema
async fn migrate_v1(conn: &Connection) -> Result<()> {
    // libsql doesn't have execute_batch, so we run each statement separately
    // Using a transaction for atomicity

    conn.execute("BEGIN TRANSACTION", ()).await?;

    let statements = [
        // Schema version tracking
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        // Diary entries
        "CREATE TABLE IF NOT EXISTS diaries (
            id TEXT PRIMARY KEY,
            emotion TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_diaries_created ON diaries(created_at DESC)",
        // Images owned by a diary entry, ordered by position
        "CREATE TABLE IF NOT EXISTS diary_images (
            id TEXT PRIMARY KEY,
            diary_id TEXT NOT NULL REFERENCES diaries(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            data BLOB NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_diary_images_diary ON diary_images(diary_id, position)",
    ];

    for statement in statements {
        if let Err(error) = conn.execute(statement, ()).await {
            conn.execute("ROLLBACK", ()).await.ok();
            return Err(error.into());
        }
    }

    if let Err(error) = conn
        .execute(
            "INSERT OR REPLACE INTO schema_version (version) VALUES (?)",
            [CURRENT_VERSION],
        )
        .await
    {
        conn.execute("ROLLBACK", ()).await.ok();
        return Err(error.into());
    }

    conn.execute("COMMIT", ()).await?;
    tracing::debug!("Migrated database schema to v{CURRENT_VERSION}");

    Ok(())
}
