use anyhow::{Context, Result};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tokio::fs;
use tracing::info;

/// Shared SQLite handle
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_max_connections(db_url, 5).await
    }

    pub async fn with_max_connections(db_url: &str, max_connections: u32) -> Result<Self> {
        // Ensure the directory exists if it's a file path
        if let Some(path_part) = db_url.strip_prefix("sqlite://") {
            let path = Path::new(path_part);
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                fs::create_dir_all(parent)
                    .await
                    .context("Failed to create database directory")?;
            }
        }

        let options = SqliteConnectOptions::from_str(db_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal); // Readers never see a half-written rollup

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite database")?;

        info!("Connected to database: {}", db_url);

        let db = Self { pool };
        db.init().await?;

        Ok(db)
    }

    /// Private in-memory database. Pinned to a single connection that never
    /// expires, since every SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        let db = Self { pool };
        db.init().await?;

        Ok(db)
    }

    /// Initialize database schema
    async fn init(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;

        // 1. Raw posts, one row per scored post. (date, url) is the natural
        //    key; NULL urls never conflict and always append.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts_raw (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                subreddit TEXT,
                post_title TEXT,
                post_content TEXT,
                post_author TEXT,
                reddit_score INTEGER,
                num_comments INTEGER,
                post_sentiment TEXT,
                post_score REAL,
                post_word_score REAL,
                comment_sentiment TEXT,
                comment_score REAL,
                comment_scores TEXT,
                overall_sentiment TEXT,
                overall_score REAL,
                num_comments_analyzed INTEGER,
                url TEXT,
                created TEXT,
                ingested_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(date, url)
            );
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create posts_raw table")?;

        // 2. Ticker mentions, one row per (post, ticker)
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stock_mentions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                post_id INTEGER NOT NULL,
                ticker TEXT NOT NULL,
                date TEXT NOT NULL,
                FOREIGN KEY (post_id) REFERENCES posts_raw (id),
                UNIQUE(post_id, ticker)
            );
            CREATE INDEX IF NOT EXISTS idx_stock_mentions_date
            ON stock_mentions (date);
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create stock_mentions table")?;

        // 3. Daily summary. No surrogate id or timestamp, so a recomputed
        //    row is identical to the one it replaces.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS daily_ticker_summary (
                date TEXT NOT NULL,
                ticker TEXT NOT NULL,
                mention_count INTEGER NOT NULL,
                total_posts INTEGER NOT NULL,
                total_comments INTEGER NOT NULL,
                avg_post_score REAL NOT NULL,
                avg_comment_score REAL NOT NULL,
                avg_overall_score REAL NOT NULL,
                sentiment_positive INTEGER NOT NULL,
                sentiment_negative INTEGER NOT NULL,
                sentiment_neutral INTEGER NOT NULL,
                subreddit_breakdown TEXT NOT NULL,
                PRIMARY KEY (date, ticker)
            );
            CREATE INDEX IF NOT EXISTS idx_summary_ticker_date
            ON daily_ticker_summary (ticker, date);
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create daily_ticker_summary table")?;

        info!("Database schema initialized.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_schema_is_created() {
        let db = Database::in_memory().await.unwrap();

        let rows = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(&db.pool)
            .await
            .unwrap();
        let tables: Vec<String> = rows.iter().map(|r| r.get("name")).collect();

        assert!(tables.contains(&"posts_raw".to_string()));
        assert!(tables.contains(&"stock_mentions".to_string()));
        assert!(tables.contains(&"daily_ticker_summary".to_string()));
    }

    #[tokio::test]
    async fn test_init_is_repeatable() {
        let db = Database::in_memory().await.unwrap();
        db.init().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_database_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pulse.db");
        let url = format!("sqlite://{}", path.display());

        let db = Database::new(&url).await.unwrap();
        db.pool.close().await;
        assert!(path.exists());
    }
}
