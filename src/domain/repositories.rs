//! Repository Pattern Abstractions
//!
//! This module defines the persistence contract for scored posts and their
//! daily rollup, keeping the scoring pipeline independent of the storage
//! engine.
//!
//! # Design
//!
//! `SentimentRepository::commit_daily_batch` is the Rollup Engine: it writes
//! raw posts and ticker mentions for a date and recomputes that date's
//! summaries from scratch, all in one transaction. Either everything for the
//! date commits or nothing does.
//!
//! # Example
//!
//! ```rust,no_run
//! use tickerpulse::domain::repositories::SentimentRepository;
//! use tickerpulse::infrastructure::persistence::database::Database;
//! use tickerpulse::infrastructure::persistence::repositories::SqliteSentimentRepository;
//!
//! # async {
//! let db = Database::in_memory().await?;
//! let repo = SqliteSentimentRepository::new(db.pool.clone());
//! // repo.commit_daily_batch(date, &scored_posts).await?;
//! # anyhow::Ok(())
//! # };
//! ```

use crate::domain::post::ScoredPost;
use crate::domain::rollup::DailyTickerSummary;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

/// What one committed batch wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollupReport {
    pub date: NaiveDate,
    /// Posts written for the first time.
    pub posts_inserted: usize,
    /// Posts that already existed for the date and were refreshed in place.
    pub posts_refreshed: usize,
    /// Earlier copies of a url repeated within the batch; the last copy wins.
    pub duplicates_skipped: usize,
    pub mentions_inserted: usize,
    /// Mentions a refreshed post no longer carries.
    pub mentions_removed: usize,
    pub tickers_summarized: usize,
}

impl RollupReport {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            posts_inserted: 0,
            posts_refreshed: 0,
            duplicates_skipped: 0,
            mentions_inserted: 0,
            mentions_removed: 0,
            tickers_summarized: 0,
        }
    }
}

/// Storage for raw scored posts, ticker mentions and daily summaries
#[async_trait]
pub trait SentimentRepository: Send + Sync {
    /// Persist a batch for `date` and rebuild the date's summaries atomically
    async fn commit_daily_batch(
        &self,
        date: NaiveDate,
        posts: &[ScoredPost],
    ) -> Result<RollupReport>;

    /// All summary rows for a date, ordered by ticker
    async fn summaries_for_date(&self, date: NaiveDate) -> Result<Vec<DailyTickerSummary>>;

    /// Most recent `days` summaries for a ticker, newest first
    async fn ticker_history(&self, ticker: &str, days: usize) -> Result<Vec<DailyTickerSummary>>;

    /// Number of ticker mention rows stored for a date
    async fn mention_count(&self, date: NaiveDate) -> Result<usize>;

    /// Number of raw post rows stored for a date
    async fn post_count(&self, date: NaiveDate) -> Result<usize>;
}
