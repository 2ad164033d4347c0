use crate::domain::errors::RollupError;
use crate::domain::post::ScoredPost;
use crate::domain::repositories::{RollupReport, SentimentRepository};
use crate::domain::rollup::{DailyTickerSummary, MentionRecord, summarize};
use crate::domain::sentiment::SentimentLabel;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use tracing::{debug, info, warn};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteSentimentRepository {
    pool: SqlitePool,
}

impl SqliteSentimentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Upsert one raw post and return its row id. An existing (date, url)
    /// row keeps its id and has its fields refreshed.
    async fn upsert_post(
        tx: &mut Transaction<'_, Sqlite>,
        date: &str,
        scored: &ScoredPost,
    ) -> Result<(i64, bool)> {
        let post = &scored.post;
        let s = &scored.sentiment;
        let url = post_url(scored);

        let existing: Option<i64> = match url {
            Some(url) => {
                sqlx::query_scalar("SELECT id FROM posts_raw WHERE date = ? AND url = ?")
                    .bind(date)
                    .bind(url)
                    .fetch_optional(&mut **tx)
                    .await
                    .context("Failed to look up existing post")?
            }
            None => None,
        };

        let comment_scores = serde_json::to_string(&s.comment_scores)?;
        let created = post.created.map(|c| c.to_rfc3339());

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO posts_raw
            (date, subreddit, post_title, post_content, post_author, reddit_score,
             num_comments, post_sentiment, post_score, post_word_score, comment_sentiment,
             comment_score, comment_scores, overall_sentiment, overall_score,
             num_comments_analyzed, url, created)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(date, url) DO UPDATE SET
                subreddit = excluded.subreddit,
                post_title = excluded.post_title,
                post_content = excluded.post_content,
                post_author = excluded.post_author,
                reddit_score = excluded.reddit_score,
                num_comments = excluded.num_comments,
                post_sentiment = excluded.post_sentiment,
                post_score = excluded.post_score,
                post_word_score = excluded.post_word_score,
                comment_sentiment = excluded.comment_sentiment,
                comment_score = excluded.comment_score,
                comment_scores = excluded.comment_scores,
                overall_sentiment = excluded.overall_sentiment,
                overall_score = excluded.overall_score,
                num_comments_analyzed = excluded.num_comments_analyzed,
                created = excluded.created
            RETURNING id
            "#,
        )
        .bind(date)
        .bind(&post.subreddit)
        .bind(&post.title)
        .bind(&post.body)
        .bind(&post.author)
        .bind(post.raw_score)
        .bind(post.comments.len() as i64)
        .bind(s.post_sentiment.to_string())
        .bind(s.post_score)
        .bind(s.post_word_score)
        .bind(s.comment_sentiment.to_string())
        .bind(s.comment_score)
        .bind(comment_scores)
        .bind(s.overall_sentiment.to_string())
        .bind(s.overall_score)
        .bind(s.num_comments_analyzed as i64)
        .bind(url)
        .bind(created)
        .fetch_one(&mut **tx)
        .await
        .context("Failed to save raw post")?;

        Ok((id, existing.is_some()))
    }

    async fn insert_mentions(
        tx: &mut Transaction<'_, Sqlite>,
        date: &str,
        post_id: i64,
        scored: &ScoredPost,
    ) -> Result<usize> {
        let mut inserted = 0;
        for ticker in &scored.post.mentioned_tickers {
            let result = sqlx::query(
                r#"
                INSERT INTO stock_mentions (post_id, ticker, date)
                VALUES (?, ?, ?)
                ON CONFLICT(post_id, ticker) DO NOTHING
                "#,
            )
            .bind(post_id)
            .bind(ticker)
            .bind(date)
            .execute(&mut **tx)
            .await
            .with_context(|| format!("Failed to save mention of {} for post {}", ticker, post_id))?;
            inserted += result.rows_affected() as usize;
        }
        Ok(inserted)
    }

    /// Drop mention rows of a refreshed post whose ticker is no longer in
    /// its ticker set.
    async fn prune_stale_mentions(
        tx: &mut Transaction<'_, Sqlite>,
        post_id: i64,
        scored: &ScoredPost,
    ) -> Result<usize> {
        let stored: Vec<String> =
            sqlx::query_scalar("SELECT ticker FROM stock_mentions WHERE post_id = ?")
                .bind(post_id)
                .fetch_all(&mut **tx)
                .await
                .context("Failed to load stored mentions")?;

        let mut removed = 0;
        for ticker in stored
            .iter()
            .filter(|t| !scored.post.mentioned_tickers.contains(t.as_str()))
        {
            let result = sqlx::query("DELETE FROM stock_mentions WHERE post_id = ? AND ticker = ?")
                .bind(post_id)
                .bind(ticker)
                .execute(&mut **tx)
                .await
                .with_context(|| format!("Failed to remove mention of {} for post {}", ticker, post_id))?;
            removed += result.rows_affected() as usize;
        }
        Ok(removed)
    }

    /// Delete-then-insert the summaries of one date from the mention rows
    /// visible inside `tx`.
    async fn rebuild_summaries(
        tx: &mut Transaction<'_, Sqlite>,
        date: NaiveDate,
    ) -> Result<usize> {
        let date_str = date.format(DATE_FORMAT).to_string();

        sqlx::query("DELETE FROM daily_ticker_summary WHERE date = ?")
            .bind(&date_str)
            .execute(&mut **tx)
            .await
            .context("Failed to clear daily summary")?;

        let rows = sqlx::query(
            r#"
            SELECT sm.ticker, pr.subreddit, pr.overall_sentiment, pr.post_score,
                   pr.comment_score, pr.overall_score, pr.num_comments_analyzed
            FROM stock_mentions sm
            JOIN posts_raw pr ON sm.post_id = pr.id
            WHERE sm.date = ?
            ORDER BY sm.id
            "#,
        )
        .bind(&date_str)
        .fetch_all(&mut **tx)
        .await
        .context("Failed to load mentions for rollup")?;

        let mentions = rows
            .iter()
            .map(map_mention)
            .collect::<Result<Vec<_>>>()?;

        let summaries = summarize(date, &mentions);
        for summary in &summaries {
            let result = sqlx::query(
                r#"
                INSERT INTO daily_ticker_summary
                (date, ticker, mention_count, total_posts, total_comments,
                 avg_post_score, avg_comment_score, avg_overall_score,
                 sentiment_positive, sentiment_negative, sentiment_neutral,
                 subreddit_breakdown)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&date_str)
            .bind(&summary.ticker)
            .bind(summary.mention_count)
            .bind(summary.total_posts)
            .bind(summary.total_comments)
            .bind(summary.avg_post_score)
            .bind(summary.avg_comment_score)
            .bind(summary.avg_overall_score)
            .bind(summary.sentiment_positive)
            .bind(summary.sentiment_negative)
            .bind(summary.sentiment_neutral)
            .bind(summary.subreddit_breakdown_json())
            .execute(&mut **tx)
            .await;

            if let Err(e) = result {
                if let Some(db_err) = e.as_database_error()
                    && db_err.is_unique_violation()
                {
                    return Err(RollupError::DuplicateSummary {
                        date: date_str.clone(),
                        ticker: summary.ticker.clone(),
                    }
                    .into());
                }
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to save summary for {}", summary.ticker)));
            }
        }

        Ok(summaries.len())
    }

    fn map_rows_to_summaries(&self, rows: Vec<SqliteRow>) -> Result<Vec<DailyTickerSummary>> {
        rows.iter().map(map_summary).collect()
    }
}

#[async_trait]
impl SentimentRepository for SqliteSentimentRepository {
    async fn commit_daily_batch(
        &self,
        date: NaiveDate,
        posts: &[ScoredPost],
    ) -> Result<RollupReport> {
        let date_str = date.format(DATE_FORMAT).to_string();
        let mut report = RollupReport::new(date);
        let (posts, duplicates) = last_copy_per_url(posts);
        report.duplicates_skipped = duplicates;
        if duplicates > 0 {
            warn!("{} repeated urls in batch for {}; keeping the last copy", duplicates, date_str);
        }

        // Dropping `tx` on any early return rolls the whole date back.
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin rollup transaction")?;

        for scored in posts {
            let (post_id, refreshed) = Self::upsert_post(&mut tx, &date_str, scored).await?;
            if refreshed {
                report.posts_refreshed += 1;
                report.mentions_removed +=
                    Self::prune_stale_mentions(&mut tx, post_id, scored).await?;
            } else {
                report.posts_inserted += 1;
            }
            report.mentions_inserted +=
                Self::insert_mentions(&mut tx, &date_str, post_id, scored).await?;
            debug!(post_id, tickers = scored.post.mentioned_tickers.len(), "Persisted post");
        }

        report.tickers_summarized = Self::rebuild_summaries(&mut tx, date).await?;

        tx.commit()
            .await
            .context("Failed to commit rollup transaction")?;

        info!(
            "Committed rollup for {}: {} new posts, {} refreshed, {} mentions (+{} -{}), {} tickers",
            date_str,
            report.posts_inserted,
            report.posts_refreshed,
            report.mentions_inserted + report.mentions_removed,
            report.mentions_inserted,
            report.mentions_removed,
            report.tickers_summarized
        );
        Ok(report)
    }

    async fn summaries_for_date(&self, date: NaiveDate) -> Result<Vec<DailyTickerSummary>> {
        let rows = sqlx::query("SELECT * FROM daily_ticker_summary WHERE date = ? ORDER BY ticker")
            .bind(date.format(DATE_FORMAT).to_string())
            .fetch_all(&self.pool)
            .await
            .context("Failed to load daily summaries")?;
        self.map_rows_to_summaries(rows)
    }

    async fn ticker_history(&self, ticker: &str, days: usize) -> Result<Vec<DailyTickerSummary>> {
        let rows = sqlx::query(
            "SELECT * FROM daily_ticker_summary WHERE ticker = ? ORDER BY date DESC LIMIT ?",
        )
        .bind(ticker)
        .bind(days as i64)
        .fetch_all(&self.pool)
        .await
        .context("Failed to load ticker history")?;
        self.map_rows_to_summaries(rows)
    }

    async fn mention_count(&self, date: NaiveDate) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_mentions WHERE date = ?")
            .bind(date.format(DATE_FORMAT).to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }

    async fn post_count(&self, date: NaiveDate) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts_raw WHERE date = ?")
            .bind(date.format(DATE_FORMAT).to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }
}

/// Keep only the last copy of each url in the batch, in batch order.
/// Posts without a url are always kept. Returns the posts and how many
/// earlier copies were dropped.
fn last_copy_per_url(posts: &[ScoredPost]) -> (Vec<&ScoredPost>, usize) {
    let mut last_index: HashMap<&str, usize> = HashMap::new();
    for (index, scored) in posts.iter().enumerate() {
        if let Some(url) = post_url(scored) {
            last_index.insert(url, index);
        }
    }

    let kept: Vec<&ScoredPost> = posts
        .iter()
        .enumerate()
        .filter(|(index, scored)| post_url(scored).is_none_or(|url| last_index[url] == *index))
        .map(|(_, scored)| scored)
        .collect();
    let skipped = posts.len() - kept.len();
    (kept, skipped)
}

fn post_url(scored: &ScoredPost) -> Option<&str> {
    scored.post.url.as_deref().filter(|u| !u.is_empty())
}

fn map_mention(row: &SqliteRow) -> Result<MentionRecord> {
    let sentiment: String = row.try_get("overall_sentiment")?;
    Ok(MentionRecord {
        ticker: row.try_get("ticker")?,
        subreddit: row.try_get::<Option<String>, _>("subreddit")?.unwrap_or_default(),
        overall_sentiment: SentimentLabel::from_str(&sentiment)?,
        post_score: row.try_get("post_score")?,
        comment_score: row.try_get("comment_score")?,
        overall_score: row.try_get("overall_score")?,
        num_comments_analyzed: row.try_get("num_comments_analyzed")?,
    })
}

fn map_summary(row: &SqliteRow) -> Result<DailyTickerSummary> {
    let date: String = row.try_get("date")?;
    let breakdown: String = row.try_get("subreddit_breakdown")?;
    let subreddit_breakdown: BTreeMap<String, i64> =
        serde_json::from_str(&breakdown).context("Corrupt subreddit_breakdown column")?;

    Ok(DailyTickerSummary {
        date: NaiveDate::parse_from_str(&date, DATE_FORMAT)
            .with_context(|| format!("Corrupt summary date: {}", date))?,
        ticker: row.try_get("ticker")?,
        mention_count: row.try_get("mention_count")?,
        total_posts: row.try_get("total_posts")?,
        total_comments: row.try_get("total_comments")?,
        avg_post_score: row.try_get("avg_post_score")?,
        avg_comment_score: row.try_get("avg_comment_score")?,
        avg_overall_score: row.try_get("avg_overall_score")?,
        sentiment_positive: row.try_get("sentiment_positive")?,
        sentiment_negative: row.try_get("sentiment_negative")?,
        sentiment_neutral: row.try_get("sentiment_neutral")?,
        subreddit_breakdown,
    })
}
