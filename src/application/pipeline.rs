//! Batch entry point: score posts, then commit them and the day's rollup.

use crate::application::aggregator::PostAggregator;
use crate::domain::post::Post;
use crate::domain::repositories::{RollupReport, SentimentRepository};
use crate::infrastructure::ingest::parse_batch_date;
use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

pub struct SentimentPipeline {
    aggregator: PostAggregator,
    repository: Arc<dyn SentimentRepository>,
}

impl SentimentPipeline {
    pub fn new(aggregator: PostAggregator, repository: Arc<dyn SentimentRepository>) -> Self {
        Self {
            aggregator,
            repository,
        }
    }

    pub fn aggregator(&self) -> &PostAggregator {
        &self.aggregator
    }

    pub fn repository(&self) -> Arc<dyn SentimentRepository> {
        self.repository.clone()
    }

    /// Score every post and commit the batch for `date`. Nothing is written
    /// if any persistence step fails.
    pub async fn score_and_aggregate(&self, posts: &[Post], date: NaiveDate) -> Result<RollupReport> {
        let started = Instant::now();
        info!("Scoring {} posts for {}", posts.len(), date);

        let scored = self.aggregator.score_batch(posts);
        let report = self.repository.commit_daily_batch(date, &scored).await?;

        info!(
            "Batch {} committed in {:?}: {} new posts, {} refreshed, {} mentions, {} tickers",
            date,
            started.elapsed(),
            report.posts_inserted,
            report.posts_refreshed,
            report.mentions_inserted,
            report.tickers_summarized
        );
        Ok(report)
    }

    /// Same as [`Self::score_and_aggregate`] with a `YYYY-MM-DD` date string.
    pub async fn score_and_aggregate_on(&self, posts: &[Post], date: &str) -> Result<RollupReport> {
        let date = parse_batch_date(date)?;
        self.score_and_aggregate(posts, date).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lexicon::LexiconStore;
    use crate::domain::scoring::HybridScorer;
    use crate::domain::sentiment::PolarityScorer;
    use crate::infrastructure::persistence::database::Database;
    use crate::infrastructure::persistence::repositories::SqliteSentimentRepository;
    use std::collections::BTreeSet;

    struct KeywordPolarity;

    impl PolarityScorer for KeywordPolarity {
        fn compound(&self, text: &str) -> f64 {
            if text.contains("great") {
                0.8
            } else if text.contains("awful") {
                -0.8
            } else {
                0.0
            }
        }
    }

    async fn pipeline() -> SentimentPipeline {
        let db = Database::in_memory().await.unwrap();
        let scorer = HybridScorer::new(
            Arc::new(LexiconStore::financial_only()),
            Arc::new(KeywordPolarity),
        );
        SentimentPipeline::new(
            PostAggregator::new(scorer),
            Arc::new(SqliteSentimentRepository::new(db.pool.clone())),
        )
    }

    fn post(url: &str, title: &str, tickers: &[&str]) -> Post {
        Post {
            subreddit: "stocks".to_string(),
            title: title.to_string(),
            url: Some(url.to_string()),
            mentioned_tickers: tickers.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_score_and_aggregate_commits_summaries() {
        let pipeline = pipeline().await;
        let posts = vec![
            post("https://r/1", "great quarter", &["AAPL", "MSFT"]),
            post("https://r/2", "awful guidance", &["AAPL"]),
        ];

        let report = pipeline
            .score_and_aggregate_on(&posts, "2024-03-01")
            .await
            .unwrap();

        assert_eq!(report.posts_inserted, 2);
        assert_eq!(report.mentions_inserted, 3);
        assert_eq!(report.tickers_summarized, 2);

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let rows = pipeline.repository().summaries_for_date(date).await.unwrap();
        let aapl = rows.iter().find(|r| r.ticker == "AAPL").unwrap();
        assert_eq!(aapl.mention_count, 2);
        assert_eq!(aapl.sentiment_positive, 1);
        assert_eq!(aapl.sentiment_negative, 1);
    }

    #[tokio::test]
    async fn test_invalid_date_string_is_rejected() {
        let pipeline = pipeline().await;
        let result = pipeline.score_and_aggregate_on(&[], "March 1st").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_empty_batch_commits_nothing() {
        let pipeline = pipeline().await;
        let date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let report = pipeline.score_and_aggregate(&[], date).await.unwrap();

        assert_eq!(report.posts_inserted, 0);
        assert_eq!(report.tickers_summarized, 0);
        assert_eq!(pipeline.repository().post_count(date).await.unwrap(), 0);
    }
}
