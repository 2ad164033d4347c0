//! Per-(date, ticker) aggregation.
//!
//! The computation is pure: it takes every mention joined with its post
//! for one date and returns the complete summary set for that date.
//! Persistence replaces the date's rows wholesale with this output.

use crate::domain::scoring::round_to;
use crate::domain::sentiment::SentimentLabel;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One ticker mention joined with the scores of the post it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct MentionRecord {
    pub ticker: String,
    pub subreddit: String,
    pub overall_sentiment: SentimentLabel,
    pub post_score: f64,
    pub comment_score: f64,
    pub overall_score: f64,
    pub num_comments_analyzed: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTickerSummary {
    pub date: NaiveDate,
    pub ticker: String,
    pub mention_count: i64,
    pub total_posts: i64,
    pub total_comments: i64,
    pub avg_post_score: f64,
    pub avg_comment_score: f64,
    pub avg_overall_score: f64,
    pub sentiment_positive: i64,
    pub sentiment_negative: i64,
    pub sentiment_neutral: i64,
    pub subreddit_breakdown: BTreeMap<String, i64>,
}

impl DailyTickerSummary {
    /// JSON object of subreddit counts with keys in sorted order.
    pub fn subreddit_breakdown_json(&self) -> String {
        serde_json::to_string(&self.subreddit_breakdown).unwrap_or_else(|_| "{}".to_string())
    }
}

#[derive(Default)]
struct TickerAccumulator {
    mentions: i64,
    comments: i64,
    post_score_sum: f64,
    comment_score_sum: f64,
    overall_score_sum: f64,
    positive: i64,
    negative: i64,
    neutral: i64,
    subreddits: BTreeMap<String, i64>,
}

impl TickerAccumulator {
    fn add(&mut self, record: &MentionRecord) {
        self.mentions += 1;
        self.comments += record.num_comments_analyzed;
        self.post_score_sum += record.post_score;
        self.comment_score_sum += record.comment_score;
        self.overall_score_sum += record.overall_score;
        match record.overall_sentiment {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
        *self.subreddits.entry(record.subreddit.clone()).or_insert(0) += 1;
    }

    fn finish(self, date: NaiveDate, ticker: String) -> DailyTickerSummary {
        let n = self.mentions as f64;
        DailyTickerSummary {
            date,
            ticker,
            mention_count: self.mentions,
            total_posts: self.mentions,
            total_comments: self.comments,
            avg_post_score: round_to(self.post_score_sum / n, 2),
            avg_comment_score: round_to(self.comment_score_sum / n, 2),
            avg_overall_score: round_to(self.overall_score_sum / n, 2),
            sentiment_positive: self.positive,
            sentiment_negative: self.negative,
            sentiment_neutral: self.neutral,
            subreddit_breakdown: self.subreddits,
        }
    }
}

/// Aggregate all mentions of one date into summary rows, one per distinct
/// ticker, ordered by ticker. An empty input yields no rows.
pub fn summarize(date: NaiveDate, mentions: &[MentionRecord]) -> Vec<DailyTickerSummary> {
    let mut by_ticker: BTreeMap<&str, TickerAccumulator> = BTreeMap::new();
    for record in mentions {
        by_ticker.entry(record.ticker.as_str()).or_default().add(record);
    }

    by_ticker
        .into_iter()
        .map(|(ticker, acc)| acc.finish(date, ticker.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention(
        ticker: &str,
        subreddit: &str,
        sentiment: SentimentLabel,
        overall_score: f64,
        comments: i64,
    ) -> MentionRecord {
        MentionRecord {
            ticker: ticker.to_string(),
            subreddit: subreddit.to_string(),
            overall_sentiment: sentiment,
            post_score: 60.0,
            comment_score: 40.0,
            overall_score,
            num_comments_analyzed: comments,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_empty_mentions_emit_nothing() {
        assert!(summarize(date(), &[]).is_empty());
    }

    #[test]
    fn test_groups_by_ticker() {
        let mentions = vec![
            mention("TSLA", "stocks", SentimentLabel::Positive, 70.0, 3),
            mention("AAPL", "investing", SentimentLabel::Negative, 30.0, 1),
            mention("TSLA", "wallstreetbets", SentimentLabel::Neutral, 50.0, 2),
            mention("TSLA", "stocks", SentimentLabel::Positive, 80.0, 0),
        ];

        let rows = summarize(date(), &mentions);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ticker, "AAPL");
        assert_eq!(rows[1].ticker, "TSLA");

        let tsla = &rows[1];
        assert_eq!(tsla.mention_count, 3);
        assert_eq!(tsla.total_posts, 3);
        assert_eq!(tsla.total_comments, 5);
        assert_eq!(tsla.avg_overall_score, 66.67);
        assert_eq!(tsla.avg_post_score, 60.0);
        assert_eq!(tsla.sentiment_positive, 2);
        assert_eq!(tsla.sentiment_neutral, 1);
        assert_eq!(tsla.sentiment_negative, 0);
        assert_eq!(tsla.subreddit_breakdown.get("stocks"), Some(&2));
        assert_eq!(tsla.subreddit_breakdown.get("wallstreetbets"), Some(&1));
    }

    #[test]
    fn test_mention_counts_are_complete() {
        let mentions = vec![
            mention("A", "s1", SentimentLabel::Neutral, 50.0, 0),
            mention("B", "s1", SentimentLabel::Neutral, 50.0, 0),
            mention("A", "s2", SentimentLabel::Negative, 10.0, 0),
        ];
        let rows = summarize(date(), &mentions);
        let total: i64 = rows.iter().map(|r| r.mention_count).sum();
        assert_eq!(total, mentions.len() as i64);

        for row in &rows {
            assert_eq!(
                row.sentiment_positive + row.sentiment_negative + row.sentiment_neutral,
                row.mention_count
            );
        }
    }

    #[test]
    fn test_summarize_is_deterministic() {
        let mentions = vec![
            mention("X", "b", SentimentLabel::Positive, 51.0, 1),
            mention("X", "a", SentimentLabel::Positive, 52.0, 1),
        ];
        let first = summarize(date(), &mentions);
        let second = summarize(date(), &mentions);
        assert_eq!(first, second);
        assert_eq!(first[0].subreddit_breakdown_json(), r#"{"a":1,"b":1}"#);
    }
}
