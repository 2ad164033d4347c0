use crate::domain::sentiment::SentimentLabel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A social-media post as it enters scoring. All list-valued fields are
/// already normalised by the ingestion layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub subreddit: String,
    pub title: String,
    pub body: String,
    pub author: String,
    /// Platform vote score, not a sentiment value.
    pub raw_score: i64,
    pub comments: Vec<String>,
    pub mentioned_tickers: BTreeSet<String>,
    pub created: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

impl Post {
    /// Title and body joined by a single space.
    pub fn text(&self) -> String {
        match (self.title.is_empty(), self.body.is_empty()) {
            (false, false) => format!("{} {}", self.title, self.body),
            (false, true) => self.title.clone(),
            (true, false) => self.body.clone(),
            (true, true) => String::new(),
        }
    }
}

/// Sentiment attached to a post by the aggregator.
///
/// `*_compound` values are in [-1, 1]; `*_score` values are the same
/// numbers rescaled to 0-100 for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSentiment {
    pub post_sentiment: SentimentLabel,
    pub post_compound: f64,
    pub post_score: f64,
    pub post_word_score: f64,
    pub comment_sentiment: SentimentLabel,
    pub comment_compound: f64,
    pub comment_score: f64,
    pub comment_scores: Vec<f64>,
    pub overall_sentiment: SentimentLabel,
    pub overall_compound: f64,
    pub overall_score: f64,
    pub num_comments_analyzed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPost {
    pub post: Post,
    pub sentiment: PostSentiment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_joins_title_and_body() {
        let post = Post {
            title: "Title".to_string(),
            body: "Body".to_string(),
            ..Default::default()
        };
        assert_eq!(post.text(), "Title Body");
    }

    #[test]
    fn test_text_with_missing_parts() {
        let title_only = Post {
            title: "Only title".to_string(),
            ..Default::default()
        };
        assert_eq!(title_only.text(), "Only title");

        let body_only = Post {
            body: "Only body".to_string(),
            ..Default::default()
        };
        assert_eq!(body_only.text(), "Only body");

        assert_eq!(Post::default().text(), "");
    }
}
