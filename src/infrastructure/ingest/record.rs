//! Raw input records and their normalisation into [`Post`].
//!
//! Every loosely-typed field is resolved here, once. Nothing downstream
//! ever sees a field that might be a list or might be a string.

use super::literal::parse_list_literal;
use crate::domain::post::Post;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// A field that may arrive as a list, a single string, or not at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ListField {
    List(Vec<String>),
    Single(String),
    #[default]
    Absent,
}

impl ListField {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::List(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            Value::String(text) => Self::from_text(text),
            _ => Self::Absent,
        }
    }

    /// Resolve serialized text. A parseable list literal becomes `List`,
    /// blank text an empty `List`, anything else a `Single` item.
    pub fn from_text(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::List(Vec::new());
        }
        match parse_list_literal(text) {
            Some(items) => Self::List(items),
            None => Self::Single(text.to_string()),
        }
    }

    pub fn into_items(self) -> Vec<String> {
        match self {
            Self::List(items) => items,
            Self::Single(item) => vec![item],
            Self::Absent => Vec::new(),
        }
    }
}

/// A post as found in JSON input. Unknown or mistyped fields are tolerated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPost {
    pub subreddit: Value,
    #[serde(alias = "title")]
    pub post_title: Value,
    #[serde(alias = "body")]
    pub post_content: Value,
    #[serde(alias = "author")]
    pub post_author: Value,
    #[serde(alias = "score")]
    pub post_score: Value,
    pub comments: Value,
    #[serde(alias = "tickers")]
    pub mentioned_tickers: Value,
    pub created: Value,
    pub url: Value,
}

/// A post as found in CSV input; every column is plain text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CsvPostRecord {
    pub subreddit: Option<String>,
    pub post_title: Option<String>,
    pub post_content: Option<String>,
    pub post_author: Option<String>,
    pub post_score: Option<String>,
    pub comments: Option<String>,
    pub mentioned_tickers: Option<String>,
    pub created: Option<String>,
    pub url: Option<String>,
}

impl From<CsvPostRecord> for RawPost {
    fn from(record: CsvPostRecord) -> Self {
        let text = |field: Option<String>| field.map(Value::String).unwrap_or(Value::Null);
        Self {
            subreddit: text(record.subreddit),
            post_title: text(record.post_title),
            post_content: text(record.post_content),
            post_author: text(record.post_author),
            post_score: text(record.post_score),
            comments: text(record.comments),
            mentioned_tickers: text(record.mentioned_tickers),
            created: text(record.created),
            url: text(record.url),
        }
    }
}

impl RawPost {
    pub fn into_post(self) -> Post {
        let mentioned_tickers: BTreeSet<String> = ListField::from_value(&self.mentioned_tickers)
            .into_items()
            .into_iter()
            .map(|ticker| ticker.trim().to_string())
            .filter(|ticker| !ticker.is_empty())
            .collect();

        Post {
            subreddit: text_or_empty(&self.subreddit),
            title: text_or_empty(&self.post_title),
            body: text_or_empty(&self.post_content),
            author: text_or_empty(&self.post_author),
            raw_score: integer_or_zero(&self.post_score),
            comments: ListField::from_value(&self.comments).into_items(),
            mentioned_tickers,
            created: timestamp(&self.created),
            url: self
                .url
                .as_str()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
        }
    }
}

fn text_or_empty(value: &Value) -> String {
    value.as_str().unwrap_or_default().to_string()
}

fn integer_or_zero(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<f64>().map(|f| f as i64).unwrap_or(0),
        _ => 0,
    }
}

fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        Value::String(s) => {
            let s = s.trim();
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
                        .iter()
                        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                        .map(|naive| naive.and_utc())
                })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_field_variants() {
        assert_eq!(
            ListField::from_value(&json!(["a", 1, "b"])),
            ListField::List(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(
            ListField::from_value(&json!("['x', 'y']")),
            ListField::List(vec!["x".to_string(), "y".to_string()])
        );
        assert_eq!(
            ListField::from_value(&json!("just one comment")),
            ListField::Single("just one comment".to_string())
        );
        assert_eq!(ListField::from_value(&json!(null)), ListField::Absent);
        assert_eq!(ListField::from_value(&json!(17)), ListField::Absent);
    }

    #[test]
    fn test_blank_and_empty_list_text_yield_no_items() {
        assert!(ListField::from_text("").into_items().is_empty());
        assert!(ListField::from_text("[]").into_items().is_empty());
    }

    #[test]
    fn test_json_dumped_comments_with_escaped_emoji() {
        let items = ListField::from_text(r#"["to the moon \ud83d\ude80", "second"]"#).into_items();
        assert_eq!(items, vec!["to the moon 🚀", "second"]);
    }

    #[test]
    fn test_unparseable_list_becomes_single_item() {
        let items = ListField::from_text("['broken").into_items();
        assert_eq!(items, vec!["['broken"]);
    }

    #[test]
    fn test_malformed_fields_become_empty() {
        let raw: RawPost = serde_json::from_value(json!({
            "post_title": 42,
            "post_content": null,
            "comments": "Nice call on this one",
            "mentioned_tickers": "GME",
        }))
        .unwrap();

        let post = raw.into_post();
        assert_eq!(post.title, "");
        assert_eq!(post.body, "");
        assert_eq!(post.subreddit, "");
        assert_eq!(post.comments, vec!["Nice call on this one"]);
        assert_eq!(post.mentioned_tickers.len(), 1);
        assert!(post.mentioned_tickers.contains("GME"));
        assert_eq!(post.url, None);
    }

    #[test]
    fn test_tickers_are_deduplicated_and_trimmed() {
        let raw: RawPost = serde_json::from_value(json!({
            "title": "t",
            "tickers": ["TSLA", " TSLA ", "", "AAPL"],
        }))
        .unwrap();

        let tickers: Vec<String> = raw.into_post().mentioned_tickers.into_iter().collect();
        assert_eq!(tickers, vec!["AAPL", "TSLA"]);
    }

    #[test]
    fn test_scores_and_timestamps() {
        assert_eq!(integer_or_zero(&json!(15)), 15);
        assert_eq!(integer_or_zero(&json!(15.9)), 15);
        assert_eq!(integer_or_zero(&json!("120.0")), 120);
        assert_eq!(integer_or_zero(&json!("n/a")), 0);

        let parsed = timestamp(&json!("2024-01-01 09:30:00")).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-01-01T09:30:00+00:00");
        assert!(timestamp(&json!("2024-01-01T09:30:00Z")).is_some());
        assert!(timestamp(&json!(1704101400)).is_some());
        assert!(timestamp(&json!("yesterday")).is_none());
    }

    #[test]
    fn test_csv_record_conversion() {
        let record = CsvPostRecord {
            subreddit: Some("stocks".to_string()),
            post_title: Some("Buy the dip".to_string()),
            comments: Some("['Agreed', 'No way']".to_string()),
            mentioned_tickers: Some("['NVDA']".to_string()),
            url: Some("https://reddit.com/r/stocks/1".to_string()),
            ..Default::default()
        };

        let post = RawPost::from(record).into_post();
        assert_eq!(post.subreddit, "stocks");
        assert_eq!(post.comments, vec!["Agreed", "No way"]);
        assert!(post.mentioned_tickers.contains("NVDA"));
        assert_eq!(post.url.as_deref(), Some("https://reddit.com/r/stocks/1"));
    }
}
