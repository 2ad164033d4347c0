use super::record::{CsvPostRecord, RawPost};
use crate::domain::errors::IngestError;
use crate::domain::post::Post;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{info, warn};

static FILE_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4})-?(\d{2})-?(\d{2})").expect("valid file date regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
    JsonLines,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "jsonl" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Load and normalise every post in a CSV, JSON array or JSON Lines file.
pub fn load_posts(path: &Path) -> Result<Vec<Post>> {
    let format = InputFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.display().to_string(),
    })?;

    let raw = match format {
        InputFormat::Csv => read_csv(path)?,
        InputFormat::Json => read_json(path)?,
        InputFormat::JsonLines => read_json_lines(path)?,
    };

    let posts: Vec<Post> = raw.into_iter().map(RawPost::into_post).collect();
    info!("Loaded {} posts from {}", posts.len(), path.display());
    Ok(posts)
}

fn read_csv(path: &Path) -> Result<Vec<RawPost>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file {}", path.display()))?;

    let mut posts = Vec::new();
    for (index, record) in reader.deserialize::<CsvPostRecord>().enumerate() {
        match record {
            Ok(record) => posts.push(record.into()),
            Err(e) => warn!("Skipping unreadable CSV row {} in {}: {}", index + 1, path.display(), e),
        }
    }
    Ok(posts)
}

fn read_json(path: &Path) -> Result<Vec<RawPost>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse JSON array in {}", path.display()))
}

fn read_json_lines(path: &Path) -> Result<Vec<RawPost>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON Lines file {}", path.display()))?;

    let mut posts = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<RawPost>(line) {
            Ok(post) => posts.push(post),
            Err(e) => warn!("Skipping unreadable line {} in {}: {}", index + 1, path.display(), e),
        }
    }
    Ok(posts)
}

/// Parse a `YYYY-MM-DD` batch date.
pub fn parse_batch_date(value: &str) -> Result<NaiveDate, IngestError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| IngestError::InvalidDate {
        value: value.to_string(),
    })
}

/// Find the batch date in a file name such as
/// `reddit_analysis_complete_20240101_0930.csv` or `posts-2024-01-01.json`.
pub fn batch_date_from_file_name(path: &Path) -> Result<NaiveDate, IngestError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    FILE_DATE_RE
        .captures_iter(name)
        .find_map(|caps| {
            let year = caps[1].parse().ok()?;
            let month = caps[2].parse().ok()?;
            let day = caps[3].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        })
        .ok_or_else(|| IngestError::MissingDate {
            file: name.to_string(),
        })
}

/// Every supported, dated input file in `dir`, ordered by date then name.
/// Files without a date or with an unknown extension are skipped.
pub fn dated_input_files(dir: &Path) -> Result<Vec<(NaiveDate, PathBuf)>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || InputFormat::from_path(&path).is_none() {
            continue;
        }
        match batch_date_from_file_name(&path) {
            Ok(date) => files.push((date, path)),
            Err(e) => warn!("{}. Skipping.", e),
        }
    }

    files.sort();
    Ok(files)
}
