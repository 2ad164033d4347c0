use thiserror::Error;

/// Errors raised while building the lexicon store
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("Lexicon weight for '{token}' out of range: {weight} not in [-1, 1]")]
    WeightOutOfRange { token: String, weight: f64 },

    #[error("Lexicon contains an empty token")]
    EmptyToken,

    #[error("Invalid lexicon overrides: {reason}")]
    InvalidOverrides { reason: String },
}

/// Errors at the ingestion boundary. Malformed fields inside a post are
/// never errors; only unusable files and dates are.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Invalid batch date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("No batch date found in file name: {file}")]
    MissingDate { file: String },

    #[error("Unsupported input format: {path}")]
    UnsupportedFormat { path: String },
}

/// Errors raised by the daily rollup
#[derive(Debug, Error)]
pub enum RollupError {
    #[error("Summary for {ticker} on {date} computed twice")]
    DuplicateSummary { date: String, ticker: String },
}
