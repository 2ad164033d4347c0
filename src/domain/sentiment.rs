use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Compound values at or above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound values at or below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Neutral => write!(f, "neutral"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

impl FromStr for SentimentLabel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            _ => anyhow::bail!(
                "Invalid sentiment label: {}. Must be 'positive', 'neutral' or 'negative'",
                s
            ),
        }
    }
}

impl SentimentLabel {
    /// Tri-state classification of a compound value in [-1, 1].
    pub fn classify(compound: f64) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            Self::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

/// Presentational rescale of a compound in [-1, 1] onto 0-100.
/// Never classify on the rescaled value.
pub fn compound_to_score(compound: f64) -> f64 {
    (compound + 1.0) / 2.0 * 100.0
}

/// Inverse of [`compound_to_score`].
pub fn score_to_compound(score: f64) -> f64 {
    score / 100.0 * 2.0 - 1.0
}

/// Result of running the hybrid scorer over one piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredText {
    /// Lexicon average mapped onto 0-100 (50.0 when nothing matched).
    pub lexicon_score: f64,
    pub polarity_compound: f64,
    pub blended_compound: f64,
    pub label: SentimentLabel,
}

/// General-purpose sentence polarity collaborator.
///
/// Implementations must return a compound in [-1, 1] and 0.0 for empty text.
pub trait PolarityScorer: Send + Sync {
    fn compound(&self, text: &str) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundaries_are_inclusive() {
        assert_eq!(SentimentLabel::classify(0.05), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::classify(-0.05), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::classify(0.03), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::classify(0.0), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::classify(-0.049), SentimentLabel::Neutral);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(SentimentLabel::classify(1.0), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::classify(-1.0), SentimentLabel::Negative);
    }

    #[test]
    fn test_rescale_bounds_and_inverse() {
        assert_eq!(compound_to_score(-1.0), 0.0);
        assert_eq!(compound_to_score(0.0), 50.0);
        assert_eq!(compound_to_score(1.0), 100.0);

        let mut previous = f64::NEG_INFINITY;
        for step in 0..=200 {
            let compound = -1.0 + step as f64 * 0.01;
            let score = compound_to_score(compound);
            assert!((0.0..=100.0).contains(&score), "{} out of range", score);
            assert!(score > previous, "rescale must be strictly increasing");
            assert!((score_to_compound(score) - compound).abs() < 1e-12);
            previous = score;
        }
    }

    #[test]
    fn test_label_round_trip_through_strings() {
        for label in [
            SentimentLabel::Positive,
            SentimentLabel::Neutral,
            SentimentLabel::Negative,
        ] {
            assert_eq!(label.to_string().parse::<SentimentLabel>().unwrap(), label);
        }
        assert!("bullish".parse::<SentimentLabel>().is_err());
    }
}
