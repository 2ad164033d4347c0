//! Lexicon and hybrid scoring.
//!
//! The hybrid compound is a fixed blend: 70% general polarity, 30% the
//! lexicon average re-centred onto [-1, 1].

use crate::domain::lexicon::LexiconStore;
use crate::domain::sentiment::{PolarityScorer, ScoredText, SentimentLabel};
use crate::domain::text::{clean_and_tokenize, lexicon_terms};
use serde::Serialize;
use std::sync::Arc;

pub const POLARITY_WEIGHT: f64 = 0.7;
pub const LEXICON_WEIGHT: f64 = 0.3;

/// Lexicon score returned when no word matched.
pub const NEUTRAL_LEXICON_SCORE: f64 = 50.0;

/// Average matched lexicon weight mapped onto 0-100, rounded to one
/// decimal. Returns exactly 50.0 when no term matches.
pub fn lexicon_score(lexicon: &LexiconStore, text: &str) -> f64 {
    let (sum, count) = lexicon_terms(text)
        .filter_map(|term| lexicon.weight(&term))
        .fold((0.0, 0usize), |(sum, count), weight| (sum + weight, count + 1));

    if count == 0 {
        return NEUTRAL_LEXICON_SCORE;
    }

    let average = sum / count as f64;
    round_to(((average + 1.0) / 2.0) * 100.0, 1)
}

/// Terms of `text` that hit the lexicon, with their weights.
pub fn matched_terms(lexicon: &LexiconStore, text: &str) -> Vec<(String, f64)> {
    lexicon_terms(text)
        .filter_map(|term| lexicon.weight(&term).map(|weight| (term, weight)))
        .collect()
}

/// Round to `decimals` places from the exact binary value, ties to even.
///
/// `0.15` is stored as 0.1499.. and so rounds to `0.1`, while an exact tie
/// such as `0.25` goes to the even digit.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

/// Blend a polarity compound with a 0-100 lexicon score.
pub fn blend(polarity_compound: f64, lexicon_score: f64) -> f64 {
    polarity_compound * POLARITY_WEIGHT
        + ((lexicon_score - NEUTRAL_LEXICON_SCORE) / NEUTRAL_LEXICON_SCORE) * LEXICON_WEIGHT
}

/// Full scoring detail for one text.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub scored: ScoredText,
    pub tokens: Vec<String>,
    pub matched_terms: Vec<(String, f64)>,
}

/// Combines the lexicon scorer with a polarity collaborator.
#[derive(Clone)]
pub struct HybridScorer {
    lexicon: Arc<LexiconStore>,
    polarity: Arc<dyn PolarityScorer>,
}

impl HybridScorer {
    pub fn new(lexicon: Arc<LexiconStore>, polarity: Arc<dyn PolarityScorer>) -> Self {
        Self { lexicon, polarity }
    }

    pub fn lexicon(&self) -> &LexiconStore {
        &self.lexicon
    }

    pub fn score(&self, text: &str) -> ScoredText {
        let polarity_compound = self.polarity.compound(text).clamp(-1.0, 1.0);
        let lexicon_score = lexicon_score(&self.lexicon, text);
        let blended_compound = blend(polarity_compound, lexicon_score);

        ScoredText {
            lexicon_score,
            polarity_compound,
            blended_compound,
            label: SentimentLabel::classify(blended_compound),
        }
    }

    pub fn explain(&self, text: &str) -> ScoreBreakdown {
        ScoreBreakdown {
            scored: self.score(text),
            tokens: clean_and_tokenize(text),
            matched_terms: matched_terms(&self.lexicon, text),
        }
    }
}

impl std::fmt::Debug for HybridScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridScorer")
            .field("lexicon_entries", &self.lexicon.len())
            .finish()
    }
}
