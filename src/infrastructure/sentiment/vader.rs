//! VADER polarity collaborator
//!
//! Wraps the VADER (Valence Aware Dictionary and sEntiment Reasoner)
//! analyzer from `vader_sentiment` behind [`PolarityScorer`], and exposes
//! VADER's word list as the general-purpose half of the lexicon store.
//!
//! # Example
//! ```rust,ignore
//! use tickerpulse::domain::sentiment::PolarityScorer;
//! use tickerpulse::infrastructure::sentiment::vader::VaderPolarity;
//!
//! let vader = VaderPolarity::new();
//! assert!(vader.compound("What a great quarter!") > 0.0);
//! ```

use crate::domain::sentiment::PolarityScorer;
use vader_sentiment::SentimentIntensityAnalyzer;

/// VADER valences are hand-rated on [-4, 4].
const VADER_VALENCE_MAX: f64 = 4.0;

/// A thread-safe polarity scorer backed by VADER.
pub struct VaderPolarity {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderPolarity {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderPolarity {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for VaderPolarity {
    fn compound(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }

        let scores = self.analyzer.polarity_scores(text);
        scores["compound"].clamp(-1.0, 1.0)
    }
}

/// VADER's lexicon rescaled onto [-1, 1].
///
/// Entries containing non-alphanumeric characters (emoticons and the like)
/// are skipped: the lexicon scorer strips those characters before lookup.
pub fn general_lexicon() -> Vec<(String, f64)> {
    vader_sentiment::LEXICON
        .iter()
        .filter_map(|(word, valence)| {
            let word = word.to_string().to_lowercase();
            if word.is_empty() || !word.chars().all(char::is_alphanumeric) {
                return None;
            }
            Some((word, (*valence / VADER_VALENCE_MAX).clamp(-1.0, 1.0)))
        })
        .collect()
}
