//! Word-weight lexicon used by the lexicon scorer.
//!
//! Two sources feed the store: a domain-specific financial table and a
//! general-purpose polarity word list. Financial weights always win; the
//! general list only fills words the financial table does not know.

use crate::domain::errors::LexiconError;
use serde::Deserialize;
use std::collections::HashMap;

/// Market vocabulary with hand-assigned weights in [-1, 1].
pub const FINANCIAL_LEXICON: &[(&str, f64)] = &[
    // Bullish
    ("bullish", 1.0),
    ("growth", 0.8),
    ("profit", 0.9),
    ("gain", 0.8),
    ("upside", 0.7),
    ("opportunity", 0.7),
    ("potential", 0.6),
    ("outperform", 0.8),
    ("buy", 0.7),
    ("strong", 0.7),
    ("positive", 0.7),
    ("increase", 0.6),
    ("rise", 0.6),
    ("surge", 0.8),
    ("breakthrough", 0.8),
    ("innovative", 0.7),
    ("leading", 0.6),
    ("premium", 0.6),
    ("dividend", 0.5),
    ("yield", 0.5),
    ("undervalued", 0.7),
    ("undervalue", 0.7),
    // Bearish
    ("bearish", -1.0),
    ("loss", -0.9),
    ("decline", -0.7),
    ("downside", -0.7),
    ("risk", -0.6),
    ("concern", -0.6),
    ("worry", -0.7),
    ("sell", -0.7),
    ("weak", -0.7),
    ("negative", -0.7),
    ("decrease", -0.6),
    ("fall", -0.6),
    ("crash", -0.9),
    ("plunge", -0.8),
    ("downtrend", -0.7),
    ("overvalued", -0.7),
    ("overvalue", -0.7),
    ("bankruptcy", -0.9),
    ("default", -0.9),
    ("delist", -0.8),
    ("dilution", -0.6),
    ("short", -0.7),
    ("bear", -0.8),
    ("dump", -0.8),
    // Context-dependent, counted as matches with zero weight
    ("hold", 0.0),
    ("neutral", 0.0),
    ("stable", 0.0),
    ("flat", 0.0),
    ("consolidate", 0.0),
    ("volatile", 0.0),
    ("uncertain", 0.0),
    ("mixed", 0.0),
    ("range", 0.0),
    ("technical", 0.0),
    ("fundamental", 0.0),
    ("analysis", 0.0),
    ("chart", 0.0),
    ("support", 0.0),
    ("resistance", 0.0),
    ("trend", 0.0),
    ("pattern", 0.0),
];

/// Immutable word -> weight mapping. Build once, share by reference.
#[derive(Debug, Clone, Default)]
pub struct LexiconStore {
    weights: HashMap<String, f64>,
}

impl LexiconStore {
    /// Build a store from a financial table and a general-purpose list.
    ///
    /// Tokens are lowercased. A general entry is ignored when the financial
    /// table already has the token.
    pub fn new<F, G>(financial: F, general: G) -> Result<Self, LexiconError>
    where
        F: IntoIterator<Item = (String, f64)>,
        G: IntoIterator<Item = (String, f64)>,
    {
        let mut weights = HashMap::new();

        for (token, weight) in financial {
            let token = validate(token, weight)?;
            weights.insert(token, weight);
        }

        for (token, weight) in general {
            let token = validate(token, weight)?;
            weights.entry(token).or_insert(weight);
        }

        Ok(Self { weights })
    }

    /// Store holding only the built-in financial table.
    pub fn financial_only() -> Self {
        let weights = FINANCIAL_LEXICON
            .iter()
            .map(|(token, weight)| (token.to_string(), *weight))
            .collect();
        Self { weights }
    }

    /// Built-in financial table merged with the given general list.
    pub fn with_general<G>(general: G) -> Result<Self, LexiconError>
    where
        G: IntoIterator<Item = (String, f64)>,
    {
        Self::new(default_financial_entries(), general)
    }

    /// Returns a new store where `overrides` replace or extend the
    /// financial entries. Overrides take precedence over everything.
    pub fn with_overrides(&self, overrides: &LexiconOverrides) -> Result<Self, LexiconError> {
        let mut weights = self.weights.clone();
        for (token, weight) in &overrides.terms {
            let token = validate(token.clone(), *weight)?;
            weights.insert(token, *weight);
        }
        Ok(Self { weights })
    }

    pub fn weight(&self, token: &str) -> Option<f64> {
        self.weights.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.weights.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

pub fn default_financial_entries() -> impl Iterator<Item = (String, f64)> {
    FINANCIAL_LEXICON
        .iter()
        .map(|(token, weight)| (token.to_string(), *weight))
}

/// Extra financial terms loaded from a TOML file:
///
/// ```toml
/// [terms]
/// moon = 0.6
/// bagholder = -0.5
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LexiconOverrides {
    #[serde(default)]
    pub terms: HashMap<String, f64>,
}

impl LexiconOverrides {
    pub fn from_toml_str(raw: &str) -> Result<Self, LexiconError> {
        toml::from_str(raw).map_err(|e| LexiconError::InvalidOverrides {
            reason: e.to_string(),
        })
    }
}

fn validate(token: String, weight: f64) -> Result<String, LexiconError> {
    let token = token.trim().to_lowercase();
    if token.is_empty() {
        return Err(LexiconError::EmptyToken);
    }
    if !(-1.0..=1.0).contains(&weight) {
        return Err(LexiconError::WeightOutOfRange { token, weight });
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(items: &[(&str, f64)]) -> Vec<(String, f64)> {
        items.iter().map(|(t, w)| (t.to_string(), *w)).collect()
    }

    fn none() -> Vec<(String, f64)> {
        Vec::new()
    }

    #[test]
    fn test_financial_entries_take_precedence() {
        let store = LexiconStore::new(
            entries(&[("crash", -0.9)]),
            entries(&[("crash", 0.5), ("happy", 0.6)]),
        )
        .unwrap();

        assert_eq!(store.weight("crash"), Some(-0.9));
        assert_eq!(store.weight("happy"), Some(0.6));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_tokens_are_lowercased() {
        let store = LexiconStore::new(entries(&[("Bullish", 1.0)]), none()).unwrap();
        assert!(store.contains("bullish"));
        assert!(!store.contains("Bullish"));
    }

    #[test]
    fn test_out_of_range_weight_is_rejected() {
        let result = LexiconStore::new(entries(&[("moon", 1.2)]), none());
        assert!(matches!(
            result,
            Err(LexiconError::WeightOutOfRange { .. })
        ));
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let result = LexiconStore::new(none(), entries(&[("  ", 0.1)]));
        assert!(matches!(result, Err(LexiconError::EmptyToken)));
    }

    #[test]
    fn test_builtin_financial_weights_are_bounded() {
        for (token, weight) in FINANCIAL_LEXICON {
            assert!((-1.0..=1.0).contains(weight), "{} has weight {}", token, weight);
        }
        let store = LexiconStore::financial_only();
        assert_eq!(store.weight("bullish"), Some(1.0));
        assert_eq!(store.weight("bearish"), Some(-1.0));
        assert_eq!(store.weight("hold"), Some(0.0));
    }

    #[test]
    fn test_overrides_from_toml() {
        let overrides = LexiconOverrides::from_toml_str(
            r#"
            [terms]
            moon = 0.6
            bullish = 0.5
            "#,
        )
        .unwrap();

        let store = LexiconStore::financial_only()
            .with_overrides(&overrides)
            .unwrap();
        assert_eq!(store.weight("moon"), Some(0.6));
        assert_eq!(store.weight("bullish"), Some(0.5));
    }

    #[test]
    fn test_invalid_overrides_toml() {
        let result = LexiconOverrides::from_toml_str("[terms]\nmoon = \"high\"");
        assert!(matches!(result, Err(LexiconError::InvalidOverrides { .. })));
    }
}
