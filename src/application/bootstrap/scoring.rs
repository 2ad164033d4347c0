use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::application::aggregator::PostAggregator;
use crate::config::Config;
use crate::domain::lexicon::{LexiconOverrides, LexiconStore};
use crate::domain::scoring::HybridScorer;
use crate::infrastructure::sentiment::{VaderPolarity, vader};

pub struct ScoringBootstrap;

impl ScoringBootstrap {
    pub fn init(config: &Config) -> Result<PostAggregator> {
        let lexicon = Self::build_lexicon(config.lexicon_path.as_deref())?;
        info!("Lexicon ready with {} terms", lexicon.len());

        let scorer = HybridScorer::new(Arc::new(lexicon), Arc::new(VaderPolarity::new()));
        Ok(PostAggregator::new(scorer).with_parallelism(config.parallel_scoring))
    }

    /// Financial table, backfilled with VADER's word list, then any
    /// overrides from `overrides_path`.
    pub fn build_lexicon(overrides_path: Option<&Path>) -> Result<LexiconStore> {
        let store = LexiconStore::with_general(vader::general_lexicon())
            .context("Failed to build lexicon")?;

        let Some(path) = overrides_path else {
            return Ok(store);
        };

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon overrides {}", path.display()))?;
        let overrides = LexiconOverrides::from_toml_str(&raw)
            .with_context(|| format!("Invalid lexicon overrides in {}", path.display()))?;
        info!(
            "Applying {} lexicon overrides from {}",
            overrides.terms.len(),
            path.display()
        );

        store
            .with_overrides(&overrides)
            .with_context(|| format!("Invalid lexicon overrides in {}", path.display()))
    }
}
