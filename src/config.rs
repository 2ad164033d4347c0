use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    /// Optional TOML file with extra financial lexicon terms
    pub lexicon_path: Option<PathBuf>,
    pub parallel_scoring: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://tickerpulse.db".to_string());

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("Failed to parse DB_MAX_CONNECTIONS")?;

        let lexicon_path = env::var("LEXICON_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let parallel_scoring = env::var("PARALLEL_SCORING")
            .unwrap_or_else(|_| "true".to_string())
            .to_lowercase()
            .parse::<bool>()
            .context("Failed to parse PARALLEL_SCORING")?;

        Ok(Config {
            database_url,
            max_connections,
            lexicon_path,
            parallel_scoring,
        })
    }
}
