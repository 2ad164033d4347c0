//! Wiring from [`Config`](crate::config::Config) to a ready pipeline.

pub mod persistence;
pub mod scoring;

use crate::application::pipeline::SentimentPipeline;
use crate::config::Config;
use anyhow::Result;
use persistence::{PersistenceBootstrap, PersistenceHandle};
use scoring::ScoringBootstrap;

pub struct Application {
    pub persistence: PersistenceHandle,
    pub pipeline: SentimentPipeline,
}

impl Application {
    pub async fn build(config: &Config) -> Result<Self> {
        let persistence = PersistenceBootstrap::init(config).await?;
        let aggregator = ScoringBootstrap::init(config)?;
        let pipeline = SentimentPipeline::new(aggregator, persistence.sentiment_repository.clone());

        Ok(Self {
            persistence,
            pipeline,
        })
    }
}
