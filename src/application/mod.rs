// Post and comment scoring
pub mod aggregator;

// Wiring from configuration
pub mod bootstrap;

// Batch entry point
pub mod pipeline;
