pub mod ingest;
pub mod persistence;
pub mod sentiment;
