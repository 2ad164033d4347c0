pub mod sentiment_repository;

pub use sentiment_repository::SqliteSentimentRepository;
