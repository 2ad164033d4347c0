// Lexicon and text scoring
pub mod lexicon;
pub mod scoring;
pub mod sentiment;
pub mod text;

// Posts and their daily rollup
pub mod post;
pub mod rollup;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;
