//! Ingestion boundary: raw files in, normalised [`Post`](crate::domain::post::Post)s out.

pub mod literal;
pub mod loader;
pub mod record;

pub use loader::{batch_date_from_file_name, dated_input_files, load_posts, parse_batch_date};
pub use record::{ListField, RawPost};
