pub mod cache;
pub mod error;
pub mod types;

pub use cache::{cached, TtlCache};
pub use types::{MovieKind, MovieRecord, SearchKind, SearchResultSet, SourceApi};
