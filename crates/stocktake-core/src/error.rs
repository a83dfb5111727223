//! Error types for `stocktake-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("asset {0} not found")]
  AssetNotFound(i64),

  #[error("relationship {0} not found")]
  RelationshipNotFound(i64),

  /// Malformed or out-of-range input to a public operation. Raised before
  /// any store mutation or graph construction takes place.
  #[error("invalid input: {0}")]
  Validation(String),

  /// An underlying persistence failure, propagated unchanged. The graph
  /// engine never retries or recovers from these.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
