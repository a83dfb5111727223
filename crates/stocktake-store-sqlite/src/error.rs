//! Error type for `stocktake-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored enum column holds a string no variant matches. Unknown
  /// attribute values are rejected here, never passed through.
  #[error("unrecognised stored value: {0}")]
  Decode(String),

  #[error("asset {0} not found")]
  AssetNotFound(i64),

  #[error("relationship {0} not found")]
  RelationshipNotFound(i64),

  #[error("invalid input: {0}")]
  Validation(String),
}

/// Fold backend errors into the core taxonomy: named conditions stay named,
/// everything else becomes an opaque store failure.
impl From<Error> for stocktake_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::AssetNotFound(id) => Self::AssetNotFound(id),
      Error::RelationshipNotFound(id) => Self::RelationshipNotFound(id),
      Error::Validation(message) => Self::Validation(message),
      other => Self::Store(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
