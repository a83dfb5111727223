//! Directed relationships between assets.
//!
//! Edges are directed source → target and carry a free-form type naming the
//! semantics (`runs`, `depends_on`, `supports`, `installed_on`, `protects`,
//! ...). There is no uniqueness constraint: parallel edges between the same
//! pair with different types are permitted and meaningful.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DEFAULT_SESSION;

/// A directed edge between two assets in the same session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRelationship {
  pub id:                i64,
  pub session_id:        String,
  pub source_asset_id:   i64,
  pub target_asset_id:   i64,
  pub relationship_type: String,
  pub description:       Option<String>,
  pub created_at:        DateTime<Utc>,
}

/// Input to [`crate::store::InventoryStore::create_relationship`].
/// `id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewRelationship {
  pub session_id:        String,
  pub source_asset_id:   i64,
  pub target_asset_id:   i64,
  pub relationship_type: String,
  pub description:       Option<String>,
}

impl NewRelationship {
  /// Convenience constructor for an edge in the default session.
  pub fn new(
    source_asset_id: i64,
    target_asset_id: i64,
    relationship_type: impl Into<String>,
  ) -> Self {
    Self {
      session_id: DEFAULT_SESSION.to_string(),
      source_asset_id,
      target_asset_id,
      relationship_type: relationship_type.into(),
      description: None,
    }
  }
}
