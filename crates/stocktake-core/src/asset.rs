//! Asset records — the inventory's unit of ownership.
//!
//! Every asset belongs to exactly one session (the tenant partition key).
//! Attribute bags are closed: unknown types or statuses are rejected at the
//! store boundary rather than passed through.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DEFAULT_SESSION;

// ─── Enumerations ────────────────────────────────────────────────────────────

/// The broad category an asset falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
  Hardware,
  Software,
  CloudService,
  License,
  Network,
  Contract,
}

/// Lifecycle status of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
  #[default]
  Active,
  Retired,
  InStorage,
  Disposed,
  Maintenance,
  Planned,
}

/// CMMC-style data classification label. Opaque to the graph engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataClassification {
  #[serde(rename = "CUI")]
  Cui,
  #[serde(rename = "FCI")]
  Fci,
  #[serde(rename = "public")]
  Public,
  #[serde(rename = "internal")]
  Internal,
}

// ─── Asset ───────────────────────────────────────────────────────────────────

/// An inventory record. `id` is store-assigned and unique per store;
/// `session_id` partitions the whole dataset into isolated tenants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
  pub id:                  i64,
  pub session_id:          String,
  pub asset_type:          AssetType,
  pub sub_type:            Option<String>,
  pub name:                String,
  pub description:         Option<String>,
  pub status:              AssetStatus,
  pub data_classification: Option<DataClassification>,
  pub vendor:              Option<String>,
  /// Server-assigned; never changes after creation.
  pub created_at:          DateTime<Utc>,
  pub updated_at:          DateTime<Utc>,
}

// ─── NewAsset ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::InventoryStore::create_asset`].
/// `id` and the timestamps are always set by the store.
#[derive(Debug, Clone)]
pub struct NewAsset {
  pub session_id:          String,
  pub asset_type:          AssetType,
  pub sub_type:            Option<String>,
  pub name:                String,
  pub description:         Option<String>,
  pub status:              AssetStatus,
  pub data_classification: Option<DataClassification>,
  pub vendor:              Option<String>,
}

impl NewAsset {
  /// Convenience constructor with all optional fields unset and the
  /// default session.
  pub fn new(name: impl Into<String>, asset_type: AssetType) -> Self {
    Self {
      session_id:          DEFAULT_SESSION.to_string(),
      asset_type,
      sub_type:            None,
      name:                name.into(),
      description:         None,
      status:              AssetStatus::default(),
      data_classification: None,
      vendor:              None,
    }
  }
}

// ─── AssetPatch ──────────────────────────────────────────────────────────────

/// Partial update for [`crate::store::InventoryStore::update_asset`].
/// `None` leaves the field unchanged; the store logs one audit change row
/// per field that actually differs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetPatch {
  pub name:                Option<String>,
  pub asset_type:          Option<AssetType>,
  pub sub_type:            Option<String>,
  pub description:         Option<String>,
  pub status:              Option<AssetStatus>,
  pub data_classification: Option<DataClassification>,
  pub vendor:              Option<String>,
}

// ─── Audit trail ─────────────────────────────────────────────────────────────

/// What kind of mutation an [`AssetChange`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
  Created,
  Updated,
  StatusChange,
}

/// One row of the append-only audit trail. Written by the store on every
/// asset create/update/delete; read newest-first by the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetChange {
  pub id:            i64,
  pub asset_id:      i64,
  pub session_id:    String,
  pub change_type:   ChangeType,
  pub field_changed: Option<String>,
  pub old_value:     Option<String>,
  pub new_value:     Option<String>,
  pub notes:         Option<String>,
  pub changed_by:    String,
  pub changed_at:    DateTime<Utc>,
}
