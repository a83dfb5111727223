//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; enums as their serde tags.
//! Unknown enum strings are rejected with a decode error, never passed
//! through silently.

use chrono::{DateTime, Utc};
use stocktake_core::{
  asset::{
    Asset, AssetChange, AssetStatus, AssetType, ChangeType,
    DataClassification,
  },
  relationship::AssetRelationship,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── AssetType ───────────────────────────────────────────────────────────────

pub fn encode_asset_type(t: AssetType) -> &'static str {
  match t {
    AssetType::Hardware => "hardware",
    AssetType::Software => "software",
    AssetType::CloudService => "cloud_service",
    AssetType::License => "license",
    AssetType::Network => "network",
    AssetType::Contract => "contract",
  }
}

pub fn decode_asset_type(s: &str) -> Result<AssetType> {
  match s {
    "hardware" => Ok(AssetType::Hardware),
    "software" => Ok(AssetType::Software),
    "cloud_service" => Ok(AssetType::CloudService),
    "license" => Ok(AssetType::License),
    "network" => Ok(AssetType::Network),
    "contract" => Ok(AssetType::Contract),
    other => Err(Error::Decode(format!("unknown asset type: {other:?}"))),
  }
}

// ─── AssetStatus ─────────────────────────────────────────────────────────────

pub fn encode_status(s: AssetStatus) -> &'static str {
  match s {
    AssetStatus::Active => "active",
    AssetStatus::Retired => "retired",
    AssetStatus::InStorage => "in_storage",
    AssetStatus::Disposed => "disposed",
    AssetStatus::Maintenance => "maintenance",
    AssetStatus::Planned => "planned",
  }
}

pub fn decode_status(s: &str) -> Result<AssetStatus> {
  match s {
    "active" => Ok(AssetStatus::Active),
    "retired" => Ok(AssetStatus::Retired),
    "in_storage" => Ok(AssetStatus::InStorage),
    "disposed" => Ok(AssetStatus::Disposed),
    "maintenance" => Ok(AssetStatus::Maintenance),
    "planned" => Ok(AssetStatus::Planned),
    other => Err(Error::Decode(format!("unknown asset status: {other:?}"))),
  }
}

// ─── DataClassification ──────────────────────────────────────────────────────

pub fn encode_classification(c: DataClassification) -> &'static str {
  match c {
    DataClassification::Cui => "CUI",
    DataClassification::Fci => "FCI",
    DataClassification::Public => "public",
    DataClassification::Internal => "internal",
  }
}

pub fn decode_classification(s: &str) -> Result<DataClassification> {
  match s {
    "CUI" => Ok(DataClassification::Cui),
    "FCI" => Ok(DataClassification::Fci),
    "public" => Ok(DataClassification::Public),
    "internal" => Ok(DataClassification::Internal),
    other => {
      Err(Error::Decode(format!("unknown data classification: {other:?}")))
    }
  }
}

// ─── ChangeType ──────────────────────────────────────────────────────────────

pub fn encode_change_type(t: ChangeType) -> &'static str {
  match t {
    ChangeType::Created => "created",
    ChangeType::Updated => "updated",
    ChangeType::StatusChange => "status_change",
  }
}

pub fn decode_change_type(s: &str) -> Result<ChangeType> {
  match s {
    "created" => Ok(ChangeType::Created),
    "updated" => Ok(ChangeType::Updated),
    "status_change" => Ok(ChangeType::StatusChange),
    other => Err(Error::Decode(format!("unknown change type: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `assets` row.
pub struct RawAsset {
  pub id:                  i64,
  pub session_id:          String,
  pub asset_type:          String,
  pub sub_type:            Option<String>,
  pub name:                String,
  pub description:         Option<String>,
  pub status:              String,
  pub data_classification: Option<String>,
  pub vendor:              Option<String>,
  pub created_at:          String,
  pub updated_at:          String,
}

impl RawAsset {
  pub const COLUMNS: &'static str = "id, session_id, asset_type, sub_type, \
     name, description, status, data_classification, vendor, created_at, \
     updated_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                  row.get(0)?,
      session_id:          row.get(1)?,
      asset_type:          row.get(2)?,
      sub_type:            row.get(3)?,
      name:                row.get(4)?,
      description:         row.get(5)?,
      status:              row.get(6)?,
      data_classification: row.get(7)?,
      vendor:              row.get(8)?,
      created_at:          row.get(9)?,
      updated_at:          row.get(10)?,
    })
  }

  pub fn into_asset(self) -> Result<Asset> {
    Ok(Asset {
      id:                  self.id,
      session_id:          self.session_id,
      asset_type:          decode_asset_type(&self.asset_type)?,
      sub_type:            self.sub_type,
      name:                self.name,
      description:         self.description,
      status:              decode_status(&self.status)?,
      data_classification: self
        .data_classification
        .as_deref()
        .map(decode_classification)
        .transpose()?,
      vendor:              self.vendor,
      created_at:          decode_dt(&self.created_at)?,
      updated_at:          decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from an `asset_relationships` row.
pub struct RawRelationship {
  pub id:                i64,
  pub session_id:        String,
  pub source_asset_id:   i64,
  pub target_asset_id:   i64,
  pub relationship_type: String,
  pub description:       Option<String>,
  pub created_at:        String,
}

impl RawRelationship {
  pub const COLUMNS: &'static str = "id, session_id, source_asset_id, \
     target_asset_id, relationship_type, description, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      session_id:        row.get(1)?,
      source_asset_id:   row.get(2)?,
      target_asset_id:   row.get(3)?,
      relationship_type: row.get(4)?,
      description:       row.get(5)?,
      created_at:        row.get(6)?,
    })
  }

  pub fn into_relationship(self) -> Result<AssetRelationship> {
    Ok(AssetRelationship {
      id:                self.id,
      session_id:        self.session_id,
      source_asset_id:   self.source_asset_id,
      target_asset_id:   self.target_asset_id,
      relationship_type: self.relationship_type,
      description:       self.description,
      created_at:        decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `asset_changes` row.
pub struct RawChange {
  pub id:            i64,
  pub session_id:    String,
  pub asset_id:      i64,
  pub change_type:   String,
  pub field_changed: Option<String>,
  pub old_value:     Option<String>,
  pub new_value:     Option<String>,
  pub notes:         Option<String>,
  pub changed_by:    String,
  pub changed_at:    String,
}

impl RawChange {
  pub const COLUMNS: &'static str = "id, session_id, asset_id, change_type, \
     field_changed, old_value, new_value, notes, changed_by, changed_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      session_id:    row.get(1)?,
      asset_id:      row.get(2)?,
      change_type:   row.get(3)?,
      field_changed: row.get(4)?,
      old_value:     row.get(5)?,
      new_value:     row.get(6)?,
      notes:         row.get(7)?,
      changed_by:    row.get(8)?,
      changed_at:    row.get(9)?,
    })
  }

  pub fn into_change(self) -> Result<AssetChange> {
    Ok(AssetChange {
      id:            self.id,
      session_id:    self.session_id,
      asset_id:      self.asset_id,
      change_type:   decode_change_type(&self.change_type)?,
      field_changed: self.field_changed,
      old_value:     self.old_value,
      new_value:     self.new_value,
      notes:         self.notes,
      changed_by:    self.changed_by,
      changed_at:    decode_dt(&self.changed_at)?,
    })
  }
}
