//! [`SqliteStore`] — the SQLite implementation of [`InventoryStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use stocktake_core::{
  asset::{Asset, AssetChange, AssetPatch, ChangeType, NewAsset},
  relationship::{AssetRelationship, NewRelationship},
  store::{AssetFilter, AssetTallies, InventoryStore},
};

use crate::{
  Error, Result,
  encode::{
    RawAsset, RawChange, RawRelationship, decode_asset_type,
    decode_classification, decode_status, encode_asset_type,
    encode_change_type, encode_classification, encode_dt, encode_status,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Stocktake inventory store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// A pending audit row computed from a field diff.
struct ChangeRow {
  change_type: ChangeType,
  field:       &'static str,
  old:         Option<String>,
  new:         Option<String>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Whether an asset row exists within a session.
  async fn asset_exists(&self, id: i64, session_id: &str) -> Result<bool> {
    let session_id = session_id.to_owned();
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM assets WHERE id = ?1 AND session_id = ?2",
              rusqlite::params![id, session_id],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }
}

// ─── Field diffing ───────────────────────────────────────────────────────────

/// Apply `patch` to a copy of `current`, returning the updated asset and one
/// audit row per field that actually changed. Status mutations are logged as
/// `status_change`; everything else as `updated`.
fn apply_patch(current: &Asset, patch: AssetPatch) -> (Asset, Vec<ChangeRow>) {
  let mut updated = current.clone();
  let mut rows = Vec::new();

  let mut track =
    |field: &'static str,
     change_type: ChangeType,
     old: Option<String>,
     new: Option<String>| {
      if old != new {
        rows.push(ChangeRow { change_type, field, old, new });
      }
    };

  if let Some(name) = patch.name {
    track(
      "name",
      ChangeType::Updated,
      Some(current.name.clone()),
      Some(name.clone()),
    );
    updated.name = name;
  }
  if let Some(asset_type) = patch.asset_type {
    track(
      "asset_type",
      ChangeType::Updated,
      Some(encode_asset_type(current.asset_type).to_owned()),
      Some(encode_asset_type(asset_type).to_owned()),
    );
    updated.asset_type = asset_type;
  }
  if let Some(sub_type) = patch.sub_type {
    track(
      "sub_type",
      ChangeType::Updated,
      current.sub_type.clone(),
      Some(sub_type.clone()),
    );
    updated.sub_type = Some(sub_type);
  }
  if let Some(description) = patch.description {
    track(
      "description",
      ChangeType::Updated,
      current.description.clone(),
      Some(description.clone()),
    );
    updated.description = Some(description);
  }
  if let Some(status) = patch.status {
    track(
      "status",
      ChangeType::StatusChange,
      Some(encode_status(current.status).to_owned()),
      Some(encode_status(status).to_owned()),
    );
    updated.status = status;
  }
  if let Some(classification) = patch.data_classification {
    track(
      "data_classification",
      ChangeType::Updated,
      current
        .data_classification
        .map(|c| encode_classification(c).to_owned()),
      Some(encode_classification(classification).to_owned()),
    );
    updated.data_classification = Some(classification);
  }
  if let Some(vendor) = patch.vendor {
    track(
      "vendor",
      ChangeType::Updated,
      current.vendor.clone(),
      Some(vendor.clone()),
    );
    updated.vendor = Some(vendor);
  }

  (updated, rows)
}

// ─── InventoryStore impl ─────────────────────────────────────────────────────

impl InventoryStore for SqliteStore {
  type Error = Error;

  // ── Assets ────────────────────────────────────────────────────────────────

  async fn list_assets(
    &self,
    session_id: &str,
    filter: &AssetFilter,
  ) -> Result<Vec<Asset>> {
    let session_id = session_id.to_owned();
    let type_str = filter.asset_type.map(encode_asset_type);
    let status_str = filter.status.map(encode_status);
    let class_str = filter.data_classification.map(encode_classification);
    let pattern = filter.search.as_deref().map(|s| format!("%{s}%"));

    let raws: Vec<RawAsset> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM assets
           WHERE session_id = ?1
             AND (?2 IS NULL OR asset_type = ?2)
             AND (?3 IS NULL OR status = ?3)
             AND (?4 IS NULL OR data_classification = ?4)
             AND (?5 IS NULL
                  OR name LIKE ?5 OR description LIKE ?5
                  OR vendor LIKE ?5 OR sub_type LIKE ?5)
           ORDER BY name",
          RawAsset::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              session_id, type_str, status_str, class_str, pattern,
            ],
            RawAsset::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAsset::into_asset).collect()
  }

  async fn get_asset(&self, id: i64, session_id: &str) -> Result<Option<Asset>> {
    let session_id = session_id.to_owned();

    let raw: Option<RawAsset> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM assets WHERE id = ?1 AND session_id = ?2",
          RawAsset::COLUMNS
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id, session_id], RawAsset::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAsset::into_asset).transpose()
  }

  async fn create_asset(&self, input: NewAsset) -> Result<Asset> {
    if input.name.trim().is_empty() {
      return Err(Error::Validation("asset name is required".into()));
    }

    let now = Utc::now();
    let now_str = encode_dt(now);
    let session_id = input.session_id.clone();
    let type_str = encode_asset_type(input.asset_type);
    let status_str = encode_status(input.status);
    let class_str = input.data_classification.map(encode_classification);
    let name = input.name.clone();
    let sub_type = input.sub_type.clone();
    let description = input.description.clone();
    let vendor = input.vendor.clone();

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO assets (
             session_id, asset_type, sub_type, name, description,
             status, data_classification, vendor, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
          rusqlite::params![
            session_id, type_str, sub_type, name, description,
            status_str, class_str, vendor, now_str,
          ],
        )?;
        let id = tx.last_insert_rowid();
        tx.execute(
          "INSERT INTO asset_changes (
             session_id, asset_id, change_type, notes, changed_by, changed_at
           ) VALUES (?1, ?2, 'created', ?3, 'system', ?4)",
          rusqlite::params![
            session_id,
            id,
            format!("Asset {name:?} created"),
            now_str,
          ],
        )?;
        tx.commit()?;
        Ok(id)
      })
      .await?;

    Ok(Asset {
      id,
      session_id:          input.session_id,
      asset_type:          input.asset_type,
      sub_type:            input.sub_type,
      name:                input.name,
      description:         input.description,
      status:              input.status,
      data_classification: input.data_classification,
      vendor:              input.vendor,
      created_at:          now,
      updated_at:          now,
    })
  }

  async fn update_asset(
    &self,
    id: i64,
    session_id: &str,
    patch: AssetPatch,
  ) -> Result<Asset> {
    let current = self
      .get_asset(id, session_id)
      .await?
      .ok_or(Error::AssetNotFound(id))?;

    let (mut updated, change_rows) = apply_patch(&current, patch);
    updated.updated_at = Utc::now();

    let session_owned = session_id.to_owned();
    let type_str = encode_asset_type(updated.asset_type);
    let status_str = encode_status(updated.status);
    let class_str = updated.data_classification.map(encode_classification);
    let name = updated.name.clone();
    let sub_type = updated.sub_type.clone();
    let description = updated.description.clone();
    let vendor = updated.vendor.clone();
    let updated_str = encode_dt(updated.updated_at);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for row in &change_rows {
          tx.execute(
            "INSERT INTO asset_changes (
               session_id, asset_id, change_type, field_changed,
               old_value, new_value, changed_by, changed_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'system', ?7)",
            rusqlite::params![
              session_owned,
              id,
              encode_change_type(row.change_type),
              row.field,
              row.old,
              row.new,
              updated_str,
            ],
          )?;
        }
        tx.execute(
          "UPDATE assets SET
             asset_type = ?1, sub_type = ?2, name = ?3, description = ?4,
             status = ?5, data_classification = ?6, vendor = ?7,
             updated_at = ?8
           WHERE id = ?9 AND session_id = ?10",
          rusqlite::params![
            type_str, sub_type, name, description, status_str, class_str,
            vendor, updated_str, id, session_owned,
          ],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(updated)
  }

  async fn delete_asset(&self, id: i64, session_id: &str) -> Result<()> {
    if !self.asset_exists(id, session_id).await? {
      return Err(Error::AssetNotFound(id));
    }

    let session_id = session_id.to_owned();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM asset_changes
           WHERE asset_id = ?1 AND session_id = ?2",
          rusqlite::params![id, session_id],
        )?;
        tx.execute(
          "DELETE FROM asset_relationships
           WHERE session_id = ?2
             AND (source_asset_id = ?1 OR target_asset_id = ?1)",
          rusqlite::params![id, session_id],
        )?;
        tx.execute(
          "DELETE FROM assets WHERE id = ?1 AND session_id = ?2",
          rusqlite::params![id, session_id],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Relationships ─────────────────────────────────────────────────────────

  async fn list_relationships(
    &self,
    session_id: &str,
  ) -> Result<Vec<AssetRelationship>> {
    let session_id = session_id.to_owned();

    let raws: Vec<RawRelationship> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM asset_relationships
           WHERE session_id = ?1
           ORDER BY id",
          RawRelationship::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![session_id], RawRelationship::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawRelationship::into_relationship)
      .collect()
  }

  async fn create_relationship(
    &self,
    input: NewRelationship,
  ) -> Result<AssetRelationship> {
    // Explicit endpoint checks keep dangling edges out of a store whose
    // foreign keys only guarantee the id exists somewhere, not in this
    // session.
    if !self
      .asset_exists(input.source_asset_id, &input.session_id)
      .await?
    {
      return Err(Error::AssetNotFound(input.source_asset_id));
    }
    if !self
      .asset_exists(input.target_asset_id, &input.session_id)
      .await?
    {
      return Err(Error::AssetNotFound(input.target_asset_id));
    }

    let now = Utc::now();
    let now_str = encode_dt(now);
    let session_id = input.session_id.clone();
    let relationship_type = input.relationship_type.clone();
    let description = input.description.clone();
    let (source, target) = (input.source_asset_id, input.target_asset_id);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO asset_relationships (
             session_id, source_asset_id, target_asset_id,
             relationship_type, description, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            session_id, source, target, relationship_type, description,
            now_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(AssetRelationship {
      id,
      session_id:        input.session_id,
      source_asset_id:   input.source_asset_id,
      target_asset_id:   input.target_asset_id,
      relationship_type: input.relationship_type,
      description:       input.description,
      created_at:        now,
    })
  }

  async fn delete_relationship(&self, id: i64, session_id: &str) -> Result<()> {
    let session_id = session_id.to_owned();

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM asset_relationships
           WHERE id = ?1 AND session_id = ?2",
          rusqlite::params![id, session_id],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(Error::RelationshipNotFound(id));
    }
    Ok(())
  }

  // ── Audit trail and aggregates ────────────────────────────────────────────

  async fn recent_changes(
    &self,
    session_id: &str,
    asset_id: Option<i64>,
    limit: usize,
  ) -> Result<Vec<AssetChange>> {
    let session_id = session_id.to_owned();
    let limit = limit as i64;

    let raws: Vec<RawChange> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM asset_changes
           WHERE session_id = ?1
             AND (?2 IS NULL OR asset_id = ?2)
           ORDER BY changed_at DESC, id DESC
           LIMIT ?3",
          RawChange::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![session_id, asset_id, limit],
            RawChange::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawChange::into_change).collect()
  }

  async fn asset_tallies(&self, session_id: &str) -> Result<AssetTallies> {
    let session_id = session_id.to_owned();

    type Grouped = Vec<(String, i64)>;
    let (total, active, by_type, by_status, by_class): (
      i64,
      i64,
      Grouped,
      Grouped,
      Grouped,
    ) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          "SELECT COUNT(*) FROM assets WHERE session_id = ?1",
          rusqlite::params![session_id],
          |row| row.get(0),
        )?;
        let active: i64 = conn.query_row(
          "SELECT COUNT(*) FROM assets
           WHERE session_id = ?1 AND status = 'active'",
          rusqlite::params![session_id],
          |row| row.get(0),
        )?;

        let grouped = |conn: &rusqlite::Connection,
                       sql: &str|
         -> rusqlite::Result<Grouped> {
          let mut stmt = conn.prepare(sql)?;
          stmt
            .query_map(rusqlite::params![session_id], |row| {
              Ok((row.get(0)?, row.get(1)?))
            })?
            .collect()
        };

        let by_type = grouped(
          conn,
          "SELECT asset_type, COUNT(*) FROM assets
           WHERE session_id = ?1 GROUP BY asset_type",
        )?;
        let by_status = grouped(
          conn,
          "SELECT status, COUNT(*) FROM assets
           WHERE session_id = ?1 GROUP BY status",
        )?;
        let by_class = grouped(
          conn,
          "SELECT data_classification, COUNT(*) FROM assets
           WHERE session_id = ?1 AND data_classification IS NOT NULL
           GROUP BY data_classification",
        )?;

        Ok((total, active, by_type, by_status, by_class))
      })
      .await?;

    Ok(AssetTallies {
      total,
      active,
      by_type:           by_type
        .into_iter()
        .map(|(t, n)| Ok((decode_asset_type(&t)?, n)))
        .collect::<Result<_>>()?,
      by_status:         by_status
        .into_iter()
        .map(|(s, n)| Ok((decode_status(&s)?, n)))
        .collect::<Result<_>>()?,
      by_classification: by_class
        .into_iter()
        .map(|(c, n)| Ok((decode_classification(&c)?, n)))
        .collect::<Result<_>>()?,
    })
  }
}
