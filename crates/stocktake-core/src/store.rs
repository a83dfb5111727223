//! The `InventoryStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `stocktake-store-sqlite`). Higher layers (`stocktake-api`) depend on this
//! abstraction, not on any concrete backend.
//!
//! Every method takes a session identifier: the session is a mandatory
//! partition key, not an optional filter. No operation addresses "all
//! sessions".

use std::future::Future;

use crate::{
  asset::{
    Asset, AssetChange, AssetPatch, AssetStatus, AssetType,
    DataClassification, NewAsset,
  },
  relationship::{AssetRelationship, NewRelationship},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Filters for [`InventoryStore::list_assets`]. All fields are optional and
/// combine with AND; `search` is a case-insensitive substring match over
/// name, description, vendor, and sub_type.
#[derive(Debug, Clone, Default)]
pub struct AssetFilter {
  pub asset_type:          Option<AssetType>,
  pub status:              Option<AssetStatus>,
  pub data_classification: Option<DataClassification>,
  pub search:              Option<String>,
}

/// Grouped asset counts for one session, computed by the store.
#[derive(Debug, Clone, Default)]
pub struct AssetTallies {
  pub total:             i64,
  pub active:            i64,
  pub by_type:           Vec<(AssetType, i64)>,
  pub by_status:         Vec<(AssetStatus, i64)>,
  /// Only assets with a non-null classification are counted.
  pub by_classification: Vec<(DataClassification, i64)>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Stocktake inventory backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
///
/// The associated error converts into [`crate::Error`] so named conditions
/// (not-found, validation) survive the generic API boundary instead of
/// collapsing into an opaque backend failure.
pub trait InventoryStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Assets ────────────────────────────────────────────────────────────

  /// List a session's assets, filtered and ordered by name.
  fn list_assets<'a>(
    &'a self,
    session_id: &'a str,
    filter: &'a AssetFilter,
  ) -> impl Future<Output = Result<Vec<Asset>, Self::Error>> + Send + 'a;

  /// Retrieve one asset by id within a session. Returns `None` if absent.
  fn get_asset<'a>(
    &'a self,
    id: i64,
    session_id: &'a str,
  ) -> impl Future<Output = Result<Option<Asset>, Self::Error>> + Send + 'a;

  /// Create an asset and log a `created` audit change. The id and
  /// timestamps are assigned by the store. Fails validation on an empty
  /// name.
  fn create_asset(
    &self,
    input: NewAsset,
  ) -> impl Future<Output = Result<Asset, Self::Error>> + Send + '_;

  /// Apply a partial update, logging one audit change row per field that
  /// actually changed (`status` mutations are logged as `status_change`).
  /// Fails with a not-found condition if the asset is absent.
  fn update_asset<'a>(
    &'a self,
    id: i64,
    session_id: &'a str,
    patch: AssetPatch,
  ) -> impl Future<Output = Result<Asset, Self::Error>> + Send + 'a;

  /// Delete an asset, cascading to its relationships (both directions) and
  /// audit changes. Fails with a not-found condition if absent.
  fn delete_asset<'a>(
    &'a self,
    id: i64,
    session_id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Relationships ─────────────────────────────────────────────────────

  /// List all of a session's directed relationships.
  fn list_relationships<'a>(
    &'a self,
    session_id: &'a str,
  ) -> impl Future<Output = Result<Vec<AssetRelationship>, Self::Error>>
  + Send
  + 'a;

  /// Insert a directed edge. Both endpoint assets must exist in the
  /// session; otherwise fails with a not-found condition naming the
  /// missing asset.
  fn create_relationship(
    &self,
    input: NewRelationship,
  ) -> impl Future<Output = Result<AssetRelationship, Self::Error>> + Send + '_;

  /// Remove exactly one edge by id within a session. Fails with a
  /// not-found condition if absent.
  fn delete_relationship<'a>(
    &'a self,
    id: i64,
    session_id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Audit trail and aggregates ────────────────────────────────────────

  /// The most recent audit changes for a session, newest first. If
  /// `asset_id` is set, only that asset's changes are returned.
  fn recent_changes<'a>(
    &'a self,
    session_id: &'a str,
    asset_id: Option<i64>,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<AssetChange>, Self::Error>> + Send + 'a;

  /// Grouped asset counts for the dashboard.
  fn asset_tallies<'a>(
    &'a self,
    session_id: &'a str,
  ) -> impl Future<Output = Result<AssetTallies, Self::Error>> + Send + 'a;
}
