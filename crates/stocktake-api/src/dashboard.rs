//! Handler for the `/dashboard` endpoint.
//!
//! Aggregates session-level counts: asset tallies from the store plus the
//! orphan count from a fresh graph build. Chart slices carry the fixed
//! per-category display colors the frontend charts expect.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Serialize;
use stocktake_core::{
  asset::{AssetChange, AssetStatus, AssetType, DataClassification},
  store::InventoryStore,
};

use crate::{
  ApiError, assets::SessionParams, error::store_err,
  relationships::build_graph, session_or_default,
};

// ─── Response shapes ──────────────────────────────────────────────────────────

/// One chart slice: a display name, a count, and an optional fixed color.
#[derive(Debug, Clone, Serialize)]
pub struct CountSlice {
  pub name:  String,
  pub value: i64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub color: Option<&'static str>,
}

/// The full dashboard payload.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
  pub total_assets:             i64,
  pub active_assets:            i64,
  pub orphan_assets:            usize,
  pub assets_by_type:           Vec<CountSlice>,
  pub assets_by_status:         Vec<CountSlice>,
  pub classification_breakdown: Vec<CountSlice>,
  pub recent_changes:           Vec<AssetChange>,
}

// ─── Display labels and colors ────────────────────────────────────────────────

fn type_label(t: AssetType) -> &'static str {
  match t {
    AssetType::Hardware => "Hardware",
    AssetType::Software => "Software",
    AssetType::CloudService => "Cloud Service",
    AssetType::License => "License",
    AssetType::Network => "Network",
    AssetType::Contract => "Contract",
  }
}

fn type_color(t: AssetType) -> &'static str {
  match t {
    AssetType::Hardware => "#337ab7",
    AssetType::Software => "#5cb85c",
    AssetType::CloudService => "#7c3aed",
    AssetType::License => "#337ab7",
    AssetType::Network => "#f0ad4e",
    AssetType::Contract => "#5bc0de",
  }
}

fn status_label(s: AssetStatus) -> &'static str {
  match s {
    AssetStatus::Active => "Active",
    AssetStatus::Retired => "Retired",
    AssetStatus::InStorage => "In Storage",
    AssetStatus::Disposed => "Disposed",
    AssetStatus::Maintenance => "Maintenance",
    AssetStatus::Planned => "Planned",
  }
}

fn classification_label(c: DataClassification) -> &'static str {
  match c {
    DataClassification::Cui => "CUI",
    DataClassification::Fci => "FCI",
    DataClassification::Public => "public",
    DataClassification::Internal => "internal",
  }
}

fn classification_color(c: DataClassification) -> &'static str {
  match c {
    DataClassification::Cui => "#d9534f",
    DataClassification::Fci => "#f0ad4e",
    DataClassification::Public => "#5cb85c",
    DataClassification::Internal => "#337ab7",
  }
}

// ─── Handler ──────────────────────────────────────────────────────────────────

/// `GET /dashboard`
pub async fn summary<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SessionParams>,
) -> Result<Json<DashboardSummary>, ApiError>
where
  S: InventoryStore,
{
  let session_id = session_or_default(params.session_id);

  let tallies = store.asset_tallies(&session_id).await.map_err(store_err)?;
  let recent = store
    .recent_changes(&session_id, None, 10)
    .await
    .map_err(store_err)?;

  let graph = build_graph(store.as_ref(), &session_id).await?;
  let orphan_assets = graph.orphans().len();

  Ok(Json(DashboardSummary {
    total_assets:             tallies.total,
    active_assets:            tallies.active,
    orphan_assets,
    assets_by_type:           tallies
      .by_type
      .into_iter()
      .map(|(t, n)| CountSlice {
        name:  type_label(t).to_owned(),
        value: n,
        color: Some(type_color(t)),
      })
      .collect(),
    assets_by_status:         tallies
      .by_status
      .into_iter()
      .map(|(s, n)| CountSlice {
        name:  status_label(s).to_owned(),
        value: n,
        color: None,
      })
      .collect(),
    classification_breakdown: tallies
      .by_classification
      .into_iter()
      .map(|(c, n)| CountSlice {
        name:  classification_label(c).to_owned(),
        value: n,
        color: Some(classification_color(c)),
      })
      .collect(),
    recent_changes:           recent,
  }))
}
