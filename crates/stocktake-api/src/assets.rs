//! Handlers for `/assets` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/assets` | Optional `asset_type`, `status`, `data_classification`, `search` |
//! | `POST`   | `/assets` | Body: [`NewAssetBody`]; returns 201 + stored asset |
//! | `GET`    | `/assets/{id}` | 404 if not found |
//! | `PUT`    | `/assets/{id}` | Body: partial update; unset fields keep their value |
//! | `DELETE` | `/assets/{id}` | Cascades to relationships and audit rows |
//! | `GET`    | `/assets/{id}/changes` | Audit trail for one asset, newest first |
//!
//! Every route takes an optional `session_id` query parameter defaulting to
//! the shared default session.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use stocktake_core::{
  asset::{
    Asset, AssetChange, AssetPatch, AssetStatus, AssetType,
    DataClassification, NewAsset,
  },
  store::{AssetFilter, InventoryStore},
};

use crate::{error::store_err, session_or_default, ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub session_id:          Option<String>,
  pub asset_type:          Option<AssetType>,
  pub status:              Option<AssetStatus>,
  pub data_classification: Option<DataClassification>,
  pub search:              Option<String>,
}

/// `GET /assets[?asset_type=...][&status=...][&search=...]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Asset>>, ApiError>
where
  S: InventoryStore,
{
  let session_id = session_or_default(params.session_id);
  let filter = AssetFilter {
    asset_type:          params.asset_type,
    status:              params.status,
    data_classification: params.data_classification,
    search:              params.search,
  };
  let assets = store
    .list_assets(&session_id, &filter)
    .await
    .map_err(store_err)?;
  Ok(Json(assets))
}

// ─── Session-only query ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SessionParams {
  pub session_id: Option<String>,
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /assets/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Query(params): Query<SessionParams>,
) -> Result<Json<Asset>, ApiError>
where
  S: InventoryStore,
{
  let session_id = session_or_default(params.session_id);
  let asset = store
    .get_asset(id, &session_id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("asset {id} not found")))?;
  Ok(Json(asset))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /assets`.
#[derive(Debug, Deserialize)]
pub struct NewAssetBody {
  pub session_id:          Option<String>,
  pub asset_type:          AssetType,
  pub sub_type:            Option<String>,
  pub name:                String,
  pub description:         Option<String>,
  pub status:              Option<AssetStatus>,
  pub data_classification: Option<DataClassification>,
  pub vendor:              Option<String>,
}

impl From<NewAssetBody> for NewAsset {
  fn from(b: NewAssetBody) -> Self {
    NewAsset {
      session_id:          session_or_default(b.session_id),
      asset_type:          b.asset_type,
      sub_type:            b.sub_type,
      name:                b.name,
      description:         b.description,
      status:              b.status.unwrap_or_default(),
      data_classification: b.data_classification,
      vendor:              b.vendor,
    }
  }
}

/// `POST /assets` — returns 201 + the stored [`Asset`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewAssetBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InventoryStore,
{
  let asset = store
    .create_asset(NewAsset::from(body))
    .await
    .map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(asset)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /assets/{id}` — body is a partial [`AssetPatch`].
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Query(params): Query<SessionParams>,
  Json(patch): Json<AssetPatch>,
) -> Result<Json<Asset>, ApiError>
where
  S: InventoryStore,
{
  let session_id = session_or_default(params.session_id);
  let asset = store
    .update_asset(id, &session_id, patch)
    .await
    .map_err(store_err)?;
  Ok(Json(asset))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /assets/{id}` — cascades per the store contract.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Query(params): Query<SessionParams>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InventoryStore,
{
  let session_id = session_or_default(params.session_id);
  store
    .delete_asset(id, &session_id)
    .await
    .map_err(store_err)?;
  Ok(Json(json!({ "message": "Asset deleted" })))
}

// ─── Audit trail ──────────────────────────────────────────────────────────────

/// `GET /assets/{id}/changes` — the asset's audit trail, newest first.
pub async fn changes<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Query(params): Query<SessionParams>,
) -> Result<Json<Vec<AssetChange>>, ApiError>
where
  S: InventoryStore,
{
  let session_id = session_or_default(params.session_id);
  // 404 for an unknown asset rather than an empty list.
  store
    .get_asset(id, &session_id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("asset {id} not found")))?;

  let changes = store
    .recent_changes(&session_id, Some(id), 50)
    .await
    .map_err(store_err)?;
  Ok(Json(changes))
}
