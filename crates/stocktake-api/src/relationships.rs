//! Handlers for `/relationships` endpoints — the graph engine's public
//! surface.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/relationships` | Body: [`CreateBody`]; returns 201 + stored edge |
//! | `DELETE` | `/relationships/{id}` | 404 if absent in the session |
//! | `GET`    | `/relationships/graph` | Full visualisation-ready `{nodes, links}` |
//! | `GET`    | `/relationships/impact/{asset_id}` | Bounded-BFS impact report; `depth` in [1,10], default 2 |
//!
//! Each graph query rebuilds an ephemeral [`AssetGraph`] from a fresh store
//! read and discards it with the response; no graph state is shared between
//! requests.

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
  graph::{AssetGraph, GraphExport, IMPACT_DEPTH_RANGE, ImpactReport},
  relationship::{AssetRelationship, NewRelationship},
  store::{AssetFilter, InventoryStore},
};

use crate::{
  ApiError, assets::SessionParams, error::store_err, session_or_default,
};

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /relationships`. Required fields are checked
/// by hand so a missing one yields a 400 naming it, not a deserialisation
/// failure.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub session_id:        Option<String>,
  pub source_asset_id:   Option<i64>,
  pub target_asset_id:   Option<i64>,
  pub relationship_type: Option<String>,
  pub description:       Option<String>,
}

/// `POST /relationships` — returns 201 + the stored edge.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InventoryStore,
{
  let mut missing = Vec::new();
  if body.source_asset_id.is_none() {
    missing.push("source_asset_id");
  }
  if body.target_asset_id.is_none() {
    missing.push("target_asset_id");
  }
  if body.relationship_type.is_none() {
    missing.push("relationship_type");
  }
  let (Some(source_asset_id), Some(target_asset_id), Some(relationship_type)) =
    (body.source_asset_id, body.target_asset_id, body.relationship_type)
  else {
    return Err(ApiError::BadRequest(format!(
      "missing required fields: {}",
      missing.join(", ")
    )));
  };

  let input = NewRelationship {
    session_id: session_or_default(body.session_id),
    source_asset_id,
    target_asset_id,
    relationship_type,
    description: body.description,
  };

  let rel: AssetRelationship =
    store.create_relationship(input).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(rel)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /relationships/{id}`
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
    .delete_relationship(id, &session_id)
    .await
    .map_err(store_err)?;
  Ok(Json(json!({ "message": "Relationship deleted" })))
}

// ─── Graph export ─────────────────────────────────────────────────────────────

/// Build the session's ephemeral graph from a fresh store read.
pub(crate) async fn build_graph<S>(
  store: &S,
  session_id: &str,
) -> Result<AssetGraph, ApiError>
where
  S: InventoryStore,
{
  let assets = store
    .list_assets(session_id, &AssetFilter::default())
    .await
    .map_err(store_err)?;
  let relationships = store
    .list_relationships(session_id)
    .await
    .map_err(store_err)?;
  Ok(AssetGraph::build(&assets, &relationships))
}

/// `GET /relationships/graph` — the full session graph as `{nodes, links}`.
pub async fn graph<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SessionParams>,
) -> Result<Json<GraphExport>, ApiError>
where
  S: InventoryStore,
{
  let session_id = session_or_default(params.session_id);
  let graph = build_graph(store.as_ref(), &session_id).await?;
  Ok(Json(graph.export()))
}

// ─── Impact ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ImpactParams {
  pub session_id: Option<String>,
  /// Maximum BFS depth; defaults to 2.
  pub depth:      Option<u32>,
}

/// `GET /relationships/impact/{asset_id}[?depth=N]`
pub async fn impact<S>(
  State(store): State<Arc<S>>,
  Path(asset_id): Path<i64>,
  Query(params): Query<ImpactParams>,
) -> Result<Json<ImpactReport>, ApiError>
where
  S: InventoryStore,
{
  let depth = params.depth.unwrap_or(2);
  // Out-of-range depth is a caller error, rejected before any store access
  // or graph construction.
  if !IMPACT_DEPTH_RANGE.contains(&depth) {
    return Err(ApiError::BadRequest(format!(
      "depth must be between {} and {}",
      IMPACT_DEPTH_RANGE.start(),
      IMPACT_DEPTH_RANGE.end()
    )));
  }

  let session_id = session_or_default(params.session_id);
  let graph = build_graph(store.as_ref(), &session_id).await?;
  let report = graph.impact(asset_id, depth).map_err(ApiError::from)?;
  Ok(Json(report))
}
