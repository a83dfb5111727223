//! JSON REST API for Stocktake.
//!
//! Exposes an axum [`Router`] backed by any
//! [`stocktake_core::store::InventoryStore`]. Transport concerns (TLS,
//! listening sockets) are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", stocktake_api::api_router(store.clone()))
//! ```

pub mod assets;
pub mod dashboard;
pub mod error;
pub mod relationships;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use stocktake_core::{DEFAULT_SESSION, store::InventoryStore};

pub use error::ApiError;

/// Resolve an optional `session_id` query value to a concrete partition key.
/// Empty strings count as absent.
pub(crate) fn session_or_default(session_id: Option<String>) -> String {
  match session_id {
    Some(s) if !s.is_empty() => s,
    _ => DEFAULT_SESSION.to_string(),
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: InventoryStore + 'static,
{
  Router::new()
    // Assets
    .route("/assets", get(assets::list::<S>).post(assets::create::<S>))
    .route(
      "/assets/{id}",
      get(assets::get_one::<S>)
        .put(assets::update::<S>)
        .delete(assets::delete_one::<S>),
    )
    .route("/assets/{id}/changes", get(assets::changes::<S>))
    // Relationships and graph queries
    .route("/relationships", post(relationships::create::<S>))
    .route(
      "/relationships/{id}",
      axum::routing::delete(relationships::delete_one::<S>),
    )
    .route("/relationships/graph", get(relationships::graph::<S>))
    .route(
      "/relationships/impact/{asset_id}",
      get(relationships::impact::<S>),
    )
    // Dashboard
    .route("/dashboard", get(dashboard::summary::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use stocktake_core::{
    asset::{AssetType, NewAsset},
    relationship::NewRelationship,
    store::InventoryStore,
  };
  use stocktake_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  async fn seeded_store() -> Arc<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();

    let svr = store
      .create_asset(NewAsset::new("SVR", AssetType::Hardware))
      .await
      .unwrap();
    let app = store
      .create_asset(NewAsset::new("APP", AssetType::Software))
      .await
      .unwrap();
    let db = store
      .create_asset(NewAsset::new("DB", AssetType::Software))
      .await
      .unwrap();
    store
      .create_asset(NewAsset::new("ISOLATED", AssetType::Network))
      .await
      .unwrap();

    store
      .create_relationship(NewRelationship::new(svr.id, app.id, "runs"))
      .await
      .unwrap();
    store
      .create_relationship(NewRelationship::new(app.id, db.id, "depends_on"))
      .await
      .unwrap();

    Arc::new(store)
  }

  async fn get_json(
    store: Arc<SqliteStore>,
    uri: &str,
  ) -> (StatusCode, serde_json::Value) {
    let response = api_router(store)
      .oneshot(Request::get(uri).body(Body::empty()).unwrap())
      .await
      .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[tokio::test]
  async fn impact_returns_depth_annotated_report() {
    let store = seeded_store().await;
    let (status, body) =
      get_json(store, "/relationships/impact/1?depth=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"]["name"], "SVR");
    assert_eq!(body["depth_limit"], 2);
    assert_eq!(body["impacted_count"], 2);
    assert_eq!(body["impacted"][0]["name"], "APP");
    assert_eq!(body["impacted"][0]["depth"], 1);
    assert_eq!(body["impacted"][1]["name"], "DB");
    assert_eq!(body["impacted"][1]["depth"], 2);
  }

  #[tokio::test]
  async fn impact_depth_out_of_range_is_400() {
    let store = seeded_store().await;

    let (status, body) =
      get_json(store.clone(), "/relationships/impact/1?depth=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("depth"));

    let (status, _) =
      get_json(store, "/relationships/impact/1?depth=11").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn impact_unknown_root_is_404() {
    let store = seeded_store().await;
    let (status, body) =
      get_json(store, "/relationships/impact/999?depth=2").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("999"));
  }

  #[tokio::test]
  async fn graph_export_has_all_nodes_and_links() {
    let store = seeded_store().await;
    let (status, body) = get_json(store, "/relationships/graph").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"].as_array().unwrap().len(), 4);
    assert_eq!(body["links"].as_array().unwrap().len(), 2);
    // Nodes carry the fixed display mapping.
    let svr = &body["nodes"][0];
    assert_eq!(svr["name"], "SVR");
    assert_eq!(svr["type"], "hardware");
    assert_eq!(svr["group"], 1);
    assert_eq!(svr["color"], "#3b82f6");
  }

  #[tokio::test]
  async fn dashboard_reports_orphans_and_tallies() {
    let store = seeded_store().await;
    let (status, body) = get_json(store, "/dashboard").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_assets"], 4);
    assert_eq!(body["active_assets"], 4);
    assert_eq!(body["orphan_assets"], 1);
    assert_eq!(body["recent_changes"].as_array().unwrap().len(), 4);
  }

  #[tokio::test]
  async fn create_relationship_missing_fields_is_400() {
    let store = seeded_store().await;
    let request = Request::post("/relationships")
      .header("content-type", "application/json")
      .body(Body::from(r#"{"source_asset_id": 1}"#))
      .unwrap();

    let response = api_router(store).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("target_asset_id"));
    assert!(message.contains("relationship_type"));
  }

  #[tokio::test]
  async fn delete_relationship_then_404_on_repeat() {
    let store = seeded_store().await;

    let request = Request::delete("/relationships/1").body(Body::empty()).unwrap();
    let response = api_router(store.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::delete("/relationships/1").body(Body::empty()).unwrap();
    let response = api_router(store).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn assets_in_another_session_are_invisible() {
    let store = seeded_store().await;
    let (status, body) =
      get_json(store, "/assets?session_id=other-tenant").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
  }
}
