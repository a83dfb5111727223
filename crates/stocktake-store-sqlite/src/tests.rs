//! Integration tests for `SqliteStore` against an in-memory database.

use stocktake_core::{
  DEFAULT_SESSION,
  asset::{AssetPatch, AssetStatus, AssetType, ChangeType, DataClassification, NewAsset},
  relationship::NewRelationship,
  store::{AssetFilter, InventoryStore},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn server(name: &str) -> NewAsset {
  let mut input = NewAsset::new(name, AssetType::Hardware);
  input.sub_type = Some("server".into());
  input
}

// ─── Asset CRUD ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_asset() {
  let s = store().await;

  let asset = s.create_asset(server("SVR-01")).await.unwrap();
  assert_eq!(asset.name, "SVR-01");
  assert_eq!(asset.asset_type, AssetType::Hardware);
  assert_eq!(asset.status, AssetStatus::Active);

  let fetched = s
    .get_asset(asset.id, DEFAULT_SESSION)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.id, asset.id);
  assert_eq!(fetched.name, "SVR-01");
  assert_eq!(fetched.sub_type.as_deref(), Some("server"));
}

#[tokio::test]
async fn get_asset_missing_returns_none() {
  let s = store().await;
  let result = s.get_asset(999, DEFAULT_SESSION).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn create_asset_empty_name_is_rejected() {
  let s = store().await;
  let err = s
    .create_asset(NewAsset::new("  ", AssetType::Software))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::Validation(_)));
}

#[tokio::test]
async fn create_asset_roundtrips_classification() {
  let s = store().await;

  let mut input = NewAsset::new("CUI Share", AssetType::CloudService);
  input.data_classification = Some(DataClassification::Cui);
  input.vendor = Some("Initech".into());

  let asset = s.create_asset(input).await.unwrap();
  let fetched = s
    .get_asset(asset.id, DEFAULT_SESSION)
    .await
    .unwrap()
    .unwrap();

  assert_eq!(fetched.data_classification, Some(DataClassification::Cui));
  assert_eq!(fetched.vendor.as_deref(), Some("Initech"));
}

#[tokio::test]
async fn list_assets_orders_by_name() {
  let s = store().await;
  s.create_asset(server("zulu")).await.unwrap();
  s.create_asset(server("alpha")).await.unwrap();
  s.create_asset(server("mike")).await.unwrap();

  let assets = s
    .list_assets(DEFAULT_SESSION, &AssetFilter::default())
    .await
    .unwrap();
  let names: Vec<&str> = assets.iter().map(|a| a.name.as_str()).collect();
  assert_eq!(names, vec!["alpha", "mike", "zulu"]);
}

#[tokio::test]
async fn list_assets_filters_by_type_and_status() {
  let s = store().await;
  s.create_asset(server("SVR-01")).await.unwrap();
  let mut retired = NewAsset::new("SVR-02", AssetType::Hardware);
  retired.status = AssetStatus::Retired;
  s.create_asset(retired).await.unwrap();
  s.create_asset(NewAsset::new("CRM", AssetType::Software))
    .await
    .unwrap();

  let hardware = s
    .list_assets(DEFAULT_SESSION, &AssetFilter {
      asset_type: Some(AssetType::Hardware),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(hardware.len(), 2);

  let active_hardware = s
    .list_assets(DEFAULT_SESSION, &AssetFilter {
      asset_type: Some(AssetType::Hardware),
      status: Some(AssetStatus::Active),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(active_hardware.len(), 1);
  assert_eq!(active_hardware[0].name, "SVR-01");
}

#[tokio::test]
async fn list_assets_search_matches_name_vendor_and_subtype() {
  let s = store().await;

  let mut input = NewAsset::new("Mail relay", AssetType::Software);
  input.vendor = Some("Postfix Community".into());
  s.create_asset(input).await.unwrap();
  s.create_asset(server("SVR-01")).await.unwrap();

  let by_vendor = s
    .list_assets(DEFAULT_SESSION, &AssetFilter {
      search: Some("postfix".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_vendor.len(), 1);
  assert_eq!(by_vendor[0].name, "Mail relay");

  let by_sub_type = s
    .list_assets(DEFAULT_SESSION, &AssetFilter {
      search: Some("serv".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_sub_type.len(), 1);
  assert_eq!(by_sub_type[0].name, "SVR-01");
}

// ─── Update and audit trail ──────────────────────────────────────────────────

#[tokio::test]
async fn create_logs_a_created_change() {
  let s = store().await;
  let asset = s.create_asset(server("SVR-01")).await.unwrap();

  let changes = s
    .recent_changes(DEFAULT_SESSION, Some(asset.id), 10)
    .await
    .unwrap();
  assert_eq!(changes.len(), 1);
  assert_eq!(changes[0].change_type, ChangeType::Created);
  assert_eq!(changes[0].asset_id, asset.id);
}

#[tokio::test]
async fn update_logs_one_change_per_mutated_field() {
  let s = store().await;
  let asset = s.create_asset(server("SVR-01")).await.unwrap();

  let updated = s
    .update_asset(asset.id, DEFAULT_SESSION, AssetPatch {
      name: Some("SVR-01b".into()),
      status: Some(AssetStatus::Maintenance),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(updated.name, "SVR-01b");
  assert_eq!(updated.status, AssetStatus::Maintenance);

  let changes = s
    .recent_changes(DEFAULT_SESSION, Some(asset.id), 10)
    .await
    .unwrap();
  // created + name update + status change
  assert_eq!(changes.len(), 3);

  let status_row = changes
    .iter()
    .find(|c| c.field_changed.as_deref() == Some("status"))
    .unwrap();
  assert_eq!(status_row.change_type, ChangeType::StatusChange);
  assert_eq!(status_row.old_value.as_deref(), Some("active"));
  assert_eq!(status_row.new_value.as_deref(), Some("maintenance"));

  let name_row = changes
    .iter()
    .find(|c| c.field_changed.as_deref() == Some("name"))
    .unwrap();
  assert_eq!(name_row.change_type, ChangeType::Updated);
  assert_eq!(name_row.new_value.as_deref(), Some("SVR-01b"));
}

#[tokio::test]
async fn update_with_identical_values_logs_nothing() {
  let s = store().await;
  let asset = s.create_asset(server("SVR-01")).await.unwrap();

  s.update_asset(asset.id, DEFAULT_SESSION, AssetPatch {
    name: Some("SVR-01".into()),
    ..Default::default()
  })
  .await
  .unwrap();

  let changes = s
    .recent_changes(DEFAULT_SESSION, Some(asset.id), 10)
    .await
    .unwrap();
  assert_eq!(changes.len(), 1); // only the created row
}

#[tokio::test]
async fn update_missing_asset_errors() {
  let s = store().await;
  let err = s
    .update_asset(999, DEFAULT_SESSION, AssetPatch::default())
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::AssetNotFound(999)));
}

// ─── Delete cascade ──────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_asset_cascades_relationships_and_changes() {
  let s = store().await;
  let svr = s.create_asset(server("SVR-01")).await.unwrap();
  let app = s
    .create_asset(NewAsset::new("CRM", AssetType::Software))
    .await
    .unwrap();
  s.create_relationship(NewRelationship::new(svr.id, app.id, "runs"))
    .await
    .unwrap();
  s.create_relationship(NewRelationship::new(app.id, svr.id, "installed_on"))
    .await
    .unwrap();

  s.delete_asset(svr.id, DEFAULT_SESSION).await.unwrap();

  assert!(s.get_asset(svr.id, DEFAULT_SESSION).await.unwrap().is_none());
  // Relationships in both directions are gone.
  let rels = s.list_relationships(DEFAULT_SESSION).await.unwrap();
  assert!(rels.is_empty());
  // The deleted asset's audit rows are gone too.
  let changes = s
    .recent_changes(DEFAULT_SESSION, Some(svr.id), 10)
    .await
    .unwrap();
  assert!(changes.is_empty());
}

#[tokio::test]
async fn delete_missing_asset_errors() {
  let s = store().await;
  let err = s.delete_asset(42, DEFAULT_SESSION).await.unwrap_err();
  assert!(matches!(err, crate::Error::AssetNotFound(42)));
}

// ─── Relationships ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_list_relationships() {
  let s = store().await;
  let svr = s.create_asset(server("SVR-01")).await.unwrap();
  let app = s
    .create_asset(NewAsset::new("CRM", AssetType::Software))
    .await
    .unwrap();

  let mut input = NewRelationship::new(svr.id, app.id, "runs");
  input.description = Some("production host".into());
  let rel = s.create_relationship(input).await.unwrap();

  assert_eq!(rel.source_asset_id, svr.id);
  assert_eq!(rel.target_asset_id, app.id);

  let rels = s.list_relationships(DEFAULT_SESSION).await.unwrap();
  assert_eq!(rels.len(), 1);
  assert_eq!(rels[0].relationship_type, "runs");
  assert_eq!(rels[0].description.as_deref(), Some("production host"));
}

#[tokio::test]
async fn parallel_edges_are_allowed() {
  let s = store().await;
  let fw = s.create_asset(server("FW-01")).await.unwrap();
  let app = s
    .create_asset(NewAsset::new("CRM", AssetType::Software))
    .await
    .unwrap();

  s.create_relationship(NewRelationship::new(fw.id, app.id, "runs"))
    .await
    .unwrap();
  s.create_relationship(NewRelationship::new(fw.id, app.id, "protects"))
    .await
    .unwrap();

  let rels = s.list_relationships(DEFAULT_SESSION).await.unwrap();
  assert_eq!(rels.len(), 2);
}

#[tokio::test]
async fn create_relationship_missing_endpoint_errors() {
  let s = store().await;
  let svr = s.create_asset(server("SVR-01")).await.unwrap();

  let err = s
    .create_relationship(NewRelationship::new(svr.id, 999, "runs"))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::AssetNotFound(999)));
}

#[tokio::test]
async fn delete_relationship_by_id() {
  let s = store().await;
  let svr = s.create_asset(server("SVR-01")).await.unwrap();
  let app = s
    .create_asset(NewAsset::new("CRM", AssetType::Software))
    .await
    .unwrap();
  let rel = s
    .create_relationship(NewRelationship::new(svr.id, app.id, "runs"))
    .await
    .unwrap();

  s.delete_relationship(rel.id, DEFAULT_SESSION).await.unwrap();
  assert!(s.list_relationships(DEFAULT_SESSION).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_missing_relationship_errors() {
  let s = store().await;
  let err = s.delete_relationship(7, DEFAULT_SESSION).await.unwrap_err();
  assert!(matches!(err, crate::Error::RelationshipNotFound(7)));
}

// ─── Session isolation ───────────────────────────────────────────────────────

#[tokio::test]
async fn sessions_are_isolated() {
  let s = store().await;

  let mut a = server("SVR-A");
  a.session_id = "tenant-a".into();
  let asset_a = s.create_asset(a).await.unwrap();

  let mut b = server("SVR-B");
  b.session_id = "tenant-b".into();
  s.create_asset(b).await.unwrap();

  let listed_a = s
    .list_assets("tenant-a", &AssetFilter::default())
    .await
    .unwrap();
  assert_eq!(listed_a.len(), 1);
  assert_eq!(listed_a[0].name, "SVR-A");

  // Lookup scoped to the wrong session misses.
  assert!(s.get_asset(asset_a.id, "tenant-b").await.unwrap().is_none());

  // Relationships may not cross sessions: the target lives in tenant-b.
  let mut cross = NewRelationship::new(asset_a.id, asset_a.id, "runs");
  cross.session_id = "tenant-b".into();
  let err = s.create_relationship(cross).await.unwrap_err();
  assert!(matches!(err, crate::Error::AssetNotFound(_)));
}

// ─── Tallies ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn tallies_group_by_type_status_and_classification() {
  let s = store().await;
  s.create_asset(server("SVR-01")).await.unwrap();
  s.create_asset(server("SVR-02")).await.unwrap();

  let mut crm = NewAsset::new("CRM", AssetType::Software);
  crm.status = AssetStatus::Retired;
  crm.data_classification = Some(DataClassification::Internal);
  s.create_asset(crm).await.unwrap();

  let tallies = s.asset_tallies(DEFAULT_SESSION).await.unwrap();
  assert_eq!(tallies.total, 3);
  assert_eq!(tallies.active, 2);

  let hardware = tallies
    .by_type
    .iter()
    .find(|(t, _)| *t == AssetType::Hardware)
    .unwrap();
  assert_eq!(hardware.1, 2);

  assert_eq!(tallies.by_classification, vec![(
    DataClassification::Internal,
    1
  )]);
}

#[tokio::test]
async fn tallies_for_empty_session_are_zero() {
  let s = store().await;
  let tallies = s.asset_tallies("empty").await.unwrap();
  assert_eq!(tallies.total, 0);
  assert!(tallies.by_type.is_empty());
}
