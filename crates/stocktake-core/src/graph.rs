//! The relationship graph engine.
//!
//! An [`AssetGraph`] is an ephemeral, per-query view of one session's assets
//! and relationships: an explicit adjacency structure rather than a
//! general-purpose graph library, since only bounded BFS, degree counting,
//! and a flat projection are ever needed. It is rebuilt fresh from store
//! records on every call and discarded afterwards — it is never the source
//! of truth and is never mutated.

use std::collections::{BTreeMap, HashMap, VecDeque};

use serde::Serialize;

use crate::{
  Error, Result,
  asset::{Asset, AssetStatus, AssetType, DataClassification},
  relationship::AssetRelationship,
};

/// Inclusive bounds on the `max_depth` argument of [`AssetGraph::impact`].
/// Enforced by callers before the engine is invoked; the engine itself is
/// total for any depth and correct at both boundary values.
pub const IMPACT_DEPTH_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

// ─── Display mappings ────────────────────────────────────────────────────────

/// Fixed display group per asset type, used by graph visualisations.
pub fn display_group(asset_type: AssetType) -> u32 {
  match asset_type {
    AssetType::Hardware => 1,
    AssetType::Software => 2,
    AssetType::CloudService => 3,
    AssetType::License => 4,
    AssetType::Network => 5,
    AssetType::Contract => 6,
  }
}

/// Fixed display color per asset type, used by graph visualisations.
pub fn display_color(asset_type: AssetType) -> &'static str {
  match asset_type {
    AssetType::Hardware => "#3b82f6",
    AssetType::Software => "#10b981",
    AssetType::CloudService => "#8b5cf6",
    AssetType::License => "#f59e0b",
    AssetType::Network => "#ef4444",
    AssetType::Contract => "#6366f1",
  }
}

// ─── Graph structure ─────────────────────────────────────────────────────────

/// A node: the graph-relevant attributes of one asset, copied from the
/// underlying record at build time.
#[derive(Debug, Clone, Serialize)]
pub struct AssetNode {
  pub id:                  i64,
  pub name:                String,
  pub asset_type:          AssetType,
  pub sub_type:            Option<String>,
  pub status:              AssetStatus,
  pub data_classification: Option<DataClassification>,
}

/// An edge: one directed relationship, copied from the underlying record.
#[derive(Debug, Clone)]
pub struct GraphEdge {
  pub id:                i64,
  pub source:            i64,
  pub target:            i64,
  pub relationship_type: String,
  pub description:       Option<String>,
}

/// One session's assets and relationships as a directed graph.
///
/// Nodes are keyed in a `BTreeMap` so iteration order (and therefore orphan
/// ordering) is deterministic: ascending asset id. The node set always
/// includes zero-edge assets.
#[derive(Debug, Default)]
pub struct AssetGraph {
  nodes:    BTreeMap<i64, AssetNode>,
  edges:    Vec<GraphEdge>,
  /// Node id → indexes into `edges` whose source is that node.
  outgoing: HashMap<i64, Vec<usize>>,
  /// Node id → in-degree + out-degree.
  degree:   HashMap<i64, usize>,
}

impl AssetGraph {
  /// Build a graph from one session's records. No filtering, no
  /// deduplication of parallel edges; attributes are copied verbatim.
  pub fn build(assets: &[Asset], relationships: &[AssetRelationship]) -> Self {
    let mut graph = Self::default();

    for asset in assets {
      graph.nodes.insert(asset.id, AssetNode {
        id:                  asset.id,
        name:                asset.name.clone(),
        asset_type:          asset.asset_type,
        sub_type:            asset.sub_type.clone(),
        status:              asset.status,
        data_classification: asset.data_classification,
      });
    }

    for rel in relationships {
      let index = graph.edges.len();
      graph.edges.push(GraphEdge {
        id:                rel.id,
        source:            rel.source_asset_id,
        target:            rel.target_asset_id,
        relationship_type: rel.relationship_type.clone(),
        description:       rel.description.clone(),
      });
      graph
        .outgoing
        .entry(rel.source_asset_id)
        .or_default()
        .push(index);
      *graph.degree.entry(rel.source_asset_id).or_default() += 1;
      *graph.degree.entry(rel.target_asset_id).or_default() += 1;
    }

    graph
  }

  pub fn node_count(&self) -> usize { self.nodes.len() }

  pub fn edge_count(&self) -> usize { self.edges.len() }

  // ─── Impact analysis ───────────────────────────────────────────────────────

  /// Downstream impact analysis: bounded BFS from `root_id` strictly along
  /// outgoing edges.
  ///
  /// Each node is visited at most once; its depth is fixed the first time
  /// it is enqueued (shortest hop count from the root). Nodes at exactly
  /// `max_depth` are included but not expanded. The root itself is excluded
  /// from the impacted list, which is sorted ascending by `(depth, name)`
  /// with a case-sensitive byte-order name tie-break.
  pub fn impact(&self, root_id: i64, max_depth: u32) -> Result<ImpactReport> {
    let root = self
      .nodes
      .get(&root_id)
      .ok_or(Error::AssetNotFound(root_id))?;

    let mut visited: HashMap<i64, u32> = HashMap::new();
    let mut queue: VecDeque<(i64, u32)> = VecDeque::new();
    queue.push_back((root_id, 0));

    while let Some((current, depth)) = queue.pop_front() {
      if visited.contains_key(&current) {
        continue;
      }
      visited.insert(current, depth);

      if depth < max_depth {
        for &index in self.outgoing.get(&current).into_iter().flatten() {
          let target = self.edges[index].target;
          // Parallel edges reach the same target more than once; the
          // visited check keeps its first-discovery depth.
          if !visited.contains_key(&target) && self.nodes.contains_key(&target)
          {
            queue.push_back((target, depth + 1));
          }
        }
      }
    }

    let mut impacted: Vec<ImpactedAsset> = visited
      .iter()
      .filter(|(id, _)| **id != root_id)
      .map(|(id, depth)| {
        let node = &self.nodes[id];
        ImpactedAsset {
          id:         node.id,
          name:       node.name.clone(),
          asset_type: node.asset_type,
          status:     node.status,
          depth:      *depth,
        }
      })
      .collect();

    impacted.sort_by(|a, b| {
      a.depth.cmp(&b.depth).then_with(|| a.name.cmp(&b.name))
    });

    Ok(ImpactReport {
      source:         ImpactSource {
        id:         root.id,
        name:       root.name.clone(),
        asset_type: root.asset_type,
      },
      depth_limit:    max_depth,
      impacted_count: impacted.len(),
      impacted,
    })
  }

  // ─── Orphan detection ──────────────────────────────────────────────────────

  /// Assets with total degree (in + out) exactly zero, in ascending-id
  /// order.
  pub fn orphans(&self) -> Vec<&AssetNode> {
    self
      .nodes
      .values()
      .filter(|node| self.degree.get(&node.id).copied().unwrap_or(0) == 0)
      .collect()
  }

  // ─── Export ────────────────────────────────────────────────────────────────

  /// The full node/edge set as a visualisation-ready projection. Pure
  /// projection: no traversal, no deduplication, no pagination.
  pub fn export(&self) -> GraphExport {
    let nodes = self
      .nodes
      .values()
      .map(|node| ExportNode {
        id:                  node.id,
        name:                node.name.clone(),
        asset_type:          node.asset_type,
        sub_type:            node.sub_type.clone(),
        status:              node.status,
        group:               display_group(node.asset_type),
        color:               display_color(node.asset_type),
        data_classification: node.data_classification,
      })
      .collect();

    let links = self
      .edges
      .iter()
      .map(|edge| ExportLink {
        source:            edge.source,
        target:            edge.target,
        relationship_type: edge.relationship_type.clone(),
        description:       edge.description.clone(),
        id:                edge.id,
      })
      .collect();

    GraphExport { nodes, links }
  }
}

// ─── Result shapes ───────────────────────────────────────────────────────────

/// Summary of the root asset an impact query started from.
#[derive(Debug, Clone, Serialize)]
pub struct ImpactSource {
  pub id:         i64,
  pub name:       String,
  pub asset_type: AssetType,
}

/// One asset reached by the impact traversal, with its hop distance.
#[derive(Debug, Clone, Serialize)]
pub struct ImpactedAsset {
  pub id:         i64,
  pub name:       String,
  pub asset_type: AssetType,
  pub status:     AssetStatus,
  pub depth:      u32,
}

/// The full impact report returned by [`AssetGraph::impact`].
#[derive(Debug, Clone, Serialize)]
pub struct ImpactReport {
  pub source:         ImpactSource,
  pub depth_limit:    u32,
  pub impacted_count: usize,
  pub impacted:       Vec<ImpactedAsset>,
}

/// The visualisation-ready projection returned by [`AssetGraph::export`].
#[derive(Debug, Clone, Serialize)]
pub struct GraphExport {
  pub nodes: Vec<ExportNode>,
  pub links: Vec<ExportLink>,
}

/// A node in the exported graph. `type` is the asset type's snake_case tag.
#[derive(Debug, Clone, Serialize)]
pub struct ExportNode {
  pub id:                  i64,
  pub name:                String,
  #[serde(rename = "type")]
  pub asset_type:          AssetType,
  pub sub_type:            Option<String>,
  pub status:              AssetStatus,
  pub group:               u32,
  pub color:               &'static str,
  pub data_classification: Option<DataClassification>,
}

/// A link in the exported graph. `type` is the free-form relationship type.
#[derive(Debug, Clone, Serialize)]
pub struct ExportLink {
  pub source:            i64,
  pub target:            i64,
  #[serde(rename = "type")]
  pub relationship_type: String,
  pub description:       Option<String>,
  pub id:                i64,
}

// ─── Tests ───────────────────────────────────────────────────────────────────
