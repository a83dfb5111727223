//! Core types and trait definitions for the Stocktake asset inventory.
//!
//! Everything here is transport- and storage-agnostic: the record types,
//! the [`store::InventoryStore`] trait, and the in-memory graph engine.
//! Every other Stocktake crate depends on this one.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod asset;
pub mod error;
pub mod graph;
pub mod relationship;
pub mod store;

pub use error::{Error, Result};

/// The session every record and query falls into when none is given.
///
/// A session is a tenant-isolation key, never an optional filter: store
/// queries and graph operations always run against exactly one session.
pub const DEFAULT_SESSION: &str = "__default__";
