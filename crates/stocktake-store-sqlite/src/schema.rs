//! SQL schema for the Stocktake SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Every row is partitioned by session_id; queries never span sessions.
CREATE TABLE IF NOT EXISTS assets (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id          TEXT NOT NULL DEFAULT '__default__',
    asset_type          TEXT NOT NULL,   -- hardware | software | cloud_service | license | network | contract
    sub_type            TEXT,
    name                TEXT NOT NULL,
    description         TEXT,
    status              TEXT NOT NULL DEFAULT 'active',
    data_classification TEXT,            -- CUI | FCI | public | internal
    vendor              TEXT,
    created_at          TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    updated_at          TEXT NOT NULL
);

-- Directed edges. No uniqueness constraint: parallel edges between the same
-- pair with different types are meaningful.
CREATE TABLE IF NOT EXISTS asset_relationships (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id        TEXT NOT NULL DEFAULT '__default__',
    source_asset_id   INTEGER NOT NULL REFERENCES assets(id),
    target_asset_id   INTEGER NOT NULL REFERENCES assets(id),
    relationship_type TEXT NOT NULL,
    description       TEXT,
    created_at        TEXT NOT NULL
);

-- Append-only audit trail; removed only when the owning asset is deleted.
CREATE TABLE IF NOT EXISTS asset_changes (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id    TEXT NOT NULL DEFAULT '__default__',
    asset_id      INTEGER NOT NULL REFERENCES assets(id),
    change_type   TEXT NOT NULL,   -- created | updated | status_change
    field_changed TEXT,
    old_value     TEXT,
    new_value     TEXT,
    notes         TEXT,
    changed_by    TEXT NOT NULL DEFAULT 'system',
    changed_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS assets_session_idx  ON assets(session_id);
CREATE INDEX IF NOT EXISTS rels_session_idx    ON asset_relationships(session_id);
CREATE INDEX IF NOT EXISTS rels_source_idx     ON asset_relationships(source_asset_id);
CREATE INDEX IF NOT EXISTS rels_target_idx     ON asset_relationships(target_asset_id);
CREATE INDEX IF NOT EXISTS changes_session_idx ON asset_changes(session_id);
CREATE INDEX IF NOT EXISTS changes_asset_idx   ON asset_changes(asset_id);

PRAGMA user_version = 1;
";
