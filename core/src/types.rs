//! Shared primitive types used across the crate.

use serde_json::{Map, Value};

/// Externally issued user identifier (the auth provider's user id).
pub type ClerkUserId = String;

/// UUID v4 text identifying an account.
pub type AccountId = String;

/// UUID v4 text identifying a position.
pub type PositionId = String;

/// One result row from `AlexStore::query`, keyed by column name.
pub type Row = Map<String, Value>;

/// Tables removed by the drop step, dependents first.
pub const TABLES_TO_DROP: [&str; 5] = ["positions", "accounts", "jobs", "instruments", "users"];

/// Tables counted by the verification report, in print order.
pub const TABLES_TO_VERIFY: [&str; 5] = ["users", "instruments", "accounts", "positions", "jobs"];

/// Tables that carry an `update_<table>_updated_at` trigger.
pub const TIMESTAMPED_TABLES: [&str; 5] = ["users", "instruments", "accounts", "positions", "jobs"];
