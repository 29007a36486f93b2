//! Boundary records for the hosted progress/achievement collaborator.
//!
//! The engine never talks to a backend directly; platform layers implement
//! [`ProgressStore`](crate::ProgressStore) over these records.

use serde::{Deserialize, Serialize};

/// One completion mark for a scenario. Upserts are idempotent per
/// `(user_id, scenario_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub user_id: String,
    pub scenario_id: String,
    pub completed: bool,
    /// Unix timestamp (seconds) supplied by the caller.
    pub completed_at: i64,
}

/// One achievement grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeRecord {
    pub user_id: String,
    pub badge_id: String,
}
