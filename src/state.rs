//! Per-group duplicate-tracking state.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::segment::MessageChain;

/// Mutable record for one conversation group.
///
/// Owned exclusively by [`GroupStateStore`]; callers only ever see it
/// through the store's per-group lock.
#[derive(Debug)]
pub struct GroupState {
    /// Group this record belongs to.
    pub group_id: String,
    /// Last chain that survived the full pipeline for this group.
    pub last_chain: MessageChain,
    /// When `last_chain` was last committed.
    pub updated_at: DateTime<Utc>,
}

impl GroupState {
    pub(crate) fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            last_chain: MessageChain::default(),
            updated_at: Utc::now(),
        }
    }

    /// Exact structural comparison against the last committed chain.
    pub fn is_duplicate(&self, candidate: &MessageChain) -> bool {
        self.last_chain == *candidate
    }

    /// Record a chain that survived the full pipeline.
    pub fn commit(&mut self, chain: MessageChain) {
        self.last_chain = chain;
        self.updated_at = Utc::now();
    }
}

/// Owner of all per-group state.
///
/// One lazily created record per group id, each behind its own lock, so
/// events for different groups never contend. The map itself is locked only
/// long enough to fetch or insert a record handle, which makes first access
/// for an unseen group id race-free: two concurrent events cannot mint two
/// distinct locks for the same id.
///
/// Records live for the lifetime of the store (bounded by distinct group-id
/// cardinality); nothing is persisted across restarts.
#[derive(Debug, Default)]
pub struct GroupStateStore {
    groups: Mutex<HashMap<String, Arc<Mutex<GroupState>>>>,
}

impl GroupStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the state handle for a group, creating it on first access.
    ///
    /// Idempotent: every caller gets a handle to the same record. Holding
    /// the returned lock across a whole pipeline run serializes same-group
    /// events in acquisition order and makes the duplicate check plus the
    /// eventual commit one critical section.
    pub async fn get(&self, group_id: &str) -> Arc<Mutex<GroupState>> {
        let mut groups = self.groups.lock().await;
        groups
            .entry(group_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(GroupState::new(group_id))))
            .clone()
    }

    /// Number of groups seen so far.
    pub async fn group_count(&self) -> usize {
        self.groups.lock().await.len()
    }
}
