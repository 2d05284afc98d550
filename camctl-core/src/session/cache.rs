//! Per-address session cache
//!
//! Sessions are stored behind `Arc`, so a replacement swaps a pointer and a
//! reader holding the previous session keeps a complete, consistent value.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::state::Session;

/// Maps an address key to its current session
#[derive(Default)]
pub struct SessionCache {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the session for an address key
    pub async fn get(&self, key: &str) -> Option<Arc<Session>> {
        self.sessions.read().await.get(key).cloned()
    }

    /// Insert or replace the session for its own address
    ///
    /// Returns the session that was replaced, if any. Last writer wins.
    pub async fn put(&self, session: Arc<Session>) -> Option<Arc<Session>> {
        let key = session.address().key();
        self.sessions.write().await.insert(key, session)
    }

    /// Snapshot of every cached session
    pub async fn sessions(&self) -> Vec<Arc<Session>> {
        self.sessions.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
