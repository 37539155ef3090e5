//! In-memory session store
//!
//! One record per logged-in client, keyed by client id. Records are
//! overwritten on re-authentication, have their token pair replaced on
//! refresh, and are removed on logout. There is no expiry sweeping:
//! stale records live until explicit logout or process exit.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Broker session tokens for a single client
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub client_id: String,
    pub api_key: String,
    pub jwt_token: String,
    pub feed_token: String,
    pub refresh_token: String,
    pub created_at: DateTime<Utc>,
}

/// Session store seam. Handlers only ever see this interface, so the
/// in-process map can be swapped for an external store without touching
/// handler logic.
pub trait SessionStore: Send + Sync {
    /// Insert or overwrite the record for `record.client_id`.
    fn put(&self, record: SessionRecord);

    fn get(&self, client_id: &str) -> Option<SessionRecord>;

    /// Remove the record. No-op when absent.
    fn delete(&self, client_id: &str);
}

/// Concurrency-safe in-memory backing. Handlers run on parallel tokio
/// workers, so two requests for the same client (e.g. concurrent
/// refreshes) may race; updates are last-writer-wins.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    records: DashMap<String, SessionRecord>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn put(&self, record: SessionRecord) {
        self.records.insert(record.client_id.clone(), record);
    }

    fn get(&self, client_id: &str) -> Option<SessionRecord> {
        self.records.get(client_id).map(|r| r.clone())
    }

    fn delete(&self, client_id: &str) {
        self.records.remove(client_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(client_id: &str, jwt: &str) -> SessionRecord {
        SessionRecord {
            client_id: client_id.to_string(),
            api_key: "key".to_string(),
            jwt_token: jwt.to_string(),
            feed_token: "feed".to_string(),
            refresh_token: "refresh".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_put_then_get_returns_record() {
        let store = InMemorySessionStore::new();
        store.put(record("A100", "jwt-1"));

        let found = store.get("A100").expect("record should exist");
        assert_eq!(found.client_id, "A100");
        assert_eq!(found.jwt_token, "jwt-1");
        assert_eq!(found.feed_token, "feed");
    }

    #[test]
    fn test_put_overwrites_existing_record() {
        let store = InMemorySessionStore::new();
        store.put(record("A100", "jwt-1"));
        store.put(record("A100", "jwt-2"));

        let found = store.get("A100").expect("record should exist");
        assert_eq!(found.jwt_token, "jwt-2");
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store = InMemorySessionStore::new();
        assert!(store.get("nobody").is_none());
    }

    #[test]
    fn test_delete_removes_record() {
        let store = InMemorySessionStore::new();
        store.put(record("A100", "jwt-1"));
        store.delete("A100");
        assert!(store.get("A100").is_none());
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let store = InMemorySessionStore::new();
        store.delete("nobody");
    }
}
