//! Operation-level view of the store consumed by the HTTP handlers and the
//! stats reporter.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::counter::RequestCounter;
use crate::store::Store;

/// Snapshot of service usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Stats {
    pub total_requests: u64,
    pub database_size: usize,
}

/// Store plus request accounting.
///
/// Every public operation except [`DataService::current_stats`] counts as one
/// request, and the increment happens before the store is touched.
pub struct DataService {
    store: Store,
    requests: RequestCounter,
}

impl DataService {
    pub fn new() -> Self {
        Self {
            store: Store::new(),
            requests: RequestCounter::new(),
        }
    }

    /// Insert or overwrite a key
    pub fn save(&self, key: String, value: String) {
        self.requests.increment();
        self.store.set(key, value);
    }

    /// Look up a single key
    pub fn get(&self, key: &str) -> Option<String> {
        self.requests.increment();
        self.store.get(key)
    }

    /// Snapshot of every stored entry
    pub fn get_all(&self) -> HashMap<String, String> {
        self.requests.increment();
        self.store.get_all()
    }

    /// Remove a key; `false` when it was not present
    pub fn delete(&self, key: &str) -> bool {
        self.requests.increment();
        self.store.delete(key)
    }

    /// Usage statistics. The call itself is included in `total_requests`.
    pub fn stats(&self) -> Stats {
        self.requests.increment();
        self.current_stats()
    }

    /// Usage statistics without counting a request.
    pub fn current_stats(&self) -> Stats {
        Stats {
            total_requests: self.requests.load(),
            database_size: self.store.size(),
        }
    }
}

impl Default for DataService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kv(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_save_list_delete_scenario() {
        let service = DataService::new();
        service.save("a".to_string(), "1".to_string());
        service.save("b".to_string(), "2".to_string());
        assert_eq!(service.get_all(), kv(&[("a", "1"), ("b", "2")]));

        assert!(service.delete("a"));
        assert_eq!(service.get_all(), kv(&[("b", "2")]));
        assert_eq!(service.current_stats().database_size, 1);
        assert!(!service.delete("a"));
    }

    #[test]
    fn test_stats_counts_itself() {
        let service = DataService::new();
        assert_eq!(
            service.stats(),
            Stats {
                total_requests: 1,
                database_size: 0
            }
        );

        service.save("k".to_string(), "v".to_string());
        assert_eq!(
            service.stats(),
            Stats {
                total_requests: 3,
                database_size: 1
            }
        );
    }

    #[test]
    fn test_current_stats_does_not_count() {
        let service = DataService::new();
        service.save("k".to_string(), "v".to_string());
        let before = service.current_stats().total_requests;

        for _ in 0..25 {
            service.current_stats();
        }
        assert_eq!(service.current_stats().total_requests, before);

        for _ in 0..25 {
            service.stats();
        }
        assert_eq!(service.current_stats().total_requests, before + 25);
    }

    #[test]
    fn test_every_operation_counts_once() {
        let service = DataService::new();
        service.save("k".to_string(), "v".to_string());
        service.get("k");
        service.get("missing");
        service.get_all();
        service.delete("k");
        service.delete("k");
        assert_eq!(service.current_stats().total_requests, 6);
    }

    #[test]
    fn test_get_single_key() {
        let service = DataService::new();
        assert_eq!(service.get("k"), None);
        service.save("k".to_string(), "v".to_string());
        assert_eq!(service.get("k"), Some("v".to_string()));
    }
}
