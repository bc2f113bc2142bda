//! Monitoring Registry
//!
//! Many-to-many mapping from watched deployer addresses to notification
//! targets. Process-local and in-memory: subscriptions are lost on restart.
//!
//! Every write to an address's subscriber set happens under that address's
//! shard lock (`DashMap::entry`), so concurrent subscribes for the same
//! address never lose an update.

use alloy_primitives::Address;
use dashmap::DashMap;
use std::collections::HashSet;
use tracing::{debug, info};

/// Watched address → notification target ids
#[derive(Default)]
pub struct MonitoringRegistry {
    subscriptions: DashMap<Address, HashSet<String>>,
}

impl MonitoringRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `target` to `address`'s subscribers.
    ///
    /// Idempotent. Returns `true` only when the pair was not present before.
    pub fn subscribe(&self, address: Address, target: impl Into<String>) -> bool {
        let target = target.into();
        let added = self
            .subscriptions
            .entry(address)
            .or_default()
            .insert(target.clone());

        if added {
            info!(deployer = %address, subscriber = %target, "👁️ Subscription added");
        } else {
            debug!(deployer = %address, subscriber = %target, "Subscription already present");
        }
        added
    }

    /// Snapshot of `address`'s subscribers; empty when nobody watches it
    pub fn list_subscribers(&self, address: Address) -> HashSet<String> {
        self.subscriptions
            .get(&address)
            .map(|targets| targets.clone())
            .unwrap_or_default()
    }

    /// Remove one pair. Returns `true` if it existed.
    pub fn unsubscribe(&self, address: Address, target: &str) -> bool {
        let removed = match self.subscriptions.get_mut(&address) {
            Some(mut targets) => targets.remove(target),
            None => false,
        };
        // Drop the key once its set is empty; re-checked under the shard lock
        self.subscriptions
            .remove_if(&address, |_, targets| targets.is_empty());

        if removed {
            info!(deployer = %address, subscriber = %target, "Subscription removed");
        }
        removed
    }

    /// Number of addresses with at least one subscriber
    pub fn watched_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Total (address, target) pairs
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.iter().map(|entry| entry.value().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::parse_address;
    use std::sync::Arc;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn test_subscribe_is_idempotent() {
        let registry = MonitoringRegistry::new();
        assert!(registry.subscribe(addr(1), "42"));
        assert!(!registry.subscribe(addr(1), "42"));
        assert_eq!(registry.list_subscribers(addr(1)).len(), 1);
    }

    #[test]
    fn test_unknown_address_has_no_subscribers() {
        let registry = MonitoringRegistry::new();
        assert!(registry.list_subscribers(addr(9)).is_empty());
        assert_eq!(registry.watched_count(), 0);
    }

    #[test]
    fn test_address_case_does_not_split_sets() {
        let registry = MonitoringRegistry::new();
        let lower = parse_address("0xabcdef0123456789abcdef0123456789abcdef01").unwrap();
        let mixed = parse_address("0xABCDEF0123456789abcdef0123456789ABCDEF01").unwrap();
        registry.subscribe(lower, "a");
        registry.subscribe(mixed, "b");
        assert_eq!(registry.watched_count(), 1);
        assert_eq!(registry.list_subscribers(lower).len(), 2);
    }

    #[test]
    fn test_many_to_many() {
        let registry = MonitoringRegistry::new();
        registry.subscribe(addr(1), "a");
        registry.subscribe(addr(1), "b");
        registry.subscribe(addr(2), "a");
        assert_eq!(registry.watched_count(), 2);
        assert_eq!(registry.subscription_count(), 3);
        assert!(registry.list_subscribers(addr(2)).contains("a"));
    }

    #[test]
    fn test_unsubscribe() {
        let registry = MonitoringRegistry::new();
        registry.subscribe(addr(1), "a");
        assert!(!registry.unsubscribe(addr(1), "zzz"));
        assert!(registry.unsubscribe(addr(1), "a"));
        assert!(!registry.unsubscribe(addr(1), "a"));
        assert_eq!(registry.watched_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_subscribes_lose_nothing() {
        let registry = Arc::new(MonitoringRegistry::new());
        let handles: Vec<_> = (0..64)
            .map(|i| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.subscribe(addr(7), format!("target-{}", i)) })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap());
        }
        assert_eq!(registry.list_subscribers(addr(7)).len(), 64);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_subscribes_added_once() {
        let registry = Arc::new(MonitoringRegistry::new());
        let handles: Vec<_> = (0..32)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.subscribe(addr(3), "same") })
            })
            .collect();

        let mut newly_added = 0;
        for handle in handles {
            if handle.await.unwrap() {
                newly_added += 1;
            }
        }
        assert_eq!(newly_added, 1);
        assert_eq!(registry.list_subscribers(addr(3)).len(), 1);
    }
}
