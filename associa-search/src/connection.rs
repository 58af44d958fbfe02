//! Per-client subscription bookkeeping.
//!
//! A client connection may subscribe to many keywords, but to each keyword at
//! most once at a time. [`ConnectionRegistry::try_add`] hands out a
//! [`SubscriptionGuard`] that owns the slot: dropping it cancels the
//! subscription and frees the slot, whatever path ends the delivery.
//!
//! The registry is generic over the sink type so the transport decides how
//! results reach the client.

use std::fmt;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

use crate::error::SearchError;

/// Identity of one subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionKey {
    /// Client connection identifier.
    pub connection_id: String,
    /// Subscribed keyword.
    pub keyword: String,
}

/// One open (or cancelled, not yet released) subscription.
pub struct Subscription<S> {
    key: SubscriptionKey,
    token: CancellationToken,
    sink: S,
}

impl<S> Subscription<S> {
    /// The (connection, keyword) pair this subscription serves.
    pub fn key(&self) -> &SubscriptionKey {
        &self.key
    }

    /// Where results for this subscription are written.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes once the subscription is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}

impl<S> fmt::Debug for Subscription<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// All subscriptions of all connections.
pub struct ConnectionRegistry<S> {
    entries: DashMap<SubscriptionKey, Arc<Subscription<S>>>,
}

impl<S> Default for ConnectionRegistry<S> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<S> ConnectionRegistry<S> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a subscription for `connection_id` on `keyword`.
    ///
    /// A cancelled entry still occupying the slot is evicted and replaced.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::DuplicateSubscription`] while a live
    /// subscription exists for the same pair.
    pub fn try_add(
        self: &Arc<Self>,
        connection_id: &str,
        keyword: &str,
        sink: S,
    ) -> Result<SubscriptionGuard<S>, SearchError> {
        let key = SubscriptionKey {
            connection_id: connection_id.to_owned(),
            keyword: keyword.to_owned(),
        };
        let subscription = Arc::new(Subscription {
            key: key.clone(),
            token: CancellationToken::new(),
            sink,
        });

        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                if !occupied.get().is_cancelled() {
                    return Err(SearchError::DuplicateSubscription {
                        connection_id: connection_id.to_owned(),
                        keyword: keyword.to_owned(),
                    });
                }
                tracing::debug!(connection_id, "evicting cancelled subscription");
                occupied.insert(Arc::clone(&subscription));
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::clone(&subscription));
            }
        }

        tracing::debug!(connection_id, keyword, "subscription opened");
        Ok(SubscriptionGuard {
            registry: Arc::clone(self),
            subscription,
        })
    }

    /// Remove `subscription`'s slot if it still holds this very subscription.
    pub fn release(&self, subscription: &Arc<Subscription<S>>) -> bool {
        self.entries
            .remove_if(subscription.key(), |_, current| {
                Arc::ptr_eq(current, subscription)
            })
            .is_some()
    }

    /// Cancel the subscription of `connection_id` on `keyword`.
    ///
    /// Returns `true` if a live subscription was cancelled.
    pub fn cancel(&self, connection_id: &str, keyword: &str) -> bool {
        let key = SubscriptionKey {
            connection_id: connection_id.to_owned(),
            keyword: keyword.to_owned(),
        };
        match self.entries.get(&key) {
            Some(subscription) if !subscription.is_cancelled() => {
                subscription.cancel();
                true
            }
            _ => false,
        }
    }

    /// Cancel every live subscription on `keyword`, returning how many.
    pub fn cancel_keyword(&self, keyword: &str) -> usize {
        self.cancel_where(|key| key.keyword == keyword)
    }

    /// Cancel every live subscription, returning how many.
    pub fn cancel_all(&self) -> usize {
        self.cancel_where(|_| true)
    }

    fn cancel_where(&self, matches: impl Fn(&SubscriptionKey) -> bool) -> usize {
        let mut cancelled = 0;
        for entry in self.entries.iter() {
            if matches(entry.key()) && !entry.value().is_cancelled() {
                entry.value().cancel();
                cancelled += 1;
            }
        }
        cancelled
    }

    /// Returns `true` if a live subscription exists for the pair.
    pub fn contains(&self, connection_id: &str, keyword: &str) -> bool {
        let key = SubscriptionKey {
            connection_id: connection_id.to_owned(),
            keyword: keyword.to_owned(),
        };
        self.entries
            .get(&key)
            .is_some_and(|subscription| !subscription.is_cancelled())
    }

    /// Number of occupied slots, including cancelled ones not yet released.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S> fmt::Debug for ConnectionRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("subscriptions", &self.entries.len())
            .finish()
    }
}

/// Owns one registry slot. Cancels and releases the subscription on drop.
pub struct SubscriptionGuard<S> {
    registry: Arc<ConnectionRegistry<S>>,
    subscription: Arc<Subscription<S>>,
}

impl<S> SubscriptionGuard<S> {
    /// The guarded subscription.
    pub fn subscription(&self) -> &Arc<Subscription<S>> {
        &self.subscription
    }
}

impl<S> std::ops::Deref for SubscriptionGuard<S> {
    type Target = Subscription<S>;

    fn deref(&self) -> &Self::Target {
        &self.subscription
    }
}

impl<S> Drop for SubscriptionGuard<S> {
    fn drop(&mut self) {
        self.subscription.cancel();
        if self.registry.release(&self.subscription) {
            tracing::debug!(
                connection_id = %self.subscription.key.connection_id,
                "subscription released"
            );
        }
    }
}

impl<S> fmt::Debug for SubscriptionGuard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SubscriptionGuard")
            .field(&self.subscription)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::time::Duration;

    fn registry() -> Arc<ConnectionRegistry<()>> {
        Arc::new(ConnectionRegistry::new())
    }

    #[test]
    fn duplicate_rejected_while_open() {
        let registry = registry();
        let _guard = registry.try_add("c1", "rust", ()).expect("first add");

        let err = registry.try_add("c1", "rust", ()).unwrap_err();
        assert!(matches!(
            err,
            SearchError::DuplicateSubscription { ref connection_id, ref keyword }
                if connection_id == "c1" && keyword == "rust"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn same_connection_different_keywords_allowed() {
        let registry = registry();
        let _a = registry.try_add("c1", "rust", ()).expect("rust");
        let _b = registry.try_add("c1", "go", ()).expect("go");
        let _c = registry.try_add("c2", "rust", ()).expect("other connection");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn readd_after_cancel_and_release() {
        let registry = registry();
        let guard = registry.try_add("c1", "rust", ()).expect("first add");
        assert!(registry.try_add("c1", "rust", ()).is_err());

        drop(guard);
        assert!(registry.is_empty());

        let _again = registry.try_add("c1", "rust", ()).expect("re-add");
        assert!(registry.contains("c1", "rust"));
    }

    #[test]
    fn cancelled_entry_is_evicted_by_new_add() {
        let registry = registry();
        let stale = registry.try_add("c1", "rust", ()).expect("first add");
        assert!(registry.cancel("c1", "rust"));

        let fresh = registry.try_add("c1", "rust", ()).expect("evicts cancelled");
        assert!(!fresh.is_cancelled());

        // The stale guard must not free the slot now owned by `fresh`.
        drop(stale);
        assert!(registry.contains("c1", "rust"));
        drop(fresh);
        assert!(registry.is_empty());
    }

    #[test]
    fn guard_drop_cancels_subscription() {
        let registry = registry();
        let guard = registry.try_add("c1", "rust", ()).expect("add");
        let subscription = Arc::clone(guard.subscription());

        drop(guard);
        assert!(subscription.is_cancelled());
    }

    #[test]
    fn cancel_is_idempotent() {
        let registry = registry();
        let guard = registry.try_add("c1", "rust", ()).expect("add");

        assert!(registry.cancel("c1", "rust"));
        assert!(!registry.cancel("c1", "rust"));
        guard.cancel();
        assert!(guard.is_cancelled());
        assert!(!registry.cancel("c9", "missing"));
    }

    #[test]
    fn cancel_keyword_and_all() {
        let registry = registry();
        let a = registry.try_add("c1", "rust", ()).expect("a");
        let b = registry.try_add("c2", "rust", ()).expect("b");
        let c = registry.try_add("c1", "go", ()).expect("c");

        assert_eq!(registry.cancel_keyword("rust"), 2);
        assert!(a.is_cancelled() && b.is_cancelled());
        assert!(!c.is_cancelled());

        assert_eq!(registry.cancel_all(), 1);
        assert!(c.is_cancelled());
        assert_eq!(registry.cancel_all(), 0);
    }

    #[tokio::test]
    async fn cancelled_future_completes_across_tasks() {
        let registry = registry();
        let guard = registry.try_add("c1", "rust", ()).expect("add");
        let subscription = Arc::clone(guard.subscription());

        let waiter = tokio::spawn(async move { subscription.cancelled().await });
        registry.cancel("c1", "rust");

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("cancellation observed")
            .expect("task should not panic");
    }

    #[test]
    fn sink_is_reachable() {
        let registry: Arc<ConnectionRegistry<u32>> = Arc::new(ConnectionRegistry::new());
        let guard = registry.try_add("c1", "rust", 7).expect("add");
        assert_eq!(*guard.sink(), 7);
        assert_eq!(guard.key().keyword, "rust");
    }
}
