//! Subscription delivery loop.
//!
//! [`SubscriptionDelivery`] runs one open subscription: it sends the current
//! result for the keyword, then forwards every change until the subscription
//! is cancelled or the client stops reading.
//!
//! # Design
//!
//! Changes made by this process arrive through the orchestrator's per-keyword
//! watch channel. A poll tick re-reads the cache store as well, so entries
//! written by another process sharing the store still reach the client
//! within one interval. Consecutive identical entries are sent once.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::connection::SubscriptionGuard;
use crate::orchestrator::SearchOrchestrator;
use crate::types::SearchResultCache;

/// One message for a subscribed client.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// The current result for the keyword.
    Result(Arc<SearchResultCache>),
    /// The lookup failed; later updates may still follow.
    Failed(String),
}

/// Channel end a delivery loop writes into.
pub type DeliverySink = mpsc::Sender<Delivery>;

/// Drives one subscription until it ends.
pub struct SubscriptionDelivery {
    orchestrator: Arc<SearchOrchestrator>,
    guard: SubscriptionGuard<DeliverySink>,
    poll_interval: Duration,
}

impl SubscriptionDelivery {
    /// Create a delivery for an open subscription.
    ///
    /// The poll interval is taken from the orchestrator's configuration.
    pub fn new(
        orchestrator: Arc<SearchOrchestrator>,
        guard: SubscriptionGuard<DeliverySink>,
    ) -> Self {
        let poll_interval = Duration::from_millis(orchestrator.config().poll_interval_ms);
        Self {
            orchestrator,
            guard,
            poll_interval,
        }
    }

    /// Override the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Run until cancelled or the client is gone.
    ///
    /// Intended to be spawned; dropping the returned future mid-way is also
    /// safe, the subscription guard frees the registry slot either way.
    ///
    /// ```rust,ignore
    /// let guard = connections.try_add(&connection_id, &keyword, tx)?;
    /// tokio::spawn(SubscriptionDelivery::new(orchestrator, guard).run());
    /// ```
    pub async fn run(self) {
        let keyword = self.guard.key().keyword.clone();
        let sink = self.guard.sink().clone();

        // Subscribe before the first lookup so no update can slip between them.
        let mut updates = self.orchestrator.subscribe(&keyword);
        let mut last: Option<Arc<SearchResultCache>> = None;

        let first = match self.orchestrator.get_result(&keyword).await {
            Ok(entry) => {
                let entry = Arc::new(entry);
                last = Some(Arc::clone(&entry));
                Delivery::Result(entry)
            }
            Err(err) => {
                warn!(error = %err, "subscription lookup failed");
                Delivery::Failed(err.to_string())
            }
        };

        if self.send(&sink, first).await {
            let mut ticker = tokio::time::interval(self.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                let next = tokio::select! {
                    _ = self.guard.cancelled() => {
                        debug!("subscription cancelled");
                        break;
                    }
                    _ = sink.closed() => {
                        debug!("subscriber disconnected");
                        break;
                    }
                    changed = updates.changed() => match changed {
                        Ok(()) => updates.borrow_and_update().clone(),
                        Err(_) => {
                            updates = self.orchestrator.subscribe(&keyword);
                            continue;
                        }
                    },
                    _ = ticker.tick() => match self.orchestrator.cached(&keyword).await {
                        Ok(entry) => entry.map(Arc::new),
                        Err(err) => {
                            warn!(error = %err, "subscription poll failed");
                            continue;
                        }
                    },
                };

                let Some(entry) = next else {
                    // Removed: the next entry is new even if its content repeats.
                    last = None;
                    continue;
                };
                if last.as_deref() == Some(&*entry) {
                    continue;
                }
                if !self.send(&sink, Delivery::Result(Arc::clone(&entry))).await {
                    break;
                }
                last = Some(entry);
            }
        }

        drop(updates);
        self.orchestrator.unsubscribe(&keyword);
        // `self.guard` drops here: cancel + release.
    }

    /// Send one message; `false` once the subscription should stop.
    async fn send(&self, sink: &DeliverySink, delivery: Delivery) -> bool {
        tokio::select! {
            _ = self.guard.cancelled() => false,
            sent = sink.send(delivery) => sent.is_ok(),
        }
    }
}
