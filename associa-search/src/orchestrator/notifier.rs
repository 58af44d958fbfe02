//! Per-keyword change notification for open subscriptions.
//!
//! Every keyword with at least one subscriber has a [`watch`] channel holding
//! the latest cached result (`None` after removal). Publishing to a keyword
//! nobody watches is a no-op.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use crate::types::SearchResultCache;

/// Latest value seen by subscribers of one keyword.
pub type ResultUpdate = Option<Arc<SearchResultCache>>;

/// Keyword → watch channel map.
#[derive(Debug, Default)]
pub struct ResultNotifier {
    channels: DashMap<String, watch::Sender<ResultUpdate>>,
}

impl ResultNotifier {
    /// Create a notifier with no channels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive updates for `keyword`, creating its channel on first use.
    pub fn subscribe(&self, keyword: &str) -> watch::Receiver<ResultUpdate> {
        self.channels
            .entry(keyword.to_owned())
            .or_insert_with(|| watch::channel(None).0)
            .subscribe()
    }

    /// Replace the latest value for `keyword` and wake its subscribers.
    pub fn publish(&self, keyword: &str, update: ResultUpdate) {
        if let Some(sender) = self.channels.get(keyword) {
            sender.send_replace(update);
        }
    }

    /// Drop the channel for `keyword` once it has no receivers left.
    pub fn prune(&self, keyword: &str) {
        self.channels
            .remove_if(keyword, |_, sender| sender.receiver_count() == 0);
    }

    /// Number of keywords with a live channel.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Returns `true` if no keyword is watched.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn entry(word: &str) -> Arc<SearchResultCache> {
        Arc::new(SearchResultCache {
            results: vec![],
            associative_words: vec![word.to_string()],
        })
    }

    #[tokio::test]
    async fn subscriber_sees_published_value() {
        let notifier = ResultNotifier::new();
        let mut rx = notifier.subscribe("rust");

        notifier.publish("rust", Some(entry("cargo")));

        rx.changed().await.expect("sender alive");
        let value = rx.borrow_and_update().clone().expect("published value");
        assert_eq!(value.associative_words, vec!["cargo"]);
    }

    #[test]
    fn publish_without_subscribers_is_noop() {
        let notifier = ResultNotifier::new();
        notifier.publish("nobody", Some(entry("x")));
        assert!(notifier.is_empty());
    }

    #[test]
    fn prune_keeps_channels_with_receivers() {
        let notifier = ResultNotifier::new();
        let rx = notifier.subscribe("rust");
        notifier.prune("rust");
        assert_eq!(notifier.len(), 1);

        drop(rx);
        notifier.prune("rust");
        assert!(notifier.is_empty());
    }

    #[test]
    fn subscribers_share_one_channel() {
        let notifier = ResultNotifier::new();
        let _a = notifier.subscribe("rust");
        let _b = notifier.subscribe("rust");
        assert_eq!(notifier.len(), 1);
    }
}
