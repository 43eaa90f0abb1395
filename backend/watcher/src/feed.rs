//! Bounded in-memory feed of recent market events.
//!
//! Holds at most `capacity` events, oldest evicted first. Nothing survives a
//! restart; on boot the watcher re-reads from `START_LEDGER`.

use std::collections::{HashSet, VecDeque};

use tokio::sync::RwLock;

use crate::events::MarketEvent;

pub struct EventFeed {
    capacity: usize,
    inner: RwLock<FeedState>,
}

#[derive(Default)]
struct FeedState {
    events: VecDeque<MarketEvent>,
    seen: HashSet<String>,
}

impl EventFeed {
    pub fn new(capacity: usize) -> Self {
        EventFeed {
            capacity: capacity.max(1),
            inner: RwLock::new(FeedState::default()),
        }
    }

    /// Append a batch in order. Events whose RPC id was already seen are
    /// ignored so overlapping polls are idempotent. Returns how many were new.
    pub async fn push_batch(&self, batch: Vec<MarketEvent>) -> usize {
        let mut state = self.inner.write().await;
        let mut inserted = 0usize;

        for event in batch {
            if let Some(id) = &event.id {
                if !state.seen.insert(id.clone()) {
                    continue;
                }
            }
            state.events.push_back(event);
            inserted += 1;

            while state.events.len() > self.capacity {
                if let Some(evicted) = state.events.pop_front() {
                    if let Some(id) = evicted.id {
                        state.seen.remove(&id);
                    }
                }
            }
        }
        inserted
    }

    /// All buffered events, oldest first.
    pub async fn all(&self) -> Vec<MarketEvent> {
        self.inner.read().await.events.iter().cloned().collect()
    }

    /// Buffered events touching `bin`, oldest first.
    pub async fn for_bin(&self, bin: u32) -> Vec<MarketEvent> {
        self.inner
            .read()
            .await
            .events
            .iter()
            .filter(|e| e.bin == Some(bin))
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.events.len()
    }
}
