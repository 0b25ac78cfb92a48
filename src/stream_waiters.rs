//! Readers blocked in XREAD, waiting for appends to the streams they watch.

use std::collections::HashMap;

use tokio::sync::mpsc::{self, error::TrySendError};

/// A blocked reader's registration. Dropping the receiver is enough for the
/// slot to be pruned on the next append to one of its keys.
#[derive(Debug)]
pub struct Subscription {
    pub id: u64,
    pub receiver: mpsc::Receiver<()>,
}

#[derive(Debug)]
struct Waiter {
    id: u64,
    sender: mpsc::Sender<()>,
}

/// Registry of readers waiting for appends, keyed by stream key.
#[derive(Debug, Default)]
pub struct StreamWaiters {
    next_id: u64,
    waiters: HashMap<String, Vec<Waiter>>,
}

impl StreamWaiters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one waiter on every key in `keys`. All keys share a single
    /// channel so an append to any of them wakes the reader.
    pub fn subscribe(&mut self, keys: &[String]) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;

        // One pending wake is enough: the reader re-checks the whole keyspace.
        let (sender, receiver) = mpsc::channel(1);

        for key in keys {
            let waiters = self.waiters.entry(key.clone()).or_default();

            if !waiters.iter().any(|waiter| waiter.id == id) {
                waiters.push(Waiter {
                    id,
                    sender: sender.clone(),
                });
            }
        }

        Subscription { id, receiver }
    }

    /// Wakes every waiter on `key` and drops the ones whose reader is gone.
    pub fn notify(&mut self, key: &str) {
        let Some(waiters) = self.waiters.get_mut(key) else {
            return;
        };

        waiters.retain(|waiter| match waiter.sender.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => true,
            Err(TrySendError::Closed(())) => false,
        });

        if waiters.is_empty() {
            self.waiters.remove(key);
        }
    }

    pub fn unsubscribe(&mut self, id: u64) {
        self.waiters.retain(|_, waiters| {
            waiters.retain(|waiter| waiter.id != id);
            !waiters.is_empty()
        });
    }

    /// Number of readers currently registered on `key`.
    pub fn waiting_on(&self, key: &str) -> usize {
        self.waiters.get(key).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }
}
