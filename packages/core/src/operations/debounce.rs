//! Keyed, cancellable timers for trailing-edge debounce
//!
//! Each logical trigger owns a key. Scheduling a key that is already pending
//! replaces its deadline, so a burst of triggers yields a single expiry one
//! full delay after the last of them.
//!
//! The queue holds deadlines only; it never runs callbacks. Its owner polls
//! for expired keys (synchronously with [`TimerQueue::poll_expired`] or by
//! awaiting [`TimerQueue::next_expired`]) and dispatches them on its own task,
//! which keeps all form mutations on a single owner.
//!
//! # Example
//!
//! ```rust
//! use signup_core::operations::TimerQueue;
//! use std::time::Duration;
//! use tokio::time::Instant;
//!
//! let mut timers = TimerQueue::new();
//! let start = Instant::now();
//! timers.schedule_at("email", start + Duration::from_millis(1000));
//! // A second trigger before expiry pushes the deadline out
//! timers.schedule_at("email", start + Duration::from_millis(1200));
//!
//! assert!(timers.poll_expired(start + Duration::from_millis(1100)).is_empty());
//! assert_eq!(timers.poll_expired(start + Duration::from_millis(1200)), vec!["email"]);
//! ```

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;
use tokio::time::Instant;

/// Identifies one scheduling of a key
///
/// A handle goes stale as soon as its key is rescheduled, cancelled or fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle<K> {
    key: K,
    generation: u64,
}

impl<K: Copy> TimerHandle<K> {
    pub fn key(&self) -> K {
        self.key
    }
}

#[derive(Debug)]
struct PendingTimer {
    deadline: Instant,
    generation: u64,
}

#[derive(Debug)]
pub struct TimerQueue<K> {
    pending: HashMap<K, PendingTimer>,
    next_generation: u64,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
            next_generation: 0,
        }
    }
}

impl<K: Copy + Eq + Hash + Ord + Debug> TimerQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` to expire `delay` from now, replacing any pending deadline
    pub fn schedule(&mut self, key: K, delay: Duration) -> TimerHandle<K> {
        self.schedule_at(key, Instant::now() + delay)
    }

    pub fn schedule_at(&mut self, key: K, deadline: Instant) -> TimerHandle<K> {
        let generation = self.next_generation;
        self.next_generation += 1;

        if self
            .pending
            .insert(
                key,
                PendingTimer {
                    deadline,
                    generation,
                },
            )
            .is_some()
        {
            tracing::trace!("Rescheduled pending timer {:?}", key);
        }

        TimerHandle { key, generation }
    }

    /// Cancel the scheduling identified by `handle`
    ///
    /// Returns false if the handle is stale (the key was rescheduled, fired or
    /// already cancelled).
    pub fn cancel(&mut self, handle: &TimerHandle<K>) -> bool {
        match self.pending.get(&handle.key) {
            Some(timer) if timer.generation == handle.generation => {
                self.pending.remove(&handle.key);
                true
            }
            _ => false,
        }
    }

    /// Cancel whatever is pending for `key`
    pub fn cancel_key(&mut self, key: K) -> bool {
        self.pending.remove(&key).is_some()
    }

    /// Cancel everything; returns how many timers were pending
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.pending.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn deadline(&self, key: K) -> Option<Instant> {
        self.pending.get(&key).map(|timer| timer.deadline)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|timer| timer.deadline).min()
    }

    /// Remove and return every key whose deadline is at or before `now`,
    /// earliest first
    pub fn poll_expired(&mut self, now: Instant) -> Vec<K> {
        let mut expired: Vec<(Instant, u64, K)> = self
            .pending
            .iter()
            .filter(|(_, timer)| timer.deadline <= now)
            .map(|(key, timer)| (timer.deadline, timer.generation, *key))
            .collect();
        expired.sort();

        for (_, _, key) in &expired {
            self.pending.remove(key);
        }
        expired.into_iter().map(|(_, _, key)| key).collect()
    }

    /// Wait for the earliest deadline and return the keys expired by then
    ///
    /// Pends forever while nothing is scheduled. Cancel-safe: dropping the
    /// future before it completes leaves every timer pending.
    pub async fn next_expired(&mut self) -> Vec<K> {
        loop {
            match self.next_deadline() {
                None => std::future::pending::<()>().await,
                Some(deadline) => {
                    tokio::time::sleep_until(deadline).await;
                    let expired = self.poll_expired(Instant::now());
                    if !expired.is_empty() {
                        return expired;
                    }
                }
            }
        }
    }
}
