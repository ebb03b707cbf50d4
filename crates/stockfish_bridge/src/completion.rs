//! Settle-once completion slot
//!
//! The listener and the watchdog both hold a clone of the same
//! [`CompletionSlot`]. The first [`settle`](CompletionSlot::settle) flips the
//! atomic flag and stores its outcome; every later call is refused. The
//! caller parked in [`wait`](CompletionSlot::wait) wakes exactly once.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;

#[derive(Debug)]
pub(crate) struct CompletionSlot<T> {
    settled: AtomicBool,
    outcome: Mutex<Option<T>>,
    notify: Notify,
}

impl<T> CompletionSlot<T> {
    pub(crate) fn new() -> Self {
        Self {
            settled: AtomicBool::new(false),
            outcome: Mutex::new(None),
            notify: Notify::new(),
        }
    }

    /// Store `outcome` if nobody has yet. Returns whether this call won.
    pub(crate) fn settle(&self, outcome: T) -> bool {
        if self
            .settled
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        *self.outcome.lock() = Some(outcome);
        // notify_one keeps a permit if the waiter has not parked yet
        self.notify.notify_one();
        true
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.settled.load(Ordering::Acquire)
    }

    /// Park until settled and take the outcome
    pub(crate) async fn wait(&self) -> T {
        loop {
            if let Some(outcome) = self.outcome.lock().take() {
                return outcome;
            }
            self.notify.notified().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_first_settle_wins() {
        let slot = CompletionSlot::new();
        assert!(!slot.is_settled());
        assert!(slot.settle("listener"));
        assert!(!slot.settle("watchdog"));
        assert!(slot.is_settled());
    }

    #[tokio::test]
    async fn test_wait_sees_settle_before_park() {
        let slot = CompletionSlot::new();
        slot.settle(7);
        assert_eq!(slot.wait().await, 7);
    }

    #[tokio::test]
    async fn test_concurrent_settlers_resolve_once() {
        //! Many racing tasks, one winner, one wake-up
        let slot = Arc::new(CompletionSlot::new());
        let mut handles = Vec::new();
        for id in 0..16 {
            let slot = Arc::clone(&slot);
            handles.push(tokio::spawn(async move { slot.settle(id) }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);

        let value = slot.wait().await;
        assert!((0..16).contains(&value));
    }
}
