use std::sync::atomic::{AtomicU64, Ordering};

use crate::shutdown::ShutdownSender;

/// Shared cap on the number of requests started across all users.
#[derive(Debug)]
pub(in crate::http) struct RequestLimiter {
    limit: u64,
    counter: AtomicU64,
}

impl RequestLimiter {
    pub(in crate::http) fn new(limit: Option<u64>) -> Option<Self> {
        limit.map(|limit| RequestLimiter {
            limit,
            counter: AtomicU64::new(0),
        })
    }

    /// Reserves one request slot. Once the cap is reached the run is shut
    /// down and every further call returns `false`.
    pub(in crate::http) fn try_reserve(&self, shutdown_tx: &ShutdownSender) -> bool {
        loop {
            let current = self.counter.load(Ordering::Relaxed);
            if current >= self.limit {
                drop(shutdown_tx.send(()));
                return false;
            }
            let Some(next) = current.checked_add(1) else {
                drop(shutdown_tx.send(()));
                return false;
            };
            if self
                .counter
                .compare_exchange(current, next, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return true;
            }
        }
    }

    pub(in crate::http) fn reserved(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}
