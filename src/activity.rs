use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

/// Counts in-flight operations and publishes whether any is pending.
#[derive(Clone)]
pub struct ActivityTracker {
    inner: Arc<Inner>,
}

struct Inner {
    in_flight: AtomicUsize,
    busy: watch::Sender<bool>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        let (busy, _receiver) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                in_flight: AtomicUsize::new(0),
                busy,
            }),
        }
    }

    /// Marks one operation as started until the returned guard is dropped.
    pub fn begin(&self) -> ActivityGuard {
        self.inner.in_flight.fetch_add(1, Ordering::SeqCst);
        self.inner.publish();

        ActivityGuard {
            inner: self.inner.clone(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.busy.subscribe()
    }
}

impl Inner {
    // The counter is re-read under the channel lock so the last writer wins.
    fn publish(&self) {
        self.busy.send_if_modified(|busy| {
            let pending = self.in_flight.load(Ordering::SeqCst) > 0;
            let changed = *busy != pending;
            *busy = pending;
            changed
        });
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ActivityGuard {
    inner: Arc<Inner>,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.inner.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.inner.publish();
    }
}
