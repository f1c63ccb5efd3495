//! Single-slot, latest-wins hand-off between the detection producer and
//! the tracking worker.
//!
//! `submit` never blocks. If the worker has not consumed the previous
//! item yet it is overwritten, so the worker only ever sees the freshest
//! detection and no backlog builds up.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Notify;

use crate::types::Detection;

/// One slot item: a detection, or an explicit "no target" marker.
pub type Sample = Option<Detection>;

struct Shared {
    slot: Mutex<Option<Sample>>,
    notify: Notify,
    dropped: AtomicU64,
}

/// Create a connected sender/receiver pair.
pub fn latest_slot() -> (SlotSender, SlotReceiver) {
    let shared = Arc::new(Shared {
        slot: Mutex::new(None),
        notify: Notify::new(),
        dropped: AtomicU64::new(0),
    });
    (
        SlotSender {
            shared: Arc::clone(&shared),
        },
        SlotReceiver { shared },
    )
}

// ── SlotSender ───────────────────────────────────────────────────

/// Producer half. Cheap to clone.
#[derive(Clone)]
pub struct SlotSender {
    shared: Arc<Shared>,
}

impl SlotSender {
    /// Store `sample`, replacing any unconsumed one.
    ///
    /// Returns `true` if an older item was discarded.
    pub fn submit(&self, sample: Sample) -> bool {
        let replaced = {
            let mut slot = self
                .shared
                .slot
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            slot.replace(sample).is_some()
        };
        if replaced {
            self.shared.dropped.fetch_add(1, Ordering::Relaxed);
        }
        self.shared.notify.notify_one();
        replaced
    }

    /// Number of items overwritten before the worker saw them.
    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }
}

// ── SlotReceiver ─────────────────────────────────────────────────

/// Consumer half, owned by the tracking worker.
pub struct SlotReceiver {
    shared: Arc<Shared>,
}

impl SlotReceiver {
    /// Wait until an item is available and take it.
    pub async fn recv(&self) -> Sample {
        loop {
            if let Some(sample) = self.try_recv() {
                return sample;
            }
            self.shared.notify.notified().await;
        }
    }

    /// Take the pending item, if any, without waiting.
    pub fn try_recv(&self) -> Option<Sample> {
        self.shared
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }
}
