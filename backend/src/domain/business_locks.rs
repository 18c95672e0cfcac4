//! Per-business mutual exclusion for aggregate recomputation.
//!
//! Two reviews for the same business must not interleave their
//! insert, re-read and aggregate write, or the later write can publish an
//! aggregate that misses the other review. [`BusinessLocks`] hands out one
//! async mutex per business id. Different businesses never contend, and an
//! entry is dropped from the table as soon as nobody holds or awaits it.
//!
//! The table is process-local; a single backend instance is assumed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::BusinessId;

type Slot = Arc<AsyncMutex<()>>;

/// Keyed async lock table.
#[derive(Debug, Default)]
pub struct BusinessLocks {
    slots: Mutex<HashMap<BusinessId, Slot>>,
}

/// Exclusive hold on one business id. Released on drop.
#[derive(Debug)]
pub struct BusinessLockGuard<'a> {
    locks: &'a BusinessLocks,
    id: BusinessId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl BusinessLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`.
    pub async fn lock(&self, id: BusinessId) -> BusinessLockGuard<'_> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(id).or_default())
        };
        let guard = slot.lock_owned().await;
        BusinessLockGuard {
            locks: self,
            id,
            guard: Some(guard),
        }
    }

    /// Number of ids currently held or awaited.
    pub fn active(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn release(&self, id: &BusinessId) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        // Only the table's own handle left: nobody holds or awaits this id.
        if slots
            .get(id)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            slots.remove(id);
        }
    }
}

impl Drop for BusinessLockGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks.release(&self.id);
    }
}
