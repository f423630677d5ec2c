pub mod sensor;

use std::sync::{Arc, Mutex};

/// Convenience helper for passing the freshest of a sequence-tagged value
/// between threads, for example from a worker thread finishing a network
/// round-trip to the UI thread applying the result.
///
/// An offer is kept only while its sequence number is the highest the slot
/// has seen, so a late completion of an older request is discarded even
/// after newer values were drained.
#[derive(Clone)]
pub struct LatestSlot<T>(Arc<Mutex<SlotInner<T>>>);

struct SlotInner<T> {
    highest_seen: u64,
    pending: Option<(u64, T)>,
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self(Arc::new(Mutex::new(SlotInner {
            highest_seen: 0,
            pending: None,
        })))
    }
}

impl<T> LatestSlot<T> {
    /// Stores `value` unless a higher-numbered offer was already seen.
    ///
    /// # Panics
    ///
    /// If the locking of the internally used mutex fails.
    pub fn offer(&self, seq: u64, value: T) {
        let mut inner = self.0.lock().unwrap();
        if seq < inner.highest_seen {
            return;
        }
        inner.highest_seen = seq;
        inner.pending = Some((seq, value));
    }

    /// Takes the stored value, leaving the slot empty.
    ///
    /// # Panics
    ///
    /// If the locking of the internally used mutex fails.
    pub fn take(&self) -> Option<T> {
        let mut inner = self.0.lock().unwrap();
        inner.pending.take().map(|(_, value)| value)
    }
}

#[test]
fn the_highest_sequence_wins_regardless_of_arrival_order() {
    let slot = LatestSlot::default();

    slot.offer(2, "two");
    slot.offer(1, "one");

    assert_eq!(slot.take(), Some("two"));
    assert_eq!(slot.take(), None);
}

#[test]
fn a_stale_offer_stays_dead_after_the_slot_was_drained() {
    let slot = LatestSlot::default();

    slot.offer(2, "two");
    assert_eq!(slot.take(), Some("two"));

    slot.offer(1, "one");
    assert_eq!(slot.take(), None);
}
