//! Ring of the last `G_MAX` emitted microblocks' account sets (spec.md §4.6).
//!
//! Always allocates `G_MAX` slots regardless of the configured `gap`, the
//! way the original source's test harness allocates a fixed `FD_PACK_MAX_GAP`-
//! sized ring and only ever consults `gap` of its trailing slots.

use super::config::G_MAX;
use super::small_set::SmallSet;

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    read_set: SmallSet,
    write_set: SmallSet,
}

pub struct GapRing {
    gap: usize,
    slots: [Slot; G_MAX],
    microblock_count: u64,
}

impl GapRing {
    pub fn new(gap: usize) -> Self {
        assert!((1..=G_MAX).contains(&gap));
        GapRing { gap, slots: [Slot::default(); G_MAX], microblock_count: 0 }
    }

    pub fn microblock_count(&self) -> u64 {
        self.microblock_count
    }

    /// True iff `candidate_{read,write}` conflicts with any of the trailing
    /// `gap - 1` emitted microblocks (spec.md §4.6): a write in the interim
    /// must not race a read or write of the candidate, and vice versa.
    pub fn has_conflict(&self, candidate_read: &SmallSet, candidate_write: &SmallSet) -> bool {
        let lookback = (self.microblock_count.min(self.gap as u64 - 1)) as usize;
        for k in 1..=lookback {
            let mb = self.microblock_count - k as u64;
            let slot = &self.slots[(mb as usize) % G_MAX];
            if candidate_write.intersects(&slot.write_set)
                || candidate_write.intersects(&slot.read_set)
                || candidate_read.intersects(&slot.write_set)
            {
                return true;
            }
        }
        false
    }

    /// Records the just-emitted microblock's account sets and advances the ring.
    pub fn push(&mut self, read_set: SmallSet, write_set: SmallSet) {
        let idx = (self.microblock_count as usize) % G_MAX;
        self.slots[idx] = Slot { read_set, write_set };
        self.microblock_count += 1;
    }

    /// Clears all recorded microblocks, for the start of a new block.
    pub fn reset(&mut self) {
        self.slots = [Slot::default(); G_MAX];
        self.microblock_count = 0;
    }
}
