//! Bounded slab of resident transactions plus a signature index (spec.md §4.4).
//!
//! `entries` is sized once, at construction, to `pack_depth` — the crate's
//! realization of "memory is statically sized" (spec.md §4.4): capacity is
//! reserved up front for both the slab and the signature index, and the
//! pool invariant (never more than `pack_depth` resident entries) keeps the
//! index from ever growing past that reservation.

use std::collections::HashMap;

use super::cost_model::CostResult;
use super::txn_view::{Signature, TxnView, MAX_PAYLOAD_SZ};

pub struct Entry {
    pub payload: [u8; MAX_PAYLOAD_SZ],
    pub payload_len: usize,
    pub signature: Signature,
    pub view: Option<TxnView>,
    pub cost: Option<CostResult>,
    /// Current index of this entry's node in the priority heap's array;
    /// maintained by `PriorityHeap` on every swap (spec.md §4.5, §9).
    pub heap_pos: usize,
    occupied: bool,
}

impl Default for Entry {
    fn default() -> Self {
        Entry {
            payload: [0u8; MAX_PAYLOAD_SZ],
            payload_len: 0,
            signature: [0u8; 64],
            view: None,
            cost: None,
            heap_pos: usize::MAX,
            occupied: false,
        }
    }
}

impl Entry {
    pub fn view(&self) -> &TxnView {
        self.view.as_ref().expect("occupied entry always has a view")
    }

    pub fn cost(&self) -> &CostResult {
        self.cost.as_ref().expect("occupied entry always has a cost result")
    }
}

pub struct TxnPool {
    entries: Box<[Entry]>,
    free_list: Vec<usize>,
    sig_index: HashMap<Signature, usize>,
    len: usize,
}

impl TxnPool {
    pub fn new(pack_depth: usize) -> Self {
        let mut entries = Vec::with_capacity(pack_depth);
        entries.resize_with(pack_depth, Entry::default);
        TxnPool {
            entries: entries.into_boxed_slice(),
            free_list: (0..pack_depth).rev().collect(),
            sig_index: HashMap::with_capacity(pack_depth),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.entries.len()
    }

    pub fn contains_signature(&self, sig: &Signature) -> bool {
        self.sig_index.contains_key(sig)
    }

    pub fn lookup(&self, sig: &Signature) -> Option<usize> {
        self.sig_index.get(sig).copied()
    }

    /// Reserves a free slot, returning its stable pool index and a mutable
    /// reference to the scratch payload buffer for the caller to copy bytes
    /// into. The slot is not yet reachable via signature lookup until
    /// `insert_fini` commits it (spec.md §4.4).
    pub fn insert_init(&mut self) -> Option<(usize, &mut [u8; MAX_PAYLOAD_SZ])> {
        let idx = *self.free_list.last()?;
        Some((idx, &mut self.entries[idx].payload))
    }

    /// Commits a slot reserved by `insert_init`.
    pub fn insert_fini(
        &mut self,
        idx: usize,
        payload_len: usize,
        signature: Signature,
        view: TxnView,
        cost: CostResult,
    ) {
        self.free_list.pop();
        let entry = &mut self.entries[idx];
        entry.payload_len = payload_len;
        entry.signature = signature;
        entry.view = Some(view);
        entry.cost = Some(cost);
        entry.occupied = true;
        self.sig_index.insert(signature, idx);
        self.len += 1;
    }

    /// Frees a committed slot. Returns `false` if the slot was not occupied.
    pub fn remove(&mut self, idx: usize) -> bool {
        let entry = &mut self.entries[idx];
        if !entry.occupied {
            return false;
        }
        self.sig_index.remove(&entry.signature);
        *entry = Entry::default();
        self.free_list.push(idx);
        self.len -= 1;
        true
    }

    pub fn get(&self, idx: usize) -> &Entry {
        &self.entries[idx]
    }

    pub fn get_mut(&mut self, idx: usize) -> &mut Entry {
        &mut self.entries[idx]
    }
}
