//! Orchestrator tying the pool, priority heap, gap ring and block budget
//! together into the scheduling algorithm (spec.md §4.8).

use tracing::{debug, trace, warn};

use super::block_budget::BlockBudget;
use super::config::PackConfig;
use super::cost_model::{self, CostResult};
use super::gap_ring::GapRing;
use super::priority_heap::PriorityHeap;
use super::small_set::SmallSet;
use super::txn_pool::TxnPool;
use super::txn_view::{self, Signature, MAX_PAYLOAD_SZ};
use crate::utils::errors::PackError;

fn score_of(cost: &CostResult) -> f64 {
    cost.priority_fee as f64 / cost.total_cu.max(1) as f64
}

/// One transaction placed into an emitted microblock.
#[derive(Debug, Clone)]
pub struct EmittedTxn {
    pub signature: Signature,
    pub payload: [u8; MAX_PAYLOAD_SZ],
    pub payload_len: usize,
    pub priority_fee: u64,
    pub total_cu: u64,
    pub is_vote: bool,
}

impl Default for EmittedTxn {
    fn default() -> Self {
        EmittedTxn {
            signature: [0u8; 64],
            payload: [0u8; MAX_PAYLOAD_SZ],
            payload_len: 0,
            priority_fee: 0,
            total_cu: 0,
            is_vote: false,
        }
    }
}

pub struct Scheduler {
    config: PackConfig,
    pool: TxnPool,
    heap: PriorityHeap,
    gap_ring: GapRing,
    block_budget: BlockBudget,
    /// Scratch list of pool indices skipped within the microblock currently
    /// being built, preallocated once so `schedule_next_microblock` never
    /// allocates on the hot path (spec.md §5).
    deferred: Vec<usize>,
}

impl Scheduler {
    pub fn new(config: PackConfig) -> Self {
        Scheduler {
            pool: TxnPool::new(config.pack_depth),
            heap: PriorityHeap::new(config.pack_depth),
            gap_ring: GapRing::new(config.gap),
            block_budget: BlockBudget::new(),
            deferred: Vec::with_capacity(config.pack_depth),
            config,
        }
    }

    pub fn avail_txn_cnt(&self) -> u64 {
        self.pool.len() as u64
    }

    /// Parses, costs and admits a transaction (spec.md §4.8, step 1).
    ///
    /// Evicts the lowest-scoring resident transaction when the pool is full
    /// and the incoming transaction scores higher; otherwise rejects with
    /// `PackError::PriorityTooLow`.
    pub fn insert(&mut self, payload: &[u8]) -> Result<(), PackError> {
        let view = txn_view::parse(payload)?;
        let cost = cost_model::evaluate(&view)?;

        if self.pool.contains_signature(&view.signature) {
            trace!("duplicate signature rejected");
            return Err(PackError::Duplicate);
        }

        let score = score_of(&cost);

        if self.pool.is_full() {
            let heap_idx = self.heap.find_evictable(score).ok_or_else(|| {
                debug!(score, "pool full, incoming priority too low to evict anything");
                PackError::PriorityTooLow
            })?;
            let victim = self.heap.pool_index_at(heap_idx);
            self.heap.remove(victim);
            self.pool.remove(victim);
            trace!(victim, "evicted lower-priority resident transaction");
        }

        let (idx, buf) = self.pool.insert_init().expect("slot available after eviction check");
        buf[..payload.len()].copy_from_slice(payload);
        let signature = view.signature;
        self.pool.insert_fini(idx, payload.len(), signature, view, cost);
        self.heap.push(score, idx);
        Ok(())
    }

    /// Removes a resident transaction by signature, if present.
    pub fn delete(&mut self, signature: &Signature) -> bool {
        let Some(idx) = self.pool.lookup(signature) else {
            return false;
        };
        self.heap.remove(idx);
        self.pool.remove(idx);
        true
    }

    /// Fills `out` with up to `out.len()` (and at most
    /// `config.max_txn_per_microblock`) transactions for the next
    /// microblock, subject to the compute-unit limit, the vote-fraction
    /// reservation, intra-microblock account conflicts, the gap ring, and
    /// the block budget (spec.md §4.8, steps 2-6). Returns the count
    /// actually emitted.
    pub fn schedule_next_microblock(&mut self, cu_limit: u64, vote_fraction: f64, out: &mut [EmittedTxn]) -> usize {
        let max_out = out.len().min(self.config.max_txn_per_microblock);
        let vote_cu_limit = (cu_limit as f64 * vote_fraction) as u64;

        let mut emitted = 0usize;
        let mut used_cu = 0u64;
        let mut vote_cu_used = 0u64;
        let mut microblock_write = SmallSet::empty();
        let mut microblock_read = SmallSet::empty();
        self.deferred.clear();

        while emitted < max_out {
            let Some(top) = self.heap.peek_max() else { break };
            let pool_index = top.pool_index;
            let cost = *self.pool.get(pool_index).cost();
            self.heap.pop_max();

            let conflicts_in_block = cost.write_set.intersects(&microblock_write)
                || cost.write_set.intersects(&microblock_read)
                || cost.read_set.intersects(&microblock_write);
            if conflicts_in_block {
                self.deferred.push(pool_index);
                continue;
            }
            if self.gap_ring.has_conflict(&cost.read_set, &cost.write_set) {
                self.deferred.push(pool_index);
                continue;
            }
            if used_cu + cost.total_cu > cu_limit {
                self.deferred.push(pool_index);
                continue;
            }
            if cost.is_vote && vote_cu_used + cost.total_cu > vote_cu_limit {
                self.deferred.push(pool_index);
                continue;
            }
            if !self.block_budget.try_reserve(cost.total_cu, cost.is_vote, &cost.write_set) {
                self.deferred.push(pool_index);
                continue;
            }

            let entry = self.pool.get(pool_index);
            let out_entry = &mut out[emitted];
            out_entry.signature = entry.signature;
            out_entry.payload[..entry.payload_len].copy_from_slice(&entry.payload[..entry.payload_len]);
            out_entry.payload_len = entry.payload_len;
            out_entry.priority_fee = cost.priority_fee;
            out_entry.total_cu = cost.total_cu;
            out_entry.is_vote = cost.is_vote;

            used_cu += cost.total_cu;
            if cost.is_vote {
                vote_cu_used += cost.total_cu;
            }
            microblock_write = microblock_write.union(&cost.write_set);
            microblock_read = microblock_read.union(&cost.read_set);

            self.pool.remove(pool_index);
            emitted += 1;
        }

        for &pool_index in &self.deferred {
            let cost = *self.pool.get(pool_index).cost();
            self.heap.push(score_of(&cost), pool_index);
        }
        self.deferred.clear();

        self.gap_ring.push(microblock_read, microblock_write);
        if emitted == 0 {
            warn!(resident = self.pool.len(), "microblock produced no transactions");
        } else {
            debug!(emitted, used_cu, "scheduled microblock");
        }
        emitted
    }

    /// Resets the per-block cost budget and the gap ring for a new block.
    pub fn end_block(&mut self) {
        self.block_budget.reset();
        self.gap_ring.reset();
    }
}
