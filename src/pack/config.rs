//! Construction-time parameters and block-level constants (spec.md §6).
//!
//! Block-level constants are compile-time: "not renegotiated per
//! transaction". `PackConfig` carries the three construction parameters
//! (`pack_depth`, `gap`, `max_txn_per_microblock`) and is the serde-derived,
//! TOML-loadable counterpart of the teacher's `bootstrap.toml`-driven node
//! config (`node::cli::Cli`).

use serde::{Deserialize, Serialize};

use super::account::ACCOUNT_ADDR_LEN;
use super::small_set::SMALL_SET_WIDTH;
use super::txn_view::MAX_PAYLOAD_SZ;

/// Maximum supported gap (spec.md §4.6); `GapRing` always allocates this
/// many slots regardless of the configured `gap`.
pub const G_MAX: usize = 32;

/// Total cost budget for one block.
pub const MAX_COST_PER_BLOCK: u64 = 48_000_000;
/// Cost budget reserved exclusively for vote transactions within a block.
pub const MAX_VOTE_COST_PER_BLOCK: u64 = 36_000_000;
/// Per-writable-account cost ceiling within a block.
pub const MAX_WRITE_COST_PER_ACCT: u64 = 12_000_000;
/// Per-transaction cost ceiling; transactions exceeding this are rejected at `insert`.
pub const MAX_COST_PER_TXN: u64 = 1_400_000;
/// Fallback compute-unit estimate per instruction when no compute-budget instruction is present.
pub const DEFAULT_CU_PER_INSTR: u32 = 200_000;

pub const VOTE_PROGRAM_ID: [u8; ACCOUNT_ADDR_LEN] = [0x07u8; ACCOUNT_ADDR_LEN];
pub const COMPUTE_BUDGET_PROGRAM_ID: [u8; ACCOUNT_ADDR_LEN] = [0x03u8; ACCOUNT_ADDR_LEN];
pub const SECP256K1_PROGRAM_ID: [u8; ACCOUNT_ADDR_LEN] = [0x01u8; ACCOUNT_ADDR_LEN];
pub const ED25519_PROGRAM_ID: [u8; ACCOUNT_ADDR_LEN] = [0x02u8; ACCOUNT_ADDR_LEN];

/// Structural fingerprint for the vote classifier (spec.md §4.3/§9): a vote
/// transaction has exactly one instruction addressed to `VOTE_PROGRAM_ID`
/// and exactly this many writable accounts (vote account + fee payer).
pub const EXPECTED_VOTE_WRITABLE_COUNT: usize = 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackConfig {
    /// Maximum resident transactions.
    pub pack_depth: usize,
    /// Pipeline depth against which a newly scheduled microblock must be conflict-free. 1 <= gap <= G_MAX.
    pub gap: usize,
    /// Cap on transactions emitted per `schedule_next_microblock` call.
    pub max_txn_per_microblock: usize,
}

impl PackConfig {
    pub fn new(pack_depth: usize, gap: usize, max_txn_per_microblock: usize) -> Self {
        assert!((1..=G_MAX).contains(&gap), "gap must be in [1, G_MAX]");
        PackConfig { pack_depth, gap, max_txn_per_microblock }
    }

    /// Reports the memory footprint the pool, heap, gap ring, and block
    /// budget will occupy for these parameters, mirroring the original
    /// source's `fd_pack_footprint` sizing query (spec.md §6). The Rust
    /// implementation allocates this once at construction via `Vec`/
    /// `Box<[T]>` rather than placing itself into caller-supplied scratch;
    /// see DESIGN.md for that Open Question's resolution.
    pub fn footprint(&self) -> usize {
        let entry_sz = MAX_PAYLOAD_SZ + 256; // payload + TxnView + cost-model fields, rounded up
        let pool_sz = self.pack_depth * entry_sz;
        let heap_sz = self.pack_depth * std::mem::size_of::<usize>() * 2;
        let gap_ring_sz = G_MAX * std::mem::size_of::<u64>() * 2;
        let block_budget_sz = SMALL_SET_WIDTH as usize * std::mem::size_of::<u64>();
        pool_sz + heap_sz + gap_ring_sz + block_budget_sz
    }
}
