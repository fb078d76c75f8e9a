//! Deterministic, pure cost model (spec.md §4.3).

use super::compute_budget::fold_compute_budget;
use super::config::{
    COMPUTE_BUDGET_PROGRAM_ID, DEFAULT_CU_PER_INSTR, ED25519_PROGRAM_ID, EXPECTED_VOTE_WRITABLE_COUNT,
    MAX_COST_PER_TXN, SECP256K1_PROGRAM_ID, VOTE_PROGRAM_ID,
};
use super::small_set::SmallSet;
use super::txn_view::TxnView;
use crate::utils::errors::PackError;

/// Per-signature cost, in cost units. Mirrors the real cost model's
/// `SIGNATURE_COST`.
pub const SIGNATURE_COST: u64 = 720;
/// Per-writable-account lock cost, in cost units.
pub const WRITE_LOCK_COST: u64 = 300;
/// Cost of one secp256k1/ed25519 precompile signature verification.
pub const PRECOMPILE_SIG_COST: u64 = 720;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostResult {
    pub total_cu: u64,
    pub priority_fee: u64,
    pub is_vote: bool,
    pub write_set: SmallSet,
    pub read_set: SmallSet,
    pub writable_accounts: [Option<super::account::AccountIdentity>; super::small_set::SMALL_SET_WIDTH as usize],
}

/// Classifies a transaction as a (simple) vote: exactly one instruction,
/// addressed to the vote program, with the structural writable-account
/// count expected of a vote (spec.md §4.3, §9).
pub fn is_vote_transaction(view: &TxnView) -> bool {
    let instrs = view.instructions();
    if instrs.len() != 1 {
        return false;
    }
    let Some(program) = view.account_at(instrs[0].program_id_index) else {
        return false;
    };
    if program.addr != VOTE_PROGRAM_ID {
        return false;
    }
    let writable_count = view.accounts().iter().filter(|a| a.writable).count();
    writable_count == EXPECTED_VOTE_WRITABLE_COUNT
}

/// Evaluates a parsed transaction's cost-model result. Returns
/// `PackError::OversizedTxn` when the transaction has no signatures or its
/// total cost exceeds `MAX_COST_PER_TXN`.
pub fn evaluate(view: &TxnView) -> Result<CostResult, PackError> {
    let signature_count = view.signature_count();
    if signature_count == 0 {
        return Err(PackError::OversizedTxn);
    }

    let is_vote = is_vote_transaction(view);

    let compute_budget_data: Vec<&[u8]> = view.instr_data_for(&COMPUTE_BUDGET_PROGRAM_ID).collect();
    let request = fold_compute_budget(
        compute_budget_data.into_iter(),
        view.instructions().len(),
        DEFAULT_CU_PER_INSTR,
    );

    let writable_count = view.accounts().iter().filter(|a| a.writable).count();
    let precompile_count = view
        .instructions()
        .iter()
        .filter_map(|ix| view.account_at(ix.program_id_index))
        .filter(|a| a.addr == SECP256K1_PROGRAM_ID || a.addr == ED25519_PROGRAM_ID)
        .count();

    let total_cu = request.requested_cu as u64
        + signature_count as u64 * SIGNATURE_COST
        + writable_count as u64 * WRITE_LOCK_COST
        + precompile_count as u64 * PRECOMPILE_SIG_COST;

    if total_cu > MAX_COST_PER_TXN {
        return Err(PackError::OversizedTxn);
    }

    let mut write_set = SmallSet::empty();
    let mut read_set = SmallSet::empty();
    let mut writable_accounts = [None; super::small_set::SMALL_SET_WIDTH as usize];
    for acct in view.accounts() {
        let slot = super::account::slot_for(&acct.addr);
        if acct.writable {
            write_set.insert(slot);
            writable_accounts[slot as usize] = Some(acct.addr);
        } else {
            read_set.insert(slot);
        }
    }

    Ok(CostResult {
        total_cu,
        priority_fee: request.priority_fee_lamports,
        is_vote,
        write_set,
        read_set,
        writable_accounts,
    })
}
