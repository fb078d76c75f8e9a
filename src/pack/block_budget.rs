//! Running per-block cost counters (spec.md §4.7).
//!
//! `write_cost` is conceptually a sparse map from writable-account-index to
//! accumulated cost; since accounts are already projected onto the small,
//! fixed `SmallSet` index space (spec.md §3), a flat fixed-size array
//! realizes that sparse map without any allocation.

use super::config::{MAX_COST_PER_BLOCK, MAX_VOTE_COST_PER_BLOCK, MAX_WRITE_COST_PER_ACCT};
use super::small_set::{SmallSet, SMALL_SET_WIDTH};

pub struct BlockBudget {
    total_cost: u64,
    vote_cost: u64,
    write_cost: [u64; SMALL_SET_WIDTH as usize],
}

impl Default for BlockBudget {
    fn default() -> Self {
        BlockBudget { total_cost: 0, vote_cost: 0, write_cost: [0; SMALL_SET_WIDTH as usize] }
    }
}

impl BlockBudget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_cost(&self) -> u64 {
        self.total_cost
    }

    pub fn vote_cost(&self) -> u64 {
        self.vote_cost
    }

    /// Attempts to reserve `total_cu` for a transaction writing the accounts
    /// in `write_set`. On success, commits the increments; on failure,
    /// leaves all counters unchanged (spec.md §7: "no partial mutation").
    pub fn try_reserve(&mut self, total_cu: u64, is_vote: bool, write_set: &SmallSet) -> bool {
        if self.total_cost.saturating_add(total_cu) > MAX_COST_PER_BLOCK {
            return false;
        }
        if is_vote && self.vote_cost.saturating_add(total_cu) > MAX_VOTE_COST_PER_BLOCK {
            return false;
        }
        for slot in 0..SMALL_SET_WIDTH {
            if write_set.test(slot) && self.write_cost[slot as usize].saturating_add(total_cu) > MAX_WRITE_COST_PER_ACCT {
                return false;
            }
        }

        self.total_cost += total_cu;
        if is_vote {
            self.vote_cost += total_cu;
        }
        for slot in 0..SMALL_SET_WIDTH {
            if write_set.test(slot) {
                self.write_cost[slot as usize] += total_cu;
            }
        }
        true
    }

    pub fn reset(&mut self) {
        self.total_cost = 0;
        self.vote_cost = 0;
        self.write_cost = [0; SMALL_SET_WIDTH as usize];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_commits_on_success() {
        let mut b = BlockBudget::new();
        let ws = SmallSet::empty().with(3);
        assert!(b.try_reserve(100, false, &ws));
        assert_eq!(b.total_cost(), 100);
    }

    #[test]
    fn reserve_rejects_without_mutation_over_total_limit() {
        let mut b = BlockBudget::new();
        let ws = SmallSet::empty();
        assert!(!b.try_reserve(MAX_COST_PER_BLOCK + 1, false, &ws));
        assert_eq!(b.total_cost(), 0);
    }

    #[test]
    fn vote_budget_is_separate_from_total() {
        let mut b = BlockBudget::new();
        let ws = SmallSet::empty();
        assert!(!b.try_reserve(MAX_VOTE_COST_PER_BLOCK + 1, true, &ws));
        assert_eq!(b.vote_cost(), 0);
    }

    #[test]
    fn write_cost_limit_is_per_account() {
        let mut b = BlockBudget::new();
        let ws = SmallSet::empty().with(7);
        assert!(b.try_reserve(MAX_WRITE_COST_PER_ACCT, false, &ws));
        assert!(!b.try_reserve(1, false, &ws));
        let other = SmallSet::empty().with(8);
        assert!(b.try_reserve(1, false, &other));
    }

    #[test]
    fn reset_zeroes_all_counters() {
        let mut b = BlockBudget::new();
        let ws = SmallSet::empty().with(1);
        b.try_reserve(10, true, &ws);
        b.reset();
        assert_eq!(b.total_cost(), 0);
        assert_eq!(b.vote_cost(), 0);
        assert!(b.try_reserve(MAX_WRITE_COST_PER_ACCT, false, &ws));
    }
}
