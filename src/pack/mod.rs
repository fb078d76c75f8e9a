//! Transaction pack scheduler: turns a stream of incoming transactions into
//! conflict-free, budget-respecting microblocks.

pub mod account;
pub mod block_budget;
pub mod compute_budget;
pub mod config;
pub mod cost_model;
pub mod gap_ring;
pub mod priority_heap;
pub mod scheduler;
pub mod small_set;
pub mod txn_pool;
pub mod txn_view;

pub use config::PackConfig;
pub use scheduler::{EmittedTxn, Scheduler};
