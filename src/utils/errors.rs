use thiserror::Error;

/// Unified error type for the pack scheduler (spec.md §7).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackError {
    #[error("payload is not a parseable transaction")]
    ParseError,

    #[error("transaction cost exceeds the per-transaction limit, or is structurally invalid")]
    OversizedTxn,

    #[error("a transaction with this signature is already resident")]
    Duplicate,

    #[error("pool is full and incoming priority does not exceed the current minimum")]
    PriorityTooLow,
}

/// Convenience alias
pub type Result<T> = std::result::Result<T, PackError>;
