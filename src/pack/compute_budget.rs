//! Compute-budget instruction decoding (spec.md §4.2).
//!
//! The wire parser and the compute-budget *program* are external
//! collaborators; this module only decodes the already-extracted
//! instruction-data bytes, the way `fd_compute_budget_program_parse` does in
//! the original source. A transaction may carry up to one
//! `SetComputeUnitLimit` and one `SetComputeUnitPrice` instruction; the
//! scheduler folds over a transaction's instructions and asks this module to
//! decode each one addressed to the compute-budget program, then combines
//! the results.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeBudgetInstruction {
    /// Requests a compute-unit ceiling for the whole transaction.
    SetComputeUnitLimit(u32),
    /// Requests a price, in micro-lamports per compute unit.
    SetComputeUnitPrice(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ComputeBudgetDecodeError {
    #[error("empty instruction data")]
    Empty,
    #[error("unrecognized discriminant {0}")]
    UnknownTag(u8),
    #[error("truncated instruction data")]
    Truncated,
}

const TAG_SET_COMPUTE_UNIT_LIMIT: u8 = 0;
const TAG_SET_COMPUTE_UNIT_PRICE: u8 = 1;

/// Decodes a single compute-budget instruction's data bytes.
pub fn decode_instruction(data: &[u8]) -> Result<ComputeBudgetInstruction, ComputeBudgetDecodeError> {
    let (&tag, rest) = data.split_first().ok_or(ComputeBudgetDecodeError::Empty)?;
    match tag {
        TAG_SET_COMPUTE_UNIT_LIMIT => {
            let bytes: [u8; 4] = rest.get(0..4).ok_or(ComputeBudgetDecodeError::Truncated)?
                .try_into().unwrap();
            Ok(ComputeBudgetInstruction::SetComputeUnitLimit(u32::from_le_bytes(bytes)))
        }
        TAG_SET_COMPUTE_UNIT_PRICE => {
            let bytes: [u8; 8] = rest.get(0..8).ok_or(ComputeBudgetDecodeError::Truncated)?
                .try_into().unwrap();
            Ok(ComputeBudgetInstruction::SetComputeUnitPrice(u64::from_le_bytes(bytes)))
        }
        other => Err(ComputeBudgetDecodeError::UnknownTag(other)),
    }
}

/// Result of folding a transaction's compute-budget instructions together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputeBudgetRequest {
    pub requested_cu: u32,
    pub priority_fee_lamports: u64,
}

/// Folds every compute-budget instruction's data bytes (already filtered by
/// program id by the caller) into one request, falling back to
/// `default_cu_per_instr * instr_count` and zero fee when decoding fails or
/// no compute-budget instruction is present, per spec.md §4.2.
pub fn fold_compute_budget<'a>(
    compute_budget_instr_data: impl Iterator<Item = &'a [u8]>,
    instr_count: usize,
    default_cu_per_instr: u32,
) -> ComputeBudgetRequest {
    let mut requested_cu = None;
    let mut micro_lamports_per_cu = 0u64;

    for data in compute_budget_instr_data {
        match decode_instruction(data) {
            Ok(ComputeBudgetInstruction::SetComputeUnitLimit(cu)) => requested_cu = Some(cu),
            Ok(ComputeBudgetInstruction::SetComputeUnitPrice(price)) => micro_lamports_per_cu = price,
            Err(_) => {} // malformed instruction: treat as absent, not a hard error
        }
    }

    let requested_cu = requested_cu.unwrap_or_else(|| {
        default_cu_per_instr.saturating_mul(instr_count as u32)
    });

    let priority_fee_lamports = ((micro_lamports_per_cu as u128 * requested_cu as u128)
        .div_ceil(1_000_000)) as u64;

    ComputeBudgetRequest { requested_cu, priority_fee_lamports }
}
