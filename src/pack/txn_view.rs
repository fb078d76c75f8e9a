//! Decoded, fixed-capacity view over a transaction payload (spec.md §4.3's
//! "TxnView").
//!
//! Wire parsing proper is an external collaborator (spec.md §1); this module
//! owns a small, self-contained wire format sufficient to drive the
//! scheduler's conflict/cost logic without any heap allocation per
//! transaction, matching the "no allocation" requirement of spec.md §5. All
//! fields are fixed-capacity arrays sized at compile time; `parse` never
//! allocates.
//!
//! Wire format (all integers little-endian):
//! ```text
//! [0..64)   signature
//! [64]      account_count (u8)
//! account_count * { [1 byte flags][32 byte pubkey] }   flags: bit0=writable, bit1=signer
//! [1 byte]  instruction_count
//! instruction_count * { [1 byte program_id_index][2 bytes data_len][data_len bytes] }
//! ```

use super::account::AccountIdentity;
use crate::utils::errors::PackError;

pub const SIGNATURE_LEN: usize = 64;
pub const MAX_ACCOUNTS: usize = 64;
pub const MAX_INSTRUCTIONS: usize = 16;
pub const MAX_INSTR_DATA: usize = 128;
/// Matches Solana's real wire-format transaction size ceiling.
pub const MAX_PAYLOAD_SZ: usize = 1232;

pub type Signature = [u8; SIGNATURE_LEN];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountEntry {
    pub addr: AccountIdentity,
    pub writable: bool,
    pub signer: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrView {
    pub program_id_index: u8,
    pub data: [u8; MAX_INSTR_DATA],
    pub data_len: u16,
}

impl Default for InstrView {
    fn default() -> Self {
        InstrView { program_id_index: 0, data: [0u8; MAX_INSTR_DATA], data_len: 0 }
    }
}

impl InstrView {
    pub fn data(&self) -> &[u8] {
        &self.data[..self.data_len as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxnView {
    pub signature: Signature,
    accounts: [AccountEntry; MAX_ACCOUNTS],
    account_count: u8,
    instructions: [InstrView; MAX_INSTRUCTIONS],
    instruction_count: u8,
}

impl TxnView {
    pub fn accounts(&self) -> &[AccountEntry] {
        &self.accounts[..self.account_count as usize]
    }

    pub fn instructions(&self) -> &[InstrView] {
        &self.instructions[..self.instruction_count as usize]
    }

    pub fn signature_count(&self) -> usize {
        self.accounts().iter().filter(|a| a.signer).count()
    }

    pub fn account_at(&self, program_id_index: u8) -> Option<&AccountEntry> {
        self.accounts().get(program_id_index as usize)
    }

    /// Instruction data bytes for every instruction whose program id matches `program_id`.
    pub fn instr_data_for<'a>(&'a self, program_id: &'a AccountIdentity) -> impl Iterator<Item = &'a [u8]> {
        self.instructions().iter().filter_map(move |ix| {
            let acct = self.account_at(ix.program_id_index)?;
            (&acct.addr == program_id).then(|| ix.data())
        })
    }
}

fn read_u8(bytes: &[u8], pos: &mut usize) -> Result<u8, PackError> {
    let b = *bytes.get(*pos).ok_or(PackError::ParseError)?;
    *pos += 1;
    Ok(b)
}

fn read_u16(bytes: &[u8], pos: &mut usize) -> Result<u16, PackError> {
    let slice = bytes.get(*pos..*pos + 2).ok_or(PackError::ParseError)?;
    *pos += 2;
    Ok(u16::from_le_bytes(slice.try_into().unwrap()))
}

fn read_bytes<'a>(bytes: &'a [u8], pos: &mut usize, len: usize) -> Result<&'a [u8], PackError> {
    let slice = bytes.get(*pos..*pos + len).ok_or(PackError::ParseError)?;
    *pos += len;
    Ok(slice)
}

/// Parses a raw transaction payload into a `TxnView`. Fails with
/// `PackError::ParseError` on truncation or counts exceeding this crate's
/// fixed capacities.
pub fn parse(payload: &[u8]) -> Result<TxnView, PackError> {
    if payload.len() > MAX_PAYLOAD_SZ {
        return Err(PackError::ParseError);
    }
    let mut pos = 0usize;
    let signature: Signature = read_bytes(payload, &mut pos, SIGNATURE_LEN)?
        .try_into()
        .map_err(|_| PackError::ParseError)?;

    let account_count = read_u8(payload, &mut pos)? as usize;
    if account_count > MAX_ACCOUNTS {
        return Err(PackError::ParseError);
    }
    let mut accounts = [AccountEntry::default(); MAX_ACCOUNTS];
    for slot in accounts.iter_mut().take(account_count) {
        let flags = read_u8(payload, &mut pos)?;
        let addr: AccountIdentity = read_bytes(payload, &mut pos, 32)?
            .try_into()
            .map_err(|_| PackError::ParseError)?;
        *slot = AccountEntry { addr, writable: flags & 0b01 != 0, signer: flags & 0b10 != 0 };
    }

    let instruction_count = read_u8(payload, &mut pos)? as usize;
    if instruction_count > MAX_INSTRUCTIONS {
        return Err(PackError::ParseError);
    }
    let mut instructions = [InstrView::default(); MAX_INSTRUCTIONS];
    for slot in instructions.iter_mut().take(instruction_count) {
        let program_id_index = read_u8(payload, &mut pos)?;
        let data_len = read_u16(payload, &mut pos)? as usize;
        if data_len > MAX_INSTR_DATA {
            return Err(PackError::ParseError);
        }
        let data_bytes = read_bytes(payload, &mut pos, data_len)?;
        let mut data = [0u8; MAX_INSTR_DATA];
        data[..data_len].copy_from_slice(data_bytes);
        *slot = InstrView { program_id_index, data, data_len: data_len as u16 };
    }

    Ok(TxnView {
        signature,
        accounts,
        account_count: account_count as u8,
        instructions,
        instruction_count: instruction_count as u8,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Builds a payload in this module's wire format from a convenient
    /// description: writable account bytes, readonly account bytes, and a
    /// list of (program_id_index, data) instructions. Mirrors the intent of
    /// the original source's `make_transaction` helper, adapted to this
    /// crate's own wire format.
    pub fn build_payload(
        signature: Signature,
        writes: &[AccountIdentity],
        reads: &[AccountIdentity],
        instr_program_ids: &[AccountIdentity],
        instr_data: &[&[u8]],
    ) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&signature);

        let signer = writes[0];
        let mut accounts: Vec<(AccountIdentity, bool, bool)> = Vec::new();
        accounts.push((signer, true, true));
        for w in &writes[1..] {
            accounts.push((*w, true, false));
        }
        for pid in instr_program_ids {
            accounts.push((*pid, false, false));
        }
        for r in reads {
            accounts.push((*r, false, false));
        }

        out.push(accounts.len() as u8);
        for (addr, writable, signer) in &accounts {
            let mut flags = 0u8;
            if *writable {
                flags |= 0b01;
            }
            if *signer {
                flags |= 0b10;
            }
            out.push(flags);
            out.extend_from_slice(addr);
        }

        out.push(instr_program_ids.len() as u8);
        for (i, pid) in instr_program_ids.iter().enumerate() {
            let program_id_index = accounts.iter().position(|(a, _, _)| a == pid).unwrap() as u8;
            out.push(program_id_index);
            let data = instr_data[i];
            out.extend_from_slice(&(data.len() as u16).to_le_bytes());
            out.extend_from_slice(data);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::build_payload;
    use super::*;

    fn acct(b: u8) -> AccountIdentity {
        [b; 32]
    }

    #[test]
    fn parses_round_trip() {
        let payload = build_payload([9u8; 64], &[acct(b'A')], &[acct(b'B')], &[acct(b'P')], &[&[1, 2, 3]]);
        let view = parse(&payload).unwrap();
        assert_eq!(view.signature, [9u8; 64]);
        assert_eq!(view.accounts().len(), 3);
        assert_eq!(view.instructions().len(), 1);
        assert_eq!(view.instructions()[0].data(), &[1, 2, 3]);
    }

    #[test]
    fn truncated_payload_is_parse_error() {
        let payload = build_payload([1u8; 64], &[acct(b'A')], &[], &[], &[]);
        let truncated = &payload[..payload.len() - 5];
        assert_eq!(parse(truncated), Err(PackError::ParseError));
    }

    #[test]
    fn instr_data_for_filters_by_program_id() {
        let pid = acct(b'X');
        let other = acct(b'Y');
        let payload = build_payload([1u8; 64], &[acct(b'A')], &[], &[pid, other], &[&[1], &[2]]);
        let view = parse(&payload).unwrap();
        let found: Vec<&[u8]> = view.instr_data_for(&pid).collect();
        assert_eq!(found, vec![&[1u8][..]]);
    }
}
