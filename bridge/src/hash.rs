//! Hash computation for request identifiers and withdrawal claims
//!
//! Both the source and destination bridge instances recompute these hashes
//! independently, so the byte layout is fixed and every field occupies one
//! 32-byte big-endian slot.
//!
//! # Request id layout (192 bytes)
//! - Bytes 0-31:    keccak256(sender)
//! - Bytes 32-63:   keccak256(recipient)
//! - Bytes 64-95:   amount (u128, left-padded)
//! - Bytes 96-127:  destination chain id (u64, left-padded)
//! - Bytes 128-159: nonce (u64, left-padded)
//! - Bytes 160-191: source chain id (u64, left-padded)
//!
//! # Claim digest layout (128 bytes)
//! - Bytes 0-31:    keccak256(recipient)
//! - Bytes 32-63:   keccak256(token)
//! - Bytes 64-95:   amount (u128, left-padded)
//! - Bytes 96-127:  request id

use cosmwasm_std::Binary;
use tiny_keccak::{Hasher, Keccak};

use crate::error::ContractError;

/// Compute keccak256 hash of arbitrary data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Derive the request id that correlates a deposit with its withdrawal.
///
/// Pure function of the deposit tuple; including `source_chain_id` makes the
/// same tuple deposited on another chain produce a different id.
pub fn compute_request_id(
    sender: &str,
    recipient: &str,
    amount: u128,
    dest_chain_id: u64,
    nonce: u64,
    source_chain_id: u64,
) -> [u8; 32] {
    let mut data = [0u8; 192];

    data[0..32].copy_from_slice(&keccak256(sender.as_bytes()));
    data[32..64].copy_from_slice(&keccak256(recipient.as_bytes()));
    write_u128(&mut data[64..96], amount);
    write_u64(&mut data[96..128], dest_chain_id);
    write_u64(&mut data[128..160], nonce);
    write_u64(&mut data[160..192], source_chain_id);

    keccak256(&data)
}

/// Digest a relayer signs to authorize releasing `amount` of `token` to
/// `recipient` for `request_id`.
pub fn compute_claim_digest(
    recipient: &str,
    token: &str,
    amount: u128,
    request_id: &[u8; 32],
) -> [u8; 32] {
    let mut data = [0u8; 128];

    data[0..32].copy_from_slice(&keccak256(recipient.as_bytes()));
    data[32..64].copy_from_slice(&keccak256(token.as_bytes()));
    write_u128(&mut data[64..96], amount);
    data[96..128].copy_from_slice(request_id);

    keccak256(&data)
}

/// Convert 32-byte hash to hex string (for attributes/logging)
pub fn bytes32_to_hex(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse a 32-byte request id from Binary input.
pub fn parse_request_id(request_id: &Binary) -> Result<[u8; 32], ContractError> {
    to_bytes32(request_id.as_slice())
}

fn to_bytes32(bytes: &[u8]) -> Result<[u8; 32], ContractError> {
    bytes
        .try_into()
        .map_err(|_| ContractError::InvalidRequestId { got: bytes.len() })
}

// u128 (16 bytes) goes into bytes 16-31 of the slot
fn write_u128(slot: &mut [u8], value: u128) {
    slot[16..32].copy_from_slice(&value.to_be_bytes());
}

// u64 (8 bytes) goes into bytes 24-31 of the slot
fn write_u64(slot: &mut [u8], value: u64) {
    slot[24..32].copy_from_slice(&value.to_be_bytes());
}
