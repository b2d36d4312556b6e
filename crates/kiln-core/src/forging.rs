//! Generation signatures, hits, and forging targets.
//!
//! The generation signature chains SHA-256 hashes from block to block; the
//! first 8 bytes of it, byte-reversed, form the forger's *hit*. A forger may
//! produce a block once the time-and-stake-dependent *target* grows past the
//! hit. Everything here is a pure function of its inputs, with no randomness
//! and no node-local state, so every node reaches the same verdict bit for
//! bit.

use sha2::{Digest, Sha256};

use crate::consensus_data::ConsensusData;
use crate::constants::{GENERATION_SIGNATURE_LEN, MS_PER_SEC};

/// Derive the generation signature a block must carry:
/// SHA-256 over `prev_signature || generator_key`.
pub fn generation_signature(
    prev_signature: &[u8; GENERATION_SIGNATURE_LEN],
    generator_key: &[u8],
) -> [u8; GENERATION_SIGNATURE_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(prev_signature);
    hasher.update(generator_key);
    hasher.finalize().into()
}

/// Compute the hit for `generator_key` forging on top of a block carrying
/// `prev`.
///
/// The first 8 bytes of the derived generation signature are reversed and
/// read big-endian. The reversal is part of the consensus contract: it
/// changes the numeric value and therefore every eligibility and validation
/// outcome, so it is spelled out here rather than folded into an endianness
/// choice.
pub fn calc_hit(prev: &ConsensusData, generator_key: &[u8]) -> u64 {
    let sig = generation_signature(&prev.generation_signature, generator_key);
    let mut head: [u8; 8] = sig[..8].try_into().expect("signature is 32 bytes");
    head.reverse();
    u64::from_be_bytes(head)
}

/// Compute the forging target at `candidate_timestamp` (milliseconds) for a
/// forger with `effective_balance`, on top of a block with
/// `prev_base_target` and `prev_timestamp` (milliseconds).
///
/// `target = base_target * eta * balance` where `eta` is the number of whole
/// seconds elapsed since the previous block. Grows monotonically with
/// waiting time; the product fits comfortably in u128.
pub fn calc_target(
    prev_base_target: u64,
    prev_timestamp: u64,
    candidate_timestamp: u64,
    effective_balance: u64,
) -> u128 {
    let eta = candidate_timestamp.saturating_sub(prev_timestamp) / MS_PER_SEC;
    prev_base_target as u128 * eta as u128 * effective_balance as u128
}

/// The eligibility rule: a forger may produce the next block iff its hit is
/// strictly below the target.
pub fn is_eligible(hit: u64, target: u128) -> bool {
    (hit as u128) < target
}
