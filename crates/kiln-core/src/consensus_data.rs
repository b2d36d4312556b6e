//! The per-block difficulty payload and its fixed-width binary codec.
//!
//! Wire layout (chain-critical, must match bit-for-bit across nodes):
//!
//! | offset   | length | field                              |
//! |----------|--------|------------------------------------|
//! | 0        | 8      | base target, big-endian 64-bit     |
//! | len - 32 | 32     | generation signature               |
//!
//! Any bytes between the first 8 and the trailing 32 are reserved and must be
//! tolerated on decode. Decoding fails only when fewer than 40 bytes are
//! supplied.

use serde::{Deserialize, Serialize};

use crate::constants::{
    BASE_TARGET_LEN, CONSENSUS_DATA_MIN_LEN, GENERATION_SIGNATURE_LEN, INITIAL_BASE_TARGET,
};
use crate::error::ConsensusDataError;

/// Per-block difficulty payload: base target plus generation signature.
///
/// Both fields are derived, never chosen freely, and immutable once the block
/// is finalized. `base_target` is the inverse forging difficulty (higher
/// means easier) and is strictly positive everywhere in a valid chain.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct ConsensusData {
    /// Inverse forging difficulty.
    pub base_target: u64,
    /// Hash chained from the parent's generation signature and the forger's
    /// public key. Source of the pseudo-random hit.
    pub generation_signature: [u8; 32],
}

impl ConsensusData {
    /// Consensus data of the genesis block: the initial base target and an
    /// all-zero generation signature.
    pub const GENESIS: Self = Self {
        base_target: INITIAL_BASE_TARGET,
        generation_signature: [0u8; 32],
    };

    /// Encode to the canonical 40-byte layout.
    pub fn encode(&self) -> [u8; CONSENSUS_DATA_MIN_LEN] {
        let mut out = [0u8; CONSENSUS_DATA_MIN_LEN];
        out[..BASE_TARGET_LEN].copy_from_slice(&self.base_target.to_be_bytes());
        out[BASE_TARGET_LEN..].copy_from_slice(&self.generation_signature);
        out
    }

    /// Decode from an encoded field of at least 40 bytes.
    ///
    /// The base target is read big-endian from bytes `[0, 8)`; the generation
    /// signature from the *final* 32 bytes regardless of total length, so
    /// longer fields with reserved interior bytes decode cleanly.
    pub fn decode(bytes: &[u8]) -> Result<Self, ConsensusDataError> {
        if bytes.len() < CONSENSUS_DATA_MIN_LEN {
            return Err(ConsensusDataError::TooShort {
                len: bytes.len(),
                min: CONSENSUS_DATA_MIN_LEN,
            });
        }

        let base_target = u64::from_be_bytes(
            bytes[..BASE_TARGET_LEN]
                .try_into()
                .expect("slice is exactly 8 bytes"),
        );
        let generation_signature: [u8; GENERATION_SIGNATURE_LEN] = bytes
            [bytes.len() - GENERATION_SIGNATURE_LEN..]
            .try_into()
            .expect("slice is exactly 32 bytes");

        Ok(Self {
            base_target,
            generation_signature,
        })
    }
}
