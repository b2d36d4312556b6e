//! Core protocol types: block identifiers, generator keys, blocks.
//!
//! All block timestamps are milliseconds since the Unix epoch. The forging
//! math divides them down to whole seconds where the protocol calls for it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::consensus_data::ConsensusData;

/// A 32-byte block identifier (BLAKE3 hash of the block's canonical bytes).
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct BlockId(pub [u8; 32]);

impl BlockId {
    /// The zero id. Used as the previous-block reference of genesis.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Check if this is the zero id.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl AsRef<[u8]> for BlockId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Raw 32-byte public key identifying a block's forger.
///
/// Deliberately *not* a validated Ed25519 point: the consensus layer only
/// hashes these bytes (generation signature, hit), and block signature
/// verification lives outside the validator. Curve-point validation happens
/// where signatures are actually checked; see [`crypto`](crate::crypto).
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct GeneratorKey(pub [u8; 32]);

impl GeneratorKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for GeneratorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl AsRef<[u8]> for GeneratorKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A block as the consensus module sees it.
///
/// Constructed either by network deserialization (candidate, unvalidated) or
/// by the forging engine (valid by construction, still re-checked downstream).
/// The transaction payload is opaque here; packing and unpacking belong to
/// the transaction collaborator.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct Block {
    /// Protocol version.
    pub version: u64,
    /// Unix timestamp in milliseconds.
    pub timestamp: u64,
    /// Identifier of the parent block.
    pub previous: BlockId,
    /// Per-block difficulty payload.
    pub consensus: ConsensusData,
    /// Public key of the forger.
    pub generator: GeneratorKey,
    /// Packed unconfirmed transactions, opaque to consensus.
    pub payload: Vec<u8>,
    /// Ed25519 signature over [`signable_bytes`](Self::signable_bytes).
    /// Empty until the block is signed.
    pub signature: Vec<u8>,
}

impl Block {
    /// Canonical byte layout covered by the block signature.
    ///
    /// version LE || timestamp LE || previous || encoded consensus data ||
    /// generator || payload. The signature itself is excluded.
    pub fn signable_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(8 + 8 + 32 + 40 + 32 + self.payload.len());
        data.extend_from_slice(&self.version.to_le_bytes());
        data.extend_from_slice(&self.timestamp.to_le_bytes());
        data.extend_from_slice(&self.previous.0);
        data.extend_from_slice(&self.consensus.encode());
        data.extend_from_slice(self.generator.as_bytes());
        data.extend_from_slice(&self.payload);
        data
    }

    /// Compute the block id: BLAKE3 over the signable bytes plus signature.
    pub fn id(&self) -> BlockId {
        let mut data = self.signable_bytes();
        data.extend_from_slice(&self.signature);
        BlockId(blake3::hash(&data).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::INITIAL_BASE_TARGET;

    fn sample_block() -> Block {
        Block {
            version: 1,
            timestamp: 1_700_000_000_000,
            previous: BlockId([0xAA; 32]),
            consensus: ConsensusData {
                base_target: INITIAL_BASE_TARGET,
                generation_signature: [0x11; 32],
            },
            generator: GeneratorKey([0xBB; 32]),
            payload: vec![1, 2, 3],
            signature: vec![],
        }
    }

    #[test]
    fn block_id_is_deterministic() {
        let a = sample_block();
        let b = sample_block();
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn block_id_changes_with_timestamp() {
        let a = sample_block();
        let mut b = sample_block();
        b.timestamp += 1;
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn block_id_changes_with_signature() {
        let a = sample_block();
        let mut b = sample_block();
        b.signature = vec![0u8; 64];
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn signable_bytes_exclude_signature() {
        let a = sample_block();
        let mut b = sample_block();
        b.signature = vec![0u8; 64];
        assert_eq!(a.signable_bytes(), b.signable_bytes());
    }

    #[test]
    fn zero_id_display() {
        assert!(BlockId::ZERO.is_zero());
        assert_eq!(BlockId::ZERO.to_string(), "0".repeat(64));
    }
}
