//! Ed25519 signing primitives for forged blocks.
//!
//! A forging account is an Ed25519 keypair: the public half identifies the
//! forger in every block it generates (and drives the generation-signature
//! chain), the secret half signs the blocks it forges. Uses ed25519-dalek;
//! the secret key is zeroized on drop by the underlying library.
//!
//! Note that the block *validator* does not verify block signatures; that
//! check belongs to the outer block-acceptance pipeline. The primitives live
//! here so that the generator can sign and that pipeline can verify.

use ed25519_dalek::{Signer, Verifier};
use std::fmt;

use crate::error::CryptoError;
use crate::types::{Block, GeneratorKey};

/// Ed25519 keypair for a forging account.
pub struct KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

impl KeyPair {
    /// Generate a random keypair using the OS cryptographic RNG.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        Self {
            signing_key: ed25519_dalek::SigningKey::generate(&mut csprng),
        }
    }

    /// Create a keypair from 32-byte secret key material.
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(&bytes),
        }
    }

    /// The public key in the raw form blocks carry.
    pub fn generator_key(&self) -> GeneratorKey {
        GeneratorKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message, returning the raw 64-byte Ed25519 signature.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl Clone for KeyPair {
    fn clone(&self) -> Self {
        Self::from_secret_bytes(self.signing_key.to_bytes())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("generator_key", &self.generator_key())
            .finish_non_exhaustive()
    }
}

/// Sign a block in place with the forger's keypair.
///
/// Writes the signature over [`Block::signable_bytes`]. The caller is
/// responsible for having set `block.generator` to this keypair's public key.
pub fn sign_block(block: &mut Block, keypair: &KeyPair) {
    let signature = keypair.sign(&block.signable_bytes());
    block.signature = signature.to_vec();
}

/// Verify a block's Ed25519 signature against its generator key.
pub fn verify_block_signature(block: &Block) -> Result<(), CryptoError> {
    let vk = ed25519_dalek::VerifyingKey::from_bytes(block.generator.as_bytes())
        .map_err(|_| CryptoError::InvalidPublicKey)?;
    let sig_bytes: [u8; 64] = block
        .signature
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::InvalidSignature)?;
    let sig = ed25519_dalek::Signature::from_bytes(&sig_bytes);
    vk.verify(&block.signable_bytes(), &sig)
        .map_err(|_| CryptoError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus_data::ConsensusData;
    use crate::types::BlockId;

    fn unsigned_block(keypair: &KeyPair) -> Block {
        Block {
            version: 1,
            timestamp: 1_700_000_060_000,
            previous: BlockId([0xAA; 32]),
            consensus: ConsensusData::GENESIS,
            generator: keypair.generator_key(),
            payload: vec![],
            signature: vec![],
        }
    }

    #[test]
    fn sign_then_verify_round_trip() {
        let keypair = KeyPair::from_secret_bytes([7; 32]);
        let mut block = unsigned_block(&keypair);
        sign_block(&mut block, &keypair);
        assert_eq!(block.signature.len(), 64);
        assert!(verify_block_signature(&block).is_ok());
    }

    #[test]
    fn verify_rejects_tampered_block() {
        let keypair = KeyPair::from_secret_bytes([7; 32]);
        let mut block = unsigned_block(&keypair);
        sign_block(&mut block, &keypair);
        block.timestamp += 1;
        assert_eq!(
            verify_block_signature(&block),
            Err(CryptoError::VerificationFailed)
        );
    }

    #[test]
    fn verify_rejects_wrong_signer() {
        let owner = KeyPair::from_secret_bytes([7; 32]);
        let thief = KeyPair::from_secret_bytes([8; 32]);
        let mut block = unsigned_block(&owner);
        sign_block(&mut block, &thief);
        assert_eq!(
            verify_block_signature(&block),
            Err(CryptoError::VerificationFailed)
        );
    }

    #[test]
    fn verify_rejects_missing_signature() {
        let keypair = KeyPair::from_secret_bytes([7; 32]);
        let block = unsigned_block(&keypair);
        assert_eq!(
            verify_block_signature(&block),
            Err(CryptoError::InvalidSignature)
        );
    }

    #[test]
    fn keypair_is_deterministic_from_seed() {
        let a = KeyPair::from_secret_bytes([1; 32]);
        let b = KeyPair::from_secret_bytes([1; 32]);
        assert_eq!(a.generator_key(), b.generator_key());
        assert_ne!(
            a.generator_key(),
            KeyPair::from_secret_bytes([2; 32]).generator_key()
        );
    }

    #[test]
    fn generate_produces_distinct_keys() {
        assert_ne!(
            KeyPair::generate().generator_key(),
            KeyPair::generate().generator_key()
        );
    }
}
