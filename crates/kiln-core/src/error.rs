//! Error types for the Kiln protocol.
//!
//! Per-block evaluation errors are contained at the validator/generator
//! boundary: the engine logs them and folds them into a boolean or optional
//! result. Nothing here is ever allowed to escape as a panic, with one
//! exception: a non-positive base target reaching the score function is a
//! programming error and asserts (see [`score`](crate::score)).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsensusDataError {
    #[error("consensus data too short: {len} bytes, need at least {min}")]
    TooShort { len: usize, min: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("parent block not found: {0}")] MissingParent(String),
    #[error("parent height unknown: {0}")] MissingHeight(String),
    #[error("base target mismatch: got {got}, expected {expected}")]
    BaseTargetMismatch { got: u64, expected: u64 },
    #[error("generation signature mismatch: got {got}, expected {expected}")]
    GenerationSignatureMismatch { got: String, expected: String },
    #[error("hit {hit} not below target {target}")]
    HitAboveTarget { hit: u64, target: u128 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid public key bytes")] InvalidPublicKey,
    #[error("invalid signature bytes")] InvalidSignature,
    #[error("signature verification failed")] VerificationFailed,
}

#[derive(Error, Debug)]
pub enum KilnError {
    #[error(transparent)] ConsensusData(#[from] ConsensusDataError),
    #[error(transparent)] Validation(#[from] ValidationError),
    #[error(transparent)] Crypto(#[from] CryptoError),
}
