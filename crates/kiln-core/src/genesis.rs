//! Genesis block definition for the Kiln network.
//!
//! The genesis block sits at height 1 and carries the fixed
//! [`ConsensusData::GENESIS`] payload: the initial base target and an
//! all-zero generation signature. Every replaying node must reproduce it
//! exactly, since it anchors both the difficulty curve and the
//! generation-signature chain.

use std::sync::LazyLock;

use crate::consensus_data::ConsensusData;
use crate::types::{Block, BlockId, GeneratorKey};

/// Genesis block timestamp: January 1, 2026 00:00:00 UTC, in milliseconds.
pub const GENESIS_TIMESTAMP: u64 = 1_767_225_600_000;

static GENESIS: LazyLock<Block> = LazyLock::new(build_genesis);

/// Build the genesis block. It has no forger, no payload, and no signature:
/// the chain starts from an all-zero account by construction.
fn build_genesis() -> Block {
    Block {
        version: 1,
        timestamp: GENESIS_TIMESTAMP,
        previous: BlockId::ZERO,
        consensus: ConsensusData::GENESIS,
        generator: GeneratorKey([0u8; 32]),
        payload: Vec::new(),
        signature: Vec::new(),
    }
}

/// The genesis block, computed once and cached.
pub fn genesis_block() -> &'static Block {
    &GENESIS
}

/// The genesis block id.
pub fn genesis_id() -> BlockId {
    GENESIS.id()
}
