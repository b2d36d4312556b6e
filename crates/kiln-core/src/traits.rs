//! Collaborator interfaces consumed by the forging engine.
//!
//! Consensus owns none of this state: chain storage, balance bookkeeping,
//! and the transaction pool live elsewhere. The engine treats all three as
//! read-only, synchronous oracles; callers serialize concurrent access to a
//! mutable chain head on their side.

use crate::types::{Block, GeneratorKey};

/// Read-only view of chain history.
///
/// Implemented by the storage layer. Consensus never mutates it.
pub trait History: Send + Sync {
    /// The parent of `block`, or `None` if it is unknown or genesis.
    fn parent(&self, block: &Block) -> Option<Block>;

    /// Height of `block` within the chain, or `None` if it is not connected.
    /// Genesis has height 1.
    fn height_of(&self, block: &Block) -> Option<u64>;

    /// The current chain tip, or `None` for an empty store (a store without
    /// genesis is a deployment error, but the engine abstains rather than
    /// panics).
    fn last_block(&self) -> Option<Block>;

    /// The last `n` blocks ending at and including `ending_at`, ordered
    /// oldest first. Returns fewer than `n` near the start of the chain.
    fn last_blocks(&self, ending_at: &Block, n: usize) -> Vec<Block>;
}

/// Stake-weighted balance queries.
///
/// `confirmation_depth` pins the balance to a state that many blocks in the
/// past, so that freshly moved stake cannot influence forging immediately.
pub trait BalanceSheet: Send + Sync {
    /// Effective (stake-weighted) balance of `account` as of
    /// `confirmation_depth` confirmations back.
    fn effective_balance(&self, account: &GeneratorKey, confirmation_depth: u64) -> u64;
}

/// Supplier of the opaque transaction payload a forged block carries.
pub trait TransactionPacker: Send + Sync {
    /// Pack the current unconfirmed transactions into a wire batch.
    fn pack_unconfirmed(&self) -> Vec<u8>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus_data::ConsensusData;
    use crate::types::BlockId;
    use std::collections::HashMap;

    // ------------------------------------------------------------------
    // Mock: History over a simple vector chain
    // ------------------------------------------------------------------

    struct MockHistory {
        chain: Vec<Block>,
    }

    impl MockHistory {
        fn with_blocks(n: usize) -> Self {
            let mut chain = Vec::new();
            let mut previous = BlockId::ZERO;
            for i in 0..n {
                let block = Block {
                    version: 1,
                    timestamp: 1_700_000_000_000 + i as u64 * 60_000,
                    previous,
                    consensus: ConsensusData::GENESIS,
                    generator: GeneratorKey([i as u8; 32]),
                    payload: vec![],
                    signature: vec![],
                };
                previous = block.id();
                chain.push(block);
            }
            Self { chain }
        }

        fn position(&self, block: &Block) -> Option<usize> {
            let id = block.id();
            self.chain.iter().position(|b| b.id() == id)
        }
    }

    impl History for MockHistory {
        fn parent(&self, block: &Block) -> Option<Block> {
            let pos = self.position(block)?;
            pos.checked_sub(1).map(|i| self.chain[i].clone())
        }

        fn height_of(&self, block: &Block) -> Option<u64> {
            self.position(block).map(|i| i as u64 + 1)
        }

        fn last_block(&self) -> Option<Block> {
            self.chain.last().cloned()
        }

        fn last_blocks(&self, ending_at: &Block, n: usize) -> Vec<Block> {
            match self.position(ending_at) {
                Some(pos) => {
                    let start = (pos + 1).saturating_sub(n);
                    self.chain[start..=pos].to_vec()
                }
                None => Vec::new(),
            }
        }
    }

    // ------------------------------------------------------------------
    // Mock: BalanceSheet and TransactionPacker
    // ------------------------------------------------------------------

    struct MockBalanceSheet {
        balances: HashMap<GeneratorKey, u64>,
    }

    impl BalanceSheet for MockBalanceSheet {
        fn effective_balance(&self, account: &GeneratorKey, _confirmation_depth: u64) -> u64 {
            *self.balances.get(account).unwrap_or(&0)
        }
    }

    struct MockPacker;

    impl TransactionPacker for MockPacker {
        fn pack_unconfirmed(&self) -> Vec<u8> {
            vec![0xDE, 0xAD]
        }
    }

    // ------------------------------------------------------------------
    // Object safety: verify each trait is dyn-compatible
    // ------------------------------------------------------------------

    fn _assert_history_object_safe(h: &dyn History) {
        let _ = h.last_block();
    }

    fn _assert_balance_sheet_object_safe(b: &dyn BalanceSheet) {
        let _ = b.effective_balance(&GeneratorKey([0; 32]), 1440);
    }

    fn _assert_packer_object_safe(p: &dyn TransactionPacker) {
        let _ = p.pack_unconfirmed();
    }

    // ------------------------------------------------------------------
    // History semantics the engine relies on
    // ------------------------------------------------------------------

    #[test]
    fn parent_of_genesis_is_none() {
        let h = MockHistory::with_blocks(3);
        assert!(h.parent(&h.chain[0]).is_none());
        assert_eq!(h.parent(&h.chain[2]), Some(h.chain[1].clone()));
    }

    #[test]
    fn height_starts_at_one() {
        let h = MockHistory::with_blocks(3);
        assert_eq!(h.height_of(&h.chain[0]), Some(1));
        assert_eq!(h.height_of(&h.chain[2]), Some(3));
    }

    #[test]
    fn unknown_block_has_no_height() {
        let h = MockHistory::with_blocks(2);
        let stranger = Block {
            version: 1,
            timestamp: 0,
            previous: BlockId([0xFF; 32]),
            consensus: ConsensusData::GENESIS,
            generator: GeneratorKey([0xFF; 32]),
            payload: vec![],
            signature: vec![],
        };
        assert_eq!(h.height_of(&stranger), None);
        assert!(h.parent(&stranger).is_none());
        assert!(h.last_blocks(&stranger, 3).is_empty());
    }

    #[test]
    fn last_blocks_ordered_oldest_first_inclusive() {
        let h = MockHistory::with_blocks(5);
        let tip = h.last_block().unwrap();
        let window = h.last_blocks(&tip, 3);
        assert_eq!(window.len(), 3);
        assert_eq!(window[0], h.chain[2]);
        assert_eq!(window[2], tip);
        assert!(window[0].timestamp < window[2].timestamp);
    }

    #[test]
    fn last_blocks_truncates_near_chain_start() {
        let h = MockHistory::with_blocks(2);
        let tip = h.last_block().unwrap();
        assert_eq!(h.last_blocks(&tip, 3).len(), 2);
    }

    #[test]
    fn balance_sheet_unknown_account_is_zero() {
        let b = MockBalanceSheet {
            balances: HashMap::new(),
        };
        assert_eq!(b.effective_balance(&GeneratorKey([1; 32]), 1440), 0);
    }

    #[test]
    fn packer_returns_opaque_payload() {
        let p = MockPacker;
        assert_eq!(p.pack_unconfirmed(), vec![0xDE, 0xAD]);
    }
}
