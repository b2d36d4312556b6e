//! Shared in-memory collaborators for integration tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use kiln_consensus::{ForgeEngine, ForgeParams};
use kiln_core::genesis;
use kiln_core::traits::{BalanceSheet, History, TransactionPacker};
use kiln_core::types::{Block, GeneratorKey};

/// A linear in-memory chain starting at genesis.
///
/// Interior mutability lets tests extend the chain while engines hold an
/// `Arc` to it, mimicking the storage layer growing under a live engine.
pub struct MemChain {
    chain: Mutex<Vec<Block>>,
}

impl MemChain {
    pub fn with_genesis() -> Arc<Self> {
        Arc::new(Self {
            chain: Mutex::new(vec![genesis::genesis_block().clone()]),
        })
    }

    /// Append a block. The caller is responsible for having validated it.
    pub fn push(&self, block: Block) {
        self.chain.lock().unwrap().push(block);
    }

    pub fn tip(&self) -> Block {
        self.chain.lock().unwrap().last().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.chain.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Base targets of every block, oldest first. Feed to
    /// [`score::chain_score`](kiln_core::score::chain_score).
    pub fn base_targets(&self) -> Vec<u64> {
        self.chain
            .lock()
            .unwrap()
            .iter()
            .map(|b| b.consensus.base_target)
            .collect()
    }
}

impl History for MemChain {
    fn parent(&self, block: &Block) -> Option<Block> {
        let chain = self.chain.lock().unwrap();
        chain.iter().find(|b| b.id() == block.previous).cloned()
    }

    fn height_of(&self, block: &Block) -> Option<u64> {
        let chain = self.chain.lock().unwrap();
        let id = block.id();
        chain
            .iter()
            .position(|b| b.id() == id)
            .map(|i| i as u64 + 1)
    }

    fn last_block(&self) -> Option<Block> {
        self.chain.lock().unwrap().last().cloned()
    }

    fn last_blocks(&self, ending_at: &Block, n: usize) -> Vec<Block> {
        let chain = self.chain.lock().unwrap();
        let id = ending_at.id();
        match chain.iter().position(|b| b.id() == id) {
            Some(pos) => {
                let start = (pos + 1).saturating_sub(n);
                chain[start..=pos].to_vec()
            }
            None => Vec::new(),
        }
    }
}

/// Balance sheet with per-account overrides and a flat fallback.
pub struct TestBalances {
    balances: Mutex<HashMap<GeneratorKey, u64>>,
    fallback: u64,
}

impl TestBalances {
    pub fn flat(fallback: u64) -> Arc<Self> {
        Arc::new(Self {
            balances: Mutex::new(HashMap::new()),
            fallback,
        })
    }

    pub fn set(&self, account: GeneratorKey, balance: u64) {
        self.balances.lock().unwrap().insert(account, balance);
    }
}

impl BalanceSheet for TestBalances {
    fn effective_balance(&self, account: &GeneratorKey, _depth: u64) -> u64 {
        *self
            .balances
            .lock()
            .unwrap()
            .get(account)
            .unwrap_or(&self.fallback)
    }
}

/// Packer returning a fixed marker payload.
pub struct TestPacker;

impl TransactionPacker for TestPacker {
    fn pack_unconfirmed(&self) -> Vec<u8> {
        b"unconfirmed".to_vec()
    }
}

/// A stake large enough that one elapsed second beats any hit.
pub const WHALE_BALANCE: u64 = 1_000_000_000_000;

/// Build an engine over `chain` whose clock always reads `now_ms`.
pub fn engine_with_clock(
    chain: &Arc<MemChain>,
    balances: &Arc<TestBalances>,
    now_ms: u64,
) -> ForgeEngine {
    ForgeEngine::with_clock(
        chain.clone(),
        balances.clone(),
        Arc::new(TestPacker),
        ForgeParams::default(),
        move || now_ms,
    )
}
