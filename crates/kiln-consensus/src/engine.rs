//! The forging engine: block validation and block generation.
//!
//! Validation recomputes everything a received block claims (base target,
//! generation signature, hit versus target) and rejects on any mismatch.
//! Generation runs the same math forward for a local account and produces a
//! signed candidate block when the account is eligible. Both sides are pure
//! over the injected collaborators: the engine holds no mutable chain state,
//! so concurrent validations of different blocks need no locking here.

use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use kiln_core::consensus_data::ConsensusData;
use kiln_core::constants::{AVG_DELAY_SECS, EFFECTIVE_BALANCE_DEPTH, RETARGET_WINDOW};
use kiln_core::crypto::{self, KeyPair};
use kiln_core::error::ValidationError;
use kiln_core::traits::{BalanceSheet, History, TransactionPacker};
use kiln_core::types::Block;
use kiln_core::{forging, retarget};

/// Engine configuration.
///
/// `avg_delay_secs` is the only tunable the protocol exposes; every other
/// retargeting parameter is a fixed consensus constant in
/// [`kiln_core::constants`]. Changing the delay on a live network forks the
/// chain, so this is a deployment-time choice, not a runtime one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForgeParams {
    /// Target delay between blocks, in seconds.
    pub avg_delay_secs: u64,
}

impl Default for ForgeParams {
    fn default() -> Self {
        Self {
            avg_delay_secs: AVG_DELAY_SECS,
        }
    }
}

/// The production forging engine.
///
/// Validates candidate blocks against chain history and forges new blocks
/// for a local account when its hit falls below the current target.
pub struct ForgeEngine {
    history: Arc<dyn History>,
    balances: Arc<dyn BalanceSheet>,
    packer: Arc<dyn TransactionPacker>,
    /// Corrected time source returning epoch milliseconds. Injected so that
    /// tests (and deployments with external time sync) control it.
    clock: Box<dyn Fn() -> u64 + Send + Sync>,
    params: ForgeParams,
}

impl fmt::Debug for ForgeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForgeEngine")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl ForgeEngine {
    /// Create an engine with the system clock.
    ///
    /// # Panics
    ///
    /// Panics if `params.avg_delay_secs` is zero: a configuration error
    /// surfaced at startup, never during block evaluation.
    pub fn new(
        history: Arc<dyn History>,
        balances: Arc<dyn BalanceSheet>,
        packer: Arc<dyn TransactionPacker>,
        params: ForgeParams,
    ) -> Self {
        Self::with_clock(history, balances, packer, params, || {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64
        })
    }

    /// Create an engine with a custom clock.
    ///
    /// # Panics
    ///
    /// Panics if `params.avg_delay_secs` is zero.
    pub fn with_clock(
        history: Arc<dyn History>,
        balances: Arc<dyn BalanceSheet>,
        packer: Arc<dyn TransactionPacker>,
        params: ForgeParams,
        clock: impl Fn() -> u64 + Send + Sync + 'static,
    ) -> Self {
        assert!(params.avg_delay_secs > 0, "avg_delay_secs must be positive");
        Self {
            history,
            balances,
            packer,
            clock: Box::new(clock),
            params,
        }
    }

    /// Base target a child of `parent` forged at `candidate_timestamp` must
    /// carry.
    fn expected_base_target(
        &self,
        parent: &Block,
        candidate_timestamp: u64,
    ) -> Result<u64, ValidationError> {
        let height = self
            .history
            .height_of(parent)
            .ok_or_else(|| ValidationError::MissingHeight(parent.id().to_string()))?;
        let window: Vec<u64> = self
            .history
            .last_blocks(parent, RETARGET_WINDOW)
            .iter()
            .map(|b| b.timestamp)
            .collect();
        Ok(retarget::next_base_target(
            height,
            parent.consensus.base_target,
            &window,
            candidate_timestamp,
            self.params.avg_delay_secs,
        ))
    }

    /// Recompute every consensus claim `block` makes and require equality.
    ///
    /// Checks, in order, short-circuiting on the first failure (the final
    /// answer is the same either way):
    /// 1. the parent exists in history,
    /// 2. the claimed base target matches the retarget computation,
    /// 3. the claimed generation signature matches the derived one,
    /// 4. the forger's hit is strictly below its target at the block's
    ///    timestamp, with effective balance read at depth 1440.
    pub fn validate_block(&self, block: &Block) -> Result<(), ValidationError> {
        let parent = self
            .history
            .parent(block)
            .ok_or_else(|| ValidationError::MissingParent(block.previous.to_string()))?;

        let expected_base_target = self.expected_base_target(&parent, block.timestamp)?;
        if block.consensus.base_target != expected_base_target {
            return Err(ValidationError::BaseTargetMismatch {
                got: block.consensus.base_target,
                expected: expected_base_target,
            });
        }

        let expected_signature = forging::generation_signature(
            &parent.consensus.generation_signature,
            block.generator.as_bytes(),
        );
        if block.consensus.generation_signature != expected_signature {
            return Err(ValidationError::GenerationSignatureMismatch {
                got: hex::encode(block.consensus.generation_signature),
                expected: hex::encode(expected_signature),
            });
        }

        let balance = self
            .balances
            .effective_balance(&block.generator, EFFECTIVE_BALANCE_DEPTH);
        let hit = forging::calc_hit(&parent.consensus, block.generator.as_bytes());
        let target = forging::calc_target(
            parent.consensus.base_target,
            parent.timestamp,
            block.timestamp,
            balance,
        );
        if !forging::is_eligible(hit, target) {
            return Err(ValidationError::HitAboveTarget { hit, target });
        }

        Ok(())
    }

    /// Boundary form of [`validate_block`](Self::validate_block): any failure
    /// is logged with its cause and folded into `false`. Never panics, never
    /// propagates; callers get a plain verdict.
    pub fn is_valid(&self, block: &Block) -> bool {
        match self.validate_block(block) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(block_id = %block.id(), %error, "block rejected");
                false
            }
        }
    }

    /// Attempt to forge the next block for `keypair`'s account.
    ///
    /// Returns `None` when the account is not (yet) eligible, the expected
    /// common case on every polling tick that is not this forger's turn,
    /// or when history is unusable. A returned block is signed and complete
    /// but must still pass [`is_valid`](Self::is_valid) before the rest of
    /// the system accepts it (defense in depth). Reads a single snapshot of
    /// (tip, balance) at entry; a stale attempt that loses the race simply
    /// fails later validation.
    pub fn try_generate_next_block(&self, keypair: &KeyPair) -> Option<Block> {
        let last = match self.history.last_block() {
            Some(block) => block,
            None => {
                tracing::warn!("history has no chain tip, cannot forge");
                return None;
            }
        };

        let now = (self.clock)();
        let generator = keypair.generator_key();
        let balance = self
            .balances
            .effective_balance(&generator, EFFECTIVE_BALANCE_DEPTH);

        let hit = forging::calc_hit(&last.consensus, generator.as_bytes());
        let target =
            forging::calc_target(last.consensus.base_target, last.timestamp, now, balance);
        if !forging::is_eligible(hit, target) {
            tracing::trace!(hit, target = %target, "not eligible to forge");
            return None;
        }

        let base_target = match self.expected_base_target(&last, now) {
            Ok(bt) => bt,
            Err(error) => {
                tracing::warn!(%error, "cannot compute base target for new block");
                return None;
            }
        };
        let generation_signature = forging::generation_signature(
            &last.consensus.generation_signature,
            generator.as_bytes(),
        );

        let mut block = Block {
            version: 1,
            timestamp: now,
            previous: last.id(),
            consensus: ConsensusData {
                base_target,
                generation_signature,
            },
            generator,
            payload: self.packer.pack_unconfirmed(),
            signature: Vec::new(),
        };
        crypto::sign_block(&mut block, keypair);

        tracing::info!(block_id = %block.id(), base_target, "forged block");
        Some(block)
    }

    /// Dispatch a generation attempt to the blocking thread pool.
    ///
    /// Non-blocking initiation with an eventually observable result, which
    /// is the concurrency contract generation needs. There is no explicit
    /// cancellation: an attempt that loses the race produces a block that
    /// fails validation against the new tip, or is discarded unbroadcast.
    pub fn spawn_generation(
        self: &Arc<Self>,
        keypair: KeyPair,
    ) -> tokio::task::JoinHandle<Option<Block>> {
        let engine = Arc::clone(self);
        tokio::task::spawn_blocking(move || engine.try_generate_next_block(&keypair))
    }
}
