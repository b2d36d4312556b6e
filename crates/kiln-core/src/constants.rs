//! Protocol constants.
//!
//! Everything in this module except [`AVG_DELAY_SECS`] is consensus-critical:
//! changing any of these values forks the chain. `AVG_DELAY_SECS` is only the
//! *default* for the one tunable the engine accepts at construction time.

/// Base target of the genesis block. Anchors the difficulty curve for every
/// replaying node and must be reproduced exactly.
pub const INITIAL_BASE_TARGET: u64 = 153_722_867;

/// Upper clamp for the retargeting algorithm: `INITIAL_BASE_TARGET * 50`.
pub const MAX_BASE_TARGET: u64 = INITIAL_BASE_TARGET * 50;

/// Lower clamp for the retargeting algorithm: `INITIAL_BASE_TARGET * 9 / 10`.
pub const MIN_BASE_TARGET: u64 = INITIAL_BASE_TARGET * 9 / 10;

/// Damping factor for the tightening branch of the retarget formula.
pub const BASE_TARGET_GAMMA: u64 = 64;

/// Floor applied to the observed block-time average (seconds) when
/// tightening difficulty.
pub const MIN_BLOCKTIME_LIMIT_SECS: u64 = 53;

/// Ceiling applied to the observed block-time average (seconds) when
/// easing difficulty.
pub const MAX_BLOCKTIME_LIMIT_SECS: u64 = 67;

/// Default target delay between blocks, in seconds. Tunable per deployment
/// at engine construction; the engine crate carries the knob.
pub const AVG_DELAY_SECS: u64 = 60;

/// Number of trailing blocks (ending at and including the previous block)
/// whose timestamps feed the block-time average.
pub const RETARGET_WINDOW: usize = 3;

/// Confirmation depth at which a forger's effective balance is read.
pub const EFFECTIVE_BALANCE_DEPTH: u64 = 1440;

/// Length of a generation signature in bytes.
pub const GENERATION_SIGNATURE_LEN: usize = 32;

/// Length of the encoded base-target field in bytes.
pub const BASE_TARGET_LEN: usize = 8;

/// Minimum length of an encoded consensus-data field.
pub const CONSENSUS_DATA_MIN_LEN: usize = BASE_TARGET_LEN + GENERATION_SIGNATURE_LEN;

/// Block timestamps are milliseconds since the Unix epoch.
pub const MS_PER_SEC: u64 = 1000;
