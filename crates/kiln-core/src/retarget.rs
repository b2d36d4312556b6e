//! Base-target retargeting.
//!
//! The base target is recomputed every *other* block from the timing of the
//! last [`RETARGET_WINDOW`](crate::constants::RETARGET_WINDOW) blocks: when
//! blocks arrive slower than the target delay the base target rises (forging
//! gets easier), when they arrive faster it is damped down by
//! [`BASE_TARGET_GAMMA`](crate::constants::BASE_TARGET_GAMMA) percent-of-gap.
//! The observed average is clamped to `[53, 67]` seconds before it enters the
//! formula, and the result is clamped to
//! `[MIN_BASE_TARGET, MAX_BASE_TARGET]`.
//!
//! All arithmetic is integer with truncation toward zero. The retargeting
//! curve is part of the consensus contract: any rounding divergence forks the
//! chain, which is why the computation below spells out the exact division
//! order instead of simplifying the expression.

use crate::constants::{
    BASE_TARGET_GAMMA, MAX_BASE_TARGET, MAX_BLOCKTIME_LIMIT_SECS, MIN_BASE_TARGET,
    MIN_BLOCKTIME_LIMIT_SECS, MS_PER_SEC,
};

/// Compute the base target a child of the block at `prev_height` must carry.
///
/// `window_timestamps` are the millisecond timestamps of the last (up to 3)
/// blocks ending at and including the previous block, ordered oldest first.
/// `candidate_timestamp` is the millisecond timestamp the new block claims.
///
/// At odd `prev_height` the previous base target is returned unchanged;
/// retargeting happens only every other block. At even heights the observed
/// block-time average in whole seconds is
/// `(candidate_timestamp - window[0]) / window.len() / 1000` (this division
/// order is fixed protocol behaviour), and the new target is:
///
/// - average > delay: `prev * min(average, 67) / delay`
/// - otherwise: `prev - prev * 64 * (delay - max(average, 53)) / (delay * 100)`
///
/// clamped so that a result above [`MAX_BASE_TARGET`] (or negative) becomes
/// `MAX_BASE_TARGET` and a result below [`MIN_BASE_TARGET`] becomes
/// `MIN_BASE_TARGET`. The negative-goes-to-max ordering is a protocol quirk
/// inherited from the reference chain and must not be "fixed".
pub fn next_base_target(
    prev_height: u64,
    prev_base_target: u64,
    window_timestamps: &[u64],
    candidate_timestamp: u64,
    avg_delay_secs: u64,
) -> u64 {
    if prev_height % 2 == 1 {
        return prev_base_target;
    }

    // Guards: an empty window or a zero delay cannot occur with a sane
    // History / validated configuration.
    if window_timestamps.is_empty() || avg_delay_secs == 0 {
        return prev_base_target;
    }

    let span_ms = candidate_timestamp.saturating_sub(window_timestamps[0]);
    let blocktime_average = span_ms / window_timestamps.len() as u64 / MS_PER_SEC;

    let prev = prev_base_target as i128;
    let delay = avg_delay_secs as i128;

    let raw: i128 = if blocktime_average > avg_delay_secs {
        let capped = blocktime_average.min(MAX_BLOCKTIME_LIMIT_SECS) as i128;
        prev * capped / delay
    } else {
        let floored = blocktime_average.max(MIN_BLOCKTIME_LIMIT_SECS) as i128;
        prev - prev * BASE_TARGET_GAMMA as i128 * (delay - floored) / (delay * 100)
    };

    if raw < 0 || raw > MAX_BASE_TARGET as i128 {
        MAX_BASE_TARGET
    } else if raw < MIN_BASE_TARGET as i128 {
        MIN_BASE_TARGET
    } else {
        raw as u64
    }
}
