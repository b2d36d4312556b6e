//! Per-block chain score.
//!
//! A block contributes `floor(2^64 / base_target)` to its chain's cumulative
//! weight; the heavier of two competing chains wins. Lower base target means
//! harder forging and therefore a larger score contribution.

/// Score contribution of a single block.
///
/// # Panics
///
/// Asserts that `base_target` is positive. The retarget clamps guarantee
/// this for every block in a valid chain; a zero or "negative" base target
/// reaching this point would silently corrupt score comparisons chain-wide,
/// so it is treated as a programming error rather than a recoverable one.
pub fn block_score(base_target: u64) -> u128 {
    assert!(base_target > 0, "base target must be strictly positive");
    (1u128 << 64) / base_target as u128
}

/// Cumulative weight of a chain given its blocks' base targets.
///
/// Scores are additive; this is the quantity fork choice compares.
pub fn chain_score<I: IntoIterator<Item = u64>>(base_targets: I) -> u128 {
    base_targets.into_iter().map(block_score).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{INITIAL_BASE_TARGET, MAX_BASE_TARGET, MIN_BASE_TARGET};
    use proptest::prelude::*;

    #[test]
    fn genesis_score_value() {
        // floor(2^64 / 153722867)
        assert_eq!(block_score(INITIAL_BASE_TARGET), 120_000_000_219);
    }

    #[test]
    fn score_at_clamp_bounds_is_positive() {
        assert!(block_score(MIN_BASE_TARGET) > 0);
        assert!(block_score(MAX_BASE_TARGET) > 0);
        // Harder forging (lower target) scores higher.
        assert!(block_score(MIN_BASE_TARGET) > block_score(MAX_BASE_TARGET));
    }

    #[test]
    fn chain_score_is_additive() {
        let targets = [INITIAL_BASE_TARGET, MIN_BASE_TARGET, MAX_BASE_TARGET];
        let sum: u128 = targets.iter().map(|&t| block_score(t)).sum();
        assert_eq!(chain_score(targets), sum);
    }

    #[test]
    fn empty_chain_scores_zero() {
        assert_eq!(chain_score([0u64; 0]), 0);
    }

    #[test]
    #[should_panic(expected = "strictly positive")]
    fn zero_base_target_asserts() {
        block_score(0);
    }

    proptest! {
        #[test]
        fn score_positive_over_clamped_range(bt in MIN_BASE_TARGET..=MAX_BASE_TARGET) {
            prop_assert!(block_score(bt) > 0);
        }

        #[test]
        fn score_is_antitone(a in 1u64..u64::MAX, b in 1u64..u64::MAX) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(block_score(lo) >= block_score(hi));
        }
    }
}
