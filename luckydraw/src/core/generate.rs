//! Random draw algorithms.
//!
//! Both generators take the RNG as a parameter so callers decide between
//! `thread_rng()` and a seeded `StdRng`.

use std::collections::BTreeSet;

use rand::Rng;

use crate::core::types::{
    LOTTO_MAX, LOTTO_MIN, LOTTO_PICKS, LottoSet, PENSION_GROUPS, PENSION_SERIAL_MAX, PensionDraw,
};

/// Draw six distinct lotto numbers.
///
/// Rejection sampling: pick uniformly from `1..=45` and insert until six
/// distinct values are held. While fewer than six are held, each pick is new
/// with probability at least 40/45, so the loop ends with probability 1 after
/// `sum(45 / (45 - k), k = 0..5)` (about 6.36) picks on average.
pub fn draw_lotto<R: Rng + ?Sized>(rng: &mut R) -> LottoSet {
    sample_lotto(rng).0
}

/// Like [`draw_lotto`] but also returns how many picks it took.
pub(crate) fn sample_lotto<R: Rng + ?Sized>(rng: &mut R) -> (LottoSet, u32) {
    let mut drawn = BTreeSet::new();
    let mut picks = 0u32;
    while drawn.len() < LOTTO_PICKS {
        drawn.insert(rng.gen_range(LOTTO_MIN..=LOTTO_MAX));
        picks += 1;
    }
    let mut numbers = [0u8; LOTTO_PICKS];
    for (slot, n) in numbers.iter_mut().zip(drawn) {
        *slot = n;
    }
    (LottoSet::from_sorted(numbers), picks)
}

/// Draw one pension ticket: group `1..=5`, serial `0..=999999`.
pub fn draw_pension<R: Rng + ?Sized>(rng: &mut R) -> PensionDraw {
    let group = rng.gen_range(1..=PENSION_GROUPS);
    let serial = rng.gen_range(0..=PENSION_SERIAL_MAX);
    PensionDraw::from_parts(group, serial)
}
