//! Candidate reordering between drops
//!
//! Fisher–Yates over a cloned buffer: the input order is never touched, the
//! caller swaps in the returned permutation. Gating (no shuffle while a ball
//! is in flight) is the engine's job, not this module's.

use rand::Rng;
use rand::seq::SliceRandom;

/// Produce a uniformly random permutation of `items`.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}
