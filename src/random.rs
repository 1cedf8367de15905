//! Range helpers over any `RngCore`
//!
//! Empty ranges collapse to their lower bound instead of panicking.

use rand::{Rng, RngCore};

/// Uniform integer in `[0, n)`
#[inline]
pub fn below<R: RngCore>(rng: &mut R, n: u32) -> u32 {
    if n == 0 {
        return 0;
    }
    rng.gen_range(0..n)
}

/// Uniform index in `[0, n)`
#[inline]
pub fn index<R: RngCore>(rng: &mut R, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    rng.gen_range(0..n)
}

/// Uniform integer in `[lo, hi)`
#[inline]
pub fn between<R: RngCore>(rng: &mut R, lo: i32, hi: i32) -> i32 {
    if hi <= lo {
        return lo;
    }
    rng.gen_range(lo..hi)
}

/// Random byte covering the full `0..=255` range
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub fn byte<R: RngCore>(rng: &mut R) -> u8 {
    rng.next_u32() as u8
}
