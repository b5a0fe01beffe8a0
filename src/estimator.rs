//! ## Cardinality estimator
//! Bias-corrected harmonic mean of `2^-rank` over all registers, with three numeric regimes:
//! - `E <= 2.5 * M`: linear counting while any register is still zero, raw estimate otherwise.
//! - `E <= 2^32 / 30`: raw estimate.
//! - above: large range correction for hash collisions near the 32-bit hash space limit.
//!
//! [Original HyperLogLog paper](https://algo.inria.fr/flajolet/Publications/FlFuGaMe07.pdf)
//!
//! Registers are read on demand, nothing is cached between calls.

use crate::sketch::Sketch;

/// Size of the 32-bit hash space
const HASH_SPACE: f64 = 4_294_967_296.0;

/// Return cardinality estimate of the given register array of a `Sketch<B>`
pub(crate) fn estimate<const B: usize>(registers: &[u8]) -> u64 {
    let m = Sketch::<B>::M;
    debug_assert_eq!(registers.len(), m);
    let mut sum = 0.0f64;
    let mut non_zeros = 0usize;
    for &rank in registers {
        sum += 1.0 / ((1u64 << rank) as f64);
        non_zeros += usize::from(rank != 0);
    }

    // zero registers contribute `2^0` each to the harmonic sum
    let zeros = m - non_zeros;
    let mf = m as f64;
    let estimate = Sketch::<B>::ALPHA * mf * mf / (sum + zeros as f64);

    let corrected = if estimate <= 2.5 * mf {
        if zeros == 0 {
            estimate
        } else {
            mf * (mf / zeros as f64).ln()
        }
    } else if estimate <= HASH_SPACE / 30.0 {
        estimate
    } else {
        // `1 - E/2^32` reaches zero once `E >= 2^32`, saturate instead of producing NaN
        let remaining = (1.0 - estimate / HASH_SPACE).max(f64::MIN_POSITIVE);
        -HASH_SPACE * remaining.ln()
    };

    corrected.round() as u64
}
