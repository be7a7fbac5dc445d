// Randomness Source
// Narrow interface the engine draws all of its randomness through

use num_bigint::RandBigInt;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

use super::bigint::RsaBigInt;

/// Source of uniformly distributed big integers.
///
/// Implemented for every cryptographically secure `rand` generator, so
/// production code passes `rand::rngs::OsRng` and tests pass a seeded
/// `rand::rngs::StdRng`.
pub trait RandomSource {
    /// Uniform value in `[0, 2^bits)`
    fn next_bits(&mut self, bits: u64) -> RsaBigInt;

    /// Uniform value in `[0, bound)`; `bound` must be non-zero
    fn next_below(&mut self, bound: &RsaBigInt) -> RsaBigInt;

    /// Uniform value in `[low, high)`; requires `low < high`
    fn next_in_range(&mut self, low: &RsaBigInt, high: &RsaBigInt) -> RsaBigInt {
        low + self.next_below(&(high - low))
    }

    /// Uniform value with exactly `bits` significant bits (top bit set);
    /// zero bits gives 0
    fn next_exact_bits(&mut self, bits: u64) -> RsaBigInt {
        if bits == 0 {
            return RsaBigInt::zero();
        }
        let top = RsaBigInt::one() << (bits - 1);
        self.next_bits(bits - 1) | top
    }
}

impl<R: RngCore + CryptoRng + ?Sized> RandomSource for R {
    fn next_bits(&mut self, bits: u64) -> RsaBigInt {
        self.gen_biguint(bits)
    }

    fn next_below(&mut self, bound: &RsaBigInt) -> RsaBigInt {
        self.gen_biguint_below(bound)
    }
}
