// Miller-Rabin Primality Test
// Probabilistic primality check with caller-supplied randomness

use num_integer::Integer;
use num_traits::One;

use super::bigint::{from_u64, mod_pow, RsaBigInt};
use super::random::RandomSource;

/// Miller-Rabin primality test
/// Returns true if n is probably prime
///
/// Each round draws an independent witness from `[2, n-2]`, so a composite
/// survives all `rounds` with probability at most `4^-rounds`. The first
/// round that proves compositeness ends the test.
pub fn is_probable_prime<R>(n: &RsaBigInt, rounds: u32, rng: &mut R) -> bool
where
    R: RandomSource + ?Sized,
{
    let two = from_u64(2);
    let three = from_u64(3);
    if n < &two {
        return false;
    }
    // 2 and 3 are prime; the witness range [2, n-2] only exists from n = 5 on
    if n == &two || n == &three {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // Write n-1 as 2^s * d with d odd
    let n_minus_one: RsaBigInt = n - 1u8;
    let mut d = n_minus_one.clone();
    let mut s = 0u64;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    for _ in 0..rounds {
        // upper bound is exclusive: a lands in [2, n-2]
        let a = rng.next_in_range(&two, &n_minus_one);
        if !witness_passes(&a, &d, s, n, &n_minus_one) {
            return false;
        }
    }

    // Probably prime
    true
}

/// One Miller-Rabin round for witness `a`
fn witness_passes(a: &RsaBigInt, d: &RsaBigInt, s: u64, n: &RsaBigInt, n_minus_one: &RsaBigInt) -> bool {
    let mut x = mod_pow(a, d, n);
    if x.is_one() || &x == n_minus_one {
        return true;
    }

    for _ in 1..s {
        x = mod_pow(&x, &from_u64(2), n);
        if &x == n_minus_one {
            return true;
        }
        // a nontrivial square root of 1 exposes n
        if x.is_one() {
            return false;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ROUNDS: u32 = 20;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn test_small_primes() {
        let mut rng = rng();
        for p in [2u64, 3, 5, 7, 11, 13, 97, 7919, 65537] {
            assert!(is_probable_prime(&from_u64(p), ROUNDS, &mut rng), "{} is prime", p);
        }
    }

    #[test]
    fn test_small_composites() {
        let mut rng = rng();
        for c in [0u64, 1, 4, 9, 15, 21, 25, 91, 7917, 65535] {
            assert!(!is_probable_prime(&from_u64(c), ROUNDS, &mut rng), "{} is composite", c);
        }
    }

    #[test]
    fn test_carmichael_numbers() {
        let mut rng = rng();
        for c in [561u64, 1105, 1729, 2465, 2821, 6601, 8911, 41041] {
            assert!(!is_probable_prime(&from_u64(c), ROUNDS, &mut rng), "{} is a Carmichael number", c);
        }
    }

    #[test]
    fn test_large_known_primes() {
        let mut rng = rng();
        let one = RsaBigInt::one();
        // 2^255 - 19 (77 digits) and the Mersenne prime 2^521 - 1
        let p25519 = (&one << 255u32) - 19u8;
        let m521 = (&one << 521u32) - 1u8;
        assert!(is_probable_prime(&p25519, ROUNDS, &mut rng));
        assert!(is_probable_prime(&m521, ROUNDS, &mut rng));

        let product = &p25519 * &((&one << 127u32) - 1u8);
        assert!(!is_probable_prime(&product, ROUNDS, &mut rng));
    }

    #[test]
    fn test_zero_rounds_only_screens_parity() {
        let mut rng = rng();
        assert!(is_probable_prime(&from_u64(561), 0, &mut rng));
        assert!(!is_probable_prime(&from_u64(562), 0, &mut rng));
    }
}
