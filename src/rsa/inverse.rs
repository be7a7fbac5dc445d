// Modular Inverse
// Iterative extended Euclidean algorithm

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use super::bigint::RsaBigInt;
use crate::error::{RsaError, RsaResult};

/// Compute modular inverse: e^(-1) mod modulus
///
/// Returns `d` in `[0, modulus)` with `e*d ≡ 1 (mod modulus)`, or
/// [`RsaError::NoInverse`] when `gcd(e, modulus) != 1`.
pub fn mod_inverse(e: &RsaBigInt, modulus: &RsaBigInt) -> RsaResult<RsaBigInt> {
    if modulus.is_zero() {
        return Err(no_inverse(e, modulus));
    }

    let m = BigInt::from_biguint(Sign::Plus, modulus.clone());
    let (mut r, mut t) = (m.clone(), BigInt::zero());
    let (mut new_r, mut new_t) = (BigInt::from_biguint(Sign::Plus, e.clone()), BigInt::one());

    while !new_r.is_zero() {
        let quotient = r.div_floor(&new_r);
        let next_r = &r - &quotient * &new_r;
        let next_t = &t - &quotient * &new_t;
        r = std::mem::replace(&mut new_r, next_r);
        t = std::mem::replace(&mut new_t, next_t);
    }

    // r = gcd(e, modulus)
    if !r.is_one() {
        return Err(no_inverse(e, modulus));
    }

    if t.is_negative() {
        t += &m;
    }

    t.to_biguint().ok_or_else(|| no_inverse(e, modulus))
}

fn no_inverse(e: &RsaBigInt, modulus: &RsaBigInt) -> RsaError {
    RsaError::NoInverse {
        value: e.clone(),
        modulus: modulus.clone(),
    }
}
