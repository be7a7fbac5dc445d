// RSA Big Integer Operations
// Wrapper around num-bigint for RSA-specific operations

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Read an unsigned integer stored least-significant byte first
pub fn from_bytes_le(bytes: &[u8]) -> RsaBigInt {
    RsaBigInt::from_bytes_le(bytes)
}

/// Write `n` least-significant byte first into a field of exactly `width` bytes,
/// zero-extending the high-order end.
///
/// Returns `None` when `n` needs more than `width` bytes.
pub fn to_bytes_le_fixed(n: &RsaBigInt, width: usize) -> Option<Vec<u8>> {
    let mut bytes = if n.is_zero() { Vec::new() } else { n.to_bytes_le() };
    if bytes.len() > width {
        return None;
    }
    bytes.resize(width, 0);
    Some(bytes)
}

/// Modular exponentiation: base^exp mod modulus
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }
    base.modpow(exp, modulus)
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}

/// Euler's totient of n = p*q for distinct primes: (p-1)(q-1)
pub fn totient(p: &RsaBigInt, q: &RsaBigInt) -> RsaBigInt {
    (p - 1u8) * (q - 1u8)
}
