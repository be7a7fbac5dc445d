//! Arbitrary-precision RSA engine.
//!
//! Key generation draws primes through a Miller-Rabin test and derives the
//! private exponent with the extended Euclidean algorithm. The block codec
//! encrypts byte streams in independent 16-byte blocks (ECB-equivalent: equal
//! plaintext blocks give equal ciphertext blocks) with no padding scheme and
//! no integrity protection. It is a teaching engine, not a hardened RSA.

pub mod error;
pub mod rsa;

pub use error::{RsaError, RsaResult};
pub use rsa::{
    decrypt, decrypt_bytes, encrypt, encrypt_bytes, generate_default_keypair, generate_keypair,
    is_probable_prime, mod_inverse, KeyGenConfig, KeyGenStats, KeyGenerator, RandomSource, RsaKeyPair,
    BLOCKSIZE, CIPHER_BLOCKSIZE,
};
