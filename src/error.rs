// RSA Error Types
// Every fallible operation in the crate reports one of these

use std::io;

use thiserror::Error;

use crate::rsa::bigint::RsaBigInt;

/// Errors produced by key generation and the block codec
#[derive(Debug, Error)]
pub enum RsaError {
    /// Prime search ran out of candidates (entropy starvation or a bad bit size)
    #[error("invalid modulus: no probable prime of {bits} bits after {attempts} candidates")]
    InvalidModulus { bits: u64, attempts: u64 },

    /// gcd(value, modulus) != 1
    #[error("no modular inverse of {value} modulo {modulus}")]
    NoInverse { value: RsaBigInt, modulus: RsaBigInt },

    /// Key generation could not invert e modulo the totient (no values attached)
    #[error("no private exponent exists for the chosen public exponent")]
    NoPrivateExponent,

    #[error("keypair self-check failed: decryption did not invert encryption")]
    KeypairSelfCheckFailed,

    #[error("stream I/O error: {0}")]
    StreamIo(#[from] io::Error),

    #[error("invalid key generation parameters: {0}")]
    InvalidConfig(String),

    /// No public exponent candidate was coprime to the totient
    #[error("no {bits}-bit public exponent coprime to the totient after {attempts} candidates")]
    ExponentSearchExhausted { bits: u64, attempts: u64 },

    #[error("modulus of {bits} bits cannot frame 16-byte blocks (needs 129..=256 bits)")]
    ModulusOutOfRange { bits: u64 },

    #[error("ciphertext ends inside a block ({len} trailing bytes)")]
    TruncatedBlock { len: usize },

    #[error("ciphertext block is not reduced modulo n")]
    CiphertextOutOfRange,

    /// Usually means the wrong key was used for decryption
    #[error("decrypted block needs {len} bytes, more than a plaintext block holds")]
    PlaintextOverflow { len: usize },
}

/// Result type for RSA operations
pub type RsaResult<T> = Result<T, RsaError>;
