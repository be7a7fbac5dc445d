// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod block;
pub mod decrypt;
pub mod encrypt;
pub mod inverse;
pub mod keygen;
pub mod primality;
pub mod random;

pub use block::{BLOCKSIZE, CIPHER_BLOCKSIZE};
pub use decrypt::{decrypt, decrypt_block, decrypt_bytes};
pub use encrypt::{encrypt, encrypt_block, encrypt_bytes};
pub use inverse::mod_inverse;
pub use keygen::{generate_default_keypair, generate_keypair, KeyGenConfig, KeyGenStats, KeyGenerator, RsaKeyPair};
pub use primality::is_probable_prime;
pub use random::RandomSource;
