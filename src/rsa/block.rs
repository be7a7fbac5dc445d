// Block Framing
// Fixed-size block layout shared by encryption and decryption
//
// Wire format: plaintext is cut into BLOCKSIZE-byte blocks, the last one
// zero-padded. Each block is read as an unsigned integer least-significant
// byte first and its ciphertext is written, in the same byte order, into a
// CIPHER_BLOCKSIZE-byte field. The ciphertext stream is a bare concatenation
// of those fields. Blocks are independent, so equal plaintext blocks give
// equal ciphertext blocks.

use std::io::{self, Read};

use super::bigint::RsaBigInt;
use super::keygen::RsaKeyPair;
use crate::error::{RsaError, RsaResult};

/// Plaintext block size in bytes
pub const BLOCKSIZE: usize = 16;

/// Ciphertext block size in bytes
pub const CIPHER_BLOCKSIZE: usize = BLOCKSIZE * 2;

/// Every plaintext block value must be below n, and every value below n
/// must fit in a ciphertext block.
pub fn check_modulus(keypair: &RsaKeyPair) -> RsaResult<()> {
    let bits = keypair.modulus_bits();
    let min_bits = (BLOCKSIZE * 8) as u64 + 1;
    let max_bits = (CIPHER_BLOCKSIZE * 8) as u64;
    if bits < min_bits || bits > max_bits {
        return Err(RsaError::ModulusOutOfRange { bits });
    }
    Ok(())
}

/// Fill `buf` from `reader`, stopping early only at end of stream.
/// Returns the number of bytes read.
pub fn read_block<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Number of ciphertext bytes produced for `plaintext_len` bytes of input
pub fn ciphertext_len(plaintext_len: usize) -> usize {
    plaintext_len.div_ceil(BLOCKSIZE) * CIPHER_BLOCKSIZE
}

pub(crate) fn fits_modulus(value: &RsaBigInt, keypair: &RsaKeyPair) -> bool {
    value < keypair.n()
}
