// RSA Encryption Implementation
// Fixed-block stream encryption (no padding scheme, no chaining)

use std::io::{Read, Write};

use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::bigint::{from_bytes_le, to_bytes_le_fixed};
use super::block::{check_modulus, ciphertext_len, read_block, BLOCKSIZE, CIPHER_BLOCKSIZE};
use super::keygen::RsaKeyPair;
use crate::error::{RsaError, RsaResult};

/// Encrypt one plaintext block into a ciphertext field
pub fn encrypt_block(keypair: &RsaKeyPair, block: &[u8; BLOCKSIZE]) -> RsaResult<[u8; CIPHER_BLOCKSIZE]> {
    let m = from_bytes_le(block);
    let c = keypair.encrypt_value(&m);

    // c < n <= 2^256 once the modulus is checked
    let bytes = to_bytes_le_fixed(&c, CIPHER_BLOCKSIZE).ok_or(RsaError::ModulusOutOfRange {
        bits: keypair.modulus_bits(),
    })?;
    let mut out = [0u8; CIPHER_BLOCKSIZE];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Encrypt everything `input` yields into `output`.
/// Returns the number of ciphertext blocks written; empty input writes none.
pub fn encrypt<R, W>(keypair: &RsaKeyPair, input: &mut R, output: &mut W) -> RsaResult<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    check_modulus(keypair)?;

    let mut buf = Zeroizing::new([0u8; BLOCKSIZE]);
    let mut blocks = 0u64;
    loop {
        let read = read_block(input, &mut buf[..])?;
        if read == 0 {
            break;
        }
        // zero-pad the final short block
        buf[read..].fill(0);

        let c = encrypt_block(keypair, &buf)?;
        output.write_all(&c)?;
        blocks += 1;
        trace!(block = blocks, read, "encrypted block");

        if read < BLOCKSIZE {
            break;
        }
    }
    output.flush()?;

    debug!(blocks, "encryption finished");
    Ok(blocks)
}

/// Encrypt bytes using the keypair's public exponent
pub fn encrypt_bytes(plaintext: &[u8], keypair: &RsaKeyPair) -> RsaResult<Vec<u8>> {
    let mut input = plaintext;
    let mut out = Vec::with_capacity(ciphertext_len(plaintext.len()));
    encrypt(keypair, &mut input, &mut out)?;
    Ok(out)
}
