// RSA Decryption Implementation
// Inverse of the fixed-block stream encryption, same byte order both ways

use std::io::{Read, Write};

use tracing::{debug, trace, warn};
use zeroize::Zeroizing;

use super::bigint::{from_bytes_le, to_bytes_le_fixed};
use super::block::{check_modulus, fits_modulus, read_block, BLOCKSIZE, CIPHER_BLOCKSIZE};
use super::keygen::RsaKeyPair;
use crate::error::{RsaError, RsaResult};

/// Decrypt one ciphertext field back into a plaintext block
pub fn decrypt_block(keypair: &RsaKeyPair, block: &[u8; CIPHER_BLOCKSIZE]) -> RsaResult<[u8; BLOCKSIZE]> {
    let c = from_bytes_le(block);
    if !fits_modulus(&c, keypair) {
        return Err(RsaError::CiphertextOutOfRange);
    }

    let m = keypair.decrypt_value(&c);
    let bytes = Zeroizing::new(
        to_bytes_le_fixed(&m, BLOCKSIZE).ok_or_else(|| RsaError::PlaintextOverflow {
            len: m.bits().div_ceil(8) as usize,
        })?,
    );
    let mut out = [0u8; BLOCKSIZE];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Decrypt a ciphertext stream into `output`.
///
/// Every block decrypts to a full BLOCKSIZE bytes, so the zero padding of
/// the final plaintext block comes back as trailing zero bytes.
/// Returns the number of blocks decrypted.
pub fn decrypt<R, W>(keypair: &RsaKeyPair, input: &mut R, output: &mut W) -> RsaResult<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    check_modulus(keypair)?;

    let mut buf = [0u8; CIPHER_BLOCKSIZE];
    let mut blocks = 0u64;
    loop {
        let read = read_block(input, &mut buf)?;
        if read == 0 {
            break;
        }
        if read < CIPHER_BLOCKSIZE {
            warn!(block = blocks + 1, read, "ciphertext stream truncated");
            return Err(RsaError::TruncatedBlock { len: read });
        }

        let m = Zeroizing::new(decrypt_block(keypair, &buf)?);
        output.write_all(&m[..])?;
        blocks += 1;
        trace!(block = blocks, "decrypted block");
    }
    output.flush()?;

    debug!(blocks, "decryption finished");
    Ok(blocks)
}

/// Decrypt ciphertext bytes using the keypair's private exponent
pub fn decrypt_bytes(ciphertext: &[u8], keypair: &RsaKeyPair) -> RsaResult<Vec<u8>> {
    let mut input = ciphertext;
    let mut out = Vec::with_capacity(ciphertext.len() / 2);
    decrypt(keypair, &mut input, &mut out)?;
    Ok(out)
}
