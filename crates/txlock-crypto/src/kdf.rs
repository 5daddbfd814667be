//! HKDF-SHA256 (RFC 5869) and the per-seal AEAD key
//!
//! The info string is a frozen protocol constant: changing a single byte of
//! it derives a different AEAD key from the same inputs and makes every
//! historical envelope unrecoverable.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use txlock_core::{TxlockError, TxlockResult};

use crate::derive::SecretKey;
use crate::{KEY_SIZE, SALT_SIZE};

/// Domain-separation label for the v1 AEAD key.
pub const INFO_V1: &[u8] = b"txlock:v1|chain=ethereum|path=bip44|kdf=hkdf-sha256|aead=aes-256-gcm";

/// HKDF-SHA256 extract-then-expand.
///
/// Fails only when `len` exceeds the RFC 5869 ceiling of 255 * 32 bytes,
/// which is caller misuse; the protocol itself always asks for 32.
pub fn hkdf_sha256(
    ikm: &[u8],
    salt: &[u8],
    info: &[u8],
    len: usize,
) -> TxlockResult<Zeroizing<Vec<u8>>> {
    let mut okm = Zeroizing::new(vec![0u8; len]);
    Hkdf::<Sha256>::new(Some(salt), ikm)
        .expand(info, &mut okm)
        .map_err(|_| TxlockError::Encrypt)?;
    Ok(okm)
}

/// Derive the 32-byte AES-256-GCM key for one seal/open call.
pub(crate) fn derive_aead_key(
    sk: &SecretKey,
    salt: &[u8; SALT_SIZE],
) -> TxlockResult<Zeroizing<[u8; KEY_SIZE]>> {
    let mut okm = Zeroizing::new([0u8; KEY_SIZE]);
    Hkdf::<Sha256>::new(Some(salt), sk.as_bytes())
        .expand(INFO_V1, okm.as_mut())
        .map_err(|_| TxlockError::Encrypt)?;
    Ok(okm)
}
