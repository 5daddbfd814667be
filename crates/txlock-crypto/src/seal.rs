//! AEAD seal/open with the frozen v1 AAD template
//!
//! AAD layout (seven lines, each `\n`-terminated, no trailing blank line):
//! ```text
//! txlock:v1
//! chain:ethereum
//! path:<path>
//! kdf:hkdf-sha256
//! aead:aes-256-gcm
//! salt_b64:<salt_b64>
//! nonce_b64:<nonce_b64>
//! ```
//!
//! The AAD binds the ciphertext to its derivation path and to the exact
//! base64 renderings of salt and nonce, so swapping any header field of an
//! envelope breaks the tag even when the raw bytes are unchanged.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use rand_core::{CryptoRng, RngCore};

use txlock_core::{index_from_path, TxlockError, TxlockResult};

use crate::derive::SecretKey;
use crate::kdf::derive_aead_key;
use crate::{NONCE_SIZE, SALT_SIZE};

/// Everything a caller needs to frame one sealed plaintext.
#[derive(Debug)]
pub struct Sealed {
    pub salt: [u8; SALT_SIZE],
    pub nonce: [u8; NONCE_SIZE],
    /// AES-GCM output: ciphertext with the 16-byte tag appended.
    pub ciphertext: Vec<u8>,
    pub salt_b64: String,
    pub nonce_b64: String,
}

/// Serialize the v1 AAD block, byte-exact.
pub(crate) fn build_aad(path: &str, salt_b64: &str, nonce_b64: &str) -> Vec<u8> {
    let mut aad = String::with_capacity(96 + path.len() + salt_b64.len() + nonce_b64.len());
    aad.push_str("txlock:v1\n");
    aad.push_str("chain:ethereum\n");
    aad.push_str("path:");
    aad.push_str(path);
    aad.push_str("\nkdf:hkdf-sha256\n");
    aad.push_str("aead:aes-256-gcm\n");
    aad.push_str("salt_b64:");
    aad.push_str(salt_b64);
    aad.push_str("\nnonce_b64:");
    aad.push_str(nonce_b64);
    aad.push('\n');
    aad.into_bytes()
}

/// Seal `plaintext` under the key derived from `sk` and a fresh salt.
///
/// The randomness source supplies 32 salt bytes then 12 nonce bytes; a short
/// read maps to `RandomRead`. The path must match the fixed prefix with a
/// valid index, otherwise `InvalidPath`.
pub fn seal<R>(
    sk: &SecretKey,
    path: &str,
    plaintext: &[u8],
    rng: &mut R,
) -> TxlockResult<Sealed>
where
    R: RngCore + CryptoRng,
{
    if index_from_path(path).is_none() {
        return Err(TxlockError::InvalidPath);
    }

    let mut salt = [0u8; SALT_SIZE];
    rng.try_fill_bytes(&mut salt)
        .map_err(|_| TxlockError::RandomRead)?;
    let mut nonce = [0u8; NONCE_SIZE];
    rng.try_fill_bytes(&mut nonce)
        .map_err(|_| TxlockError::RandomRead)?;

    let key = derive_aead_key(sk, &salt)?;
    let cipher = Aes256Gcm::new_from_slice(&key[..]).map_err(|_| TxlockError::Encrypt)?;

    let salt_b64 = STANDARD_NO_PAD.encode(salt);
    let nonce_b64 = STANDARD_NO_PAD.encode(nonce);
    let aad = build_aad(path, &salt_b64, &nonce_b64);

    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad: &aad,
            },
        )
        .map_err(|_| TxlockError::Encrypt)?;

    Ok(Sealed {
        salt,
        nonce,
        ciphertext,
        salt_b64,
        nonce_b64,
    })
}

/// Open a sealed ciphertext.
///
/// `salt_b64` and `nonce_b64` enter the AAD verbatim, exactly as the sealer
/// wrote them. Every attacker-reachable failure (base64 decode, length, tag)
/// collapses into `Decrypt` so the error channel says nothing about which
/// gate rejected the input.
pub fn open(
    sk: &SecretKey,
    path: &str,
    salt_b64: &str,
    nonce_b64: &str,
    ciphertext: &[u8],
) -> TxlockResult<Vec<u8>> {
    if index_from_path(path).is_none() {
        return Err(TxlockError::InvalidPath);
    }

    let salt: [u8; SALT_SIZE] = STANDARD_NO_PAD
        .decode(salt_b64)
        .ok()
        .and_then(|raw| raw.try_into().ok())
        .ok_or(TxlockError::Decrypt)?;
    let nonce: [u8; NONCE_SIZE] = STANDARD_NO_PAD
        .decode(nonce_b64)
        .ok()
        .and_then(|raw| raw.try_into().ok())
        .ok_or(TxlockError::Decrypt)?;

    let key = derive_aead_key(sk, &salt).map_err(|_| TxlockError::Decrypt)?;
    let cipher = Aes256Gcm::new_from_slice(&key[..]).map_err(|_| TxlockError::Decrypt)?;
    let aad = build_aad(path, salt_b64, nonce_b64);

    cipher
        .decrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: ciphertext,
                aad: &aad,
            },
        )
        .map_err(|_| TxlockError::Decrypt)
}
