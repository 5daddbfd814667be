//! Secret-key derivation: canonical mnemonic + index → 32-byte SK
//!
//! The mnemonic is expanded to a BIP-39 seed with an empty passphrase
//! (checksum verified), then walked down the fixed BIP-44 Ethereum path.
//! Hardened steps cover purpose/coin/account; the change and address-index
//! steps are non-hardened, matching the literal path
//! `m/44'/60'/0'/0/<index>`.

use bip32::{DerivationPath, XPrv};
use bip39::{Language, Mnemonic};
use zeroize::{Zeroize, Zeroizing};

use txlock_core::{build_path, TxlockError, TxlockResult};

use crate::SK_SIZE;

/// A derived 256-bit secret key. Zeroized on drop.
///
/// Never logged, never persisted: the key lives only for the duration of one
/// seal or open call.
#[derive(Clone)]
pub struct SecretKey {
    bytes: [u8; SK_SIZE],
}

impl SecretKey {
    pub fn from_bytes(bytes: [u8; SK_SIZE]) -> Self {
        Self { bytes }
    }

    /// Construct from a raw slice, rejecting anything that is not exactly
    /// 32 bytes. This is the misuse surface for callers holding key material
    /// outside the derivation pipeline (test vectors, imports).
    pub fn from_slice(bytes: &[u8]) -> TxlockResult<Self> {
        let bytes: [u8; SK_SIZE] = bytes.try_into().map_err(|_| TxlockError::InvalidSk)?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; SK_SIZE] {
        &self.bytes
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive the per-index secret key from a canonical mnemonic.
///
/// The mnemonic must already be canonical (see `txlock_core::canonicalize`);
/// BIP-39 checksum failures map to `InvalidMnemonic`, index-rule failures to
/// `InvalidIndex`, and BIP-32 failures to `Derivation`. The returned key is
/// a fresh buffer, not an alias into the child key.
pub fn derive_sk(mnemonic_canonical: &str, index: &str) -> TxlockResult<SecretKey> {
    if mnemonic_canonical.is_empty() {
        return Err(TxlockError::InvalidMnemonic);
    }
    let path = build_path(index)?;

    let mnemonic = Mnemonic::parse_in(Language::English, mnemonic_canonical)
        .map_err(|_| TxlockError::InvalidMnemonic)?;
    let seed = Zeroizing::new(mnemonic.to_seed(""));

    let derivation: DerivationPath = path.parse().map_err(|_| TxlockError::Derivation)?;
    let child =
        XPrv::derive_from_path(&seed[..], &derivation).map_err(|_| TxlockError::Derivation)?;

    let mut scalar: [u8; SK_SIZE] = child.private_key().to_bytes().into();
    let sk = SecretKey::from_bytes(scalar);
    scalar.zeroize();
    Ok(sk)
}
