//! Mnemonic canonicalization
//!
//! Every entry point normalizes the mnemonic to one stable representation
//! before key derivation, so equivalent inputs ("ABANDON  abandon" vs
//! "abandon abandon") always derive the same key. The canonical form is
//! lowercase words joined by single spaces.

use zeroize::Zeroizing;

use crate::error::{TxlockError, TxlockResult};

/// Collapse whitespace runs and ASCII-lowercase each word.
///
/// Returns `InvalidMnemonic` when nothing remains after collapsing. The
/// result is idempotent: canonicalizing a canonical mnemonic is a no-op.
/// BIP-39 checksum validity is not checked here; that is the derivation
/// layer's job.
pub fn canonicalize(raw: &str) -> TxlockResult<Zeroizing<String>> {
    let mut out = String::with_capacity(raw.len());
    for word in raw.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        for c in word.chars() {
            out.push(c.to_ascii_lowercase());
        }
    }
    if out.is_empty() {
        return Err(TxlockError::InvalidMnemonic);
    }
    Ok(Zeroizing::new(out))
}
