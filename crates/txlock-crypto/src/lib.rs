//! txlock-crypto: the cryptographic envelope layer
//!
//! Seal pipeline:
//! ```text
//! mnemonic ──BIP-39──▶ 64-byte seed ──BIP-32 m/44'/60'/0'/0/<index>──▶ SK (32)
//! SK + random salt ──HKDF-SHA256──▶ K (32)
//! plaintext ──AES-256-GCM(K, nonce, AAD)──▶ ciphertext ‖ tag
//! ciphertext ──base64 (no padding), 76-column wrap──▶ <!-- … --> envelope
//! ```
//!
//! Every byte of the envelope header and the AAD template participates in
//! authentication, so the serializer and parser in [`envelope`] are strict in
//! both directions: the builder emits exactly one form and the parser accepts
//! exactly that form.
//!
//! The crate is pure: no I/O, no globals, no state between calls. Randomness
//! is injected by the caller, which keeps sealing deterministic under test.

pub mod derive;
pub mod envelope;
pub mod kdf;
pub mod seal;

pub use derive::{derive_sk, SecretKey};
pub use envelope::{build_envelope, parse_envelope, ParsedEnvelope};
pub use seal::{open, seal, Sealed};

/// Size of a derived secret key in bytes.
pub const SK_SIZE: usize = 32;

/// Size of the HKDF-derived AEAD key in bytes.
pub const KEY_SIZE: usize = 32;

/// Size of the per-seal random salt in bytes.
pub const SALT_SIZE: usize = 32;

/// Size of an AES-GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag appended to the ciphertext.
pub const TAG_SIZE: usize = 16;
