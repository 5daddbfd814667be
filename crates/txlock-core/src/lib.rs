//! txlock-core: protocol rules shared by the txlock tools
//!
//! Everything here is pure and stateless. The envelope protocol is only as
//! stable as these rules, so they live in one crate that both the crypto
//! layer and the CLI front-ends consume:
//!
//! - mnemonic canonicalization (whitespace collapse + ASCII lowercasing)
//! - the decimal index rule and the fixed BIP-44 derivation path
//! - the error taxonomy every layer maps into

pub mod error;
pub mod index;
pub mod mnemonic;

pub use error::{TxlockError, TxlockResult};
pub use index::{build_path, index_from_path, validate_index, DERIVATION_PREFIX, MAX_INDEX};
pub use mnemonic::canonicalize;
