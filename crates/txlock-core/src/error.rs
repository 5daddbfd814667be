use thiserror::Error;

pub type TxlockResult<T> = Result<T, TxlockError>;

/// Error taxonomy for the txlock protocol layer.
///
/// `Decrypt` is the only variant surfaced for failures an attacker can
/// trigger: parse, decode, and tag failures all collapse into it so the
/// error channel does not reveal which gate rejected the input. The other
/// variants describe caller misuse and are never reachable from envelope
/// data alone. No variant carries secret material in its message.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TxlockError {
    #[error("invalid mnemonic")]
    InvalidMnemonic,

    #[error("invalid index")]
    InvalidIndex,

    #[error("derivation failed")]
    Derivation,

    #[error("invalid secret key")]
    InvalidSk,

    #[error("invalid derivation path")]
    InvalidPath,

    #[error("random read failed")]
    RandomRead,

    #[error("encrypt failed")]
    Encrypt,

    #[error("decrypt failed")]
    Decrypt,
}
