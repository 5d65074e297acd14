//! Error type shared by every stage of the notification pipeline.
//!
//! Nothing here is retried internally: each variant aborts the request and
//! is surfaced to the caller of [`Gateway::serve`](crate::Gateway::serve).

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The configured AES key is not valid base64 or not 32 bytes long.
    #[error("invalid encoding aes key: {0}")]
    InvalidKey(String),

    /// `msg_signature` does not match the encrypted envelope.
    #[error("invalid signature")]
    InvalidSignature,

    /// Handshake signature check failed.
    #[error("request server is invalid")]
    InvalidSource,

    #[error("invalid content type: {0}")]
    UnsupportedContentType(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),

    /// Bad base64, misaligned ciphertext, bad padding or a truncated frame.
    #[error("decrypt error: {0}")]
    Decrypt(String),

    #[error("encrypt error: {0}")]
    Encrypt(String),

    /// `MsgType` or `Event` outside the platform catalog.
    #[error("unexpected message type '{0}'")]
    UnexpectedType(String),

    #[error("invalid request method: {0}")]
    InvalidMethod(String),
}
