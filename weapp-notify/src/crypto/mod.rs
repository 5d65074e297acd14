//! Cryptography for the notification channel.
//!
//! - `signature`: SHA-1 request signatures (handshake and envelopes)
//! - `cipher`: AES-256-CBC body encryption with the platform framing
//! - `merchant`: HMAC-SHA256 merchant signatures

pub mod cipher;
pub mod merchant;
pub mod signature;

pub use cipher::{pkcs7_pad, pkcs7_unpad, MessageCipher, BLOCK_SIZE, KEY_SIZE};
pub use merchant::MerchantCredentials;
pub use signature::{create_signature, validate_signature};
