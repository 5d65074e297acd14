//! Message body encryption.
//!
//! Encrypted bodies are AES-256-CBC over a framed plaintext:
//!
//! ```text
//! nonce (16 printable bytes) | length (u32 big-endian) | message | app id | PKCS7
//! ```
//!
//! The IV is the first 16 bytes of the key itself. The platform publishes
//! the scheme this way and ciphertexts produced with any other IV are
//! rejected on its side, so this must not be "fixed" to a random IV.

use std::fmt;

use aes::cipher::{block_padding::NoPadding, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};

use crate::crypto::signature::create_signature;
use crate::error::{GatewayError, Result};
use crate::message::EncryptedReply;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES block size, also the PKCS7 block size.
pub const BLOCK_SIZE: usize = 16;

/// AES-256 key length in bytes.
pub const KEY_SIZE: usize = 32;

const NONCE_LEN: usize = 16;
const LENGTH_LEN: usize = 4;
const FRAME_HEADER_LEN: usize = NONCE_LEN + LENGTH_LEN;

/// Encrypts replies and decrypts inbound envelopes for one app.
#[derive(Clone)]
pub struct MessageCipher {
    key: [u8; KEY_SIZE],
    app_id: String,
    token: String,
}

impl fmt::Debug for MessageCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageCipher")
            .field("app_id", &self.app_id)
            .finish_non_exhaustive()
    }
}

impl MessageCipher {
    pub fn new(key: [u8; KEY_SIZE], app_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            key,
            app_id: app_id.into(),
            token: token.into(),
        }
    }

    fn iv(&self) -> &[u8] {
        &self.key[..BLOCK_SIZE]
    }

    /// Encrypt `message` and wrap it in a signed reply envelope.
    ///
    /// `timestamp` is Unix epoch seconds; it is signed together with the
    /// token, the fresh nonce and the base64 ciphertext.
    pub fn encrypt(&self, message: &[u8], timestamp: i64) -> Result<EncryptedReply> {
        let length = u32::try_from(message.len()).map_err(|_| {
            GatewayError::Encrypt(format!("message too long: {} bytes", message.len()))
        })?;

        let nonce = random_nonce();

        let mut plaintext =
            Vec::with_capacity(FRAME_HEADER_LEN + message.len() + self.app_id.len() + BLOCK_SIZE);
        plaintext.extend_from_slice(nonce.as_bytes());
        plaintext.extend_from_slice(&length.to_be_bytes());
        plaintext.extend_from_slice(message);
        plaintext.extend_from_slice(self.app_id.as_bytes());

        let padded = pkcs7_pad(&plaintext);

        let ciphertext = Aes256CbcEnc::new_from_slices(&self.key, self.iv())
            .map_err(|e| GatewayError::Encrypt(e.to_string()))?
            .encrypt_padded_vec_mut::<NoPadding>(&padded);

        let encrypt = BASE64.encode(ciphertext);
        let timestamp = timestamp.to_string();
        let msg_signature = create_signature(&[&self.token, &timestamp, &nonce, &encrypt]);

        Ok(EncryptedReply {
            encrypt,
            msg_signature,
            timestamp,
            nonce,
        })
    }

    /// Decrypt a base64 ciphertext and strip its PKCS7 padding.
    ///
    /// The returned buffer still carries the nonce, length and app id
    /// framing; see [`MessageCipher::open`].
    pub fn decrypt(&self, encrypted: &str) -> Result<Vec<u8>> {
        let ciphertext = BASE64
            .decode(encrypted.trim())
            .map_err(|e| GatewayError::Decrypt(format!("invalid base64: {e}")))?;

        if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(GatewayError::Decrypt(format!(
                "ciphertext length {} is not a multiple of the block size",
                ciphertext.len()
            )));
        }

        let plaintext = Aes256CbcDec::new_from_slices(&self.key, self.iv())
            .map_err(|e| GatewayError::Decrypt(e.to_string()))?
            .decrypt_padded_vec_mut::<NoPadding>(&ciphertext)
            .map_err(|e| GatewayError::Decrypt(e.to_string()))?;

        pkcs7_unpad(&plaintext).map(<[u8]>::to_vec)
    }

    /// Decrypt and unframe an inbound envelope, returning only the message.
    ///
    /// The nonce and the trailing app id are discarded without further checks.
    pub fn open(&self, encrypted: &str) -> Result<Vec<u8>> {
        let body = self.decrypt(encrypted)?;
        extract_frame(&body).map(<[u8]>::to_vec)
    }
}

/// Read the big-endian length at `[16..20)` and return the message bytes after it.
fn extract_frame(body: &[u8]) -> Result<&[u8]> {
    if body.len() < FRAME_HEADER_LEN {
        return Err(GatewayError::Decrypt(format!(
            "plaintext too short: {} bytes",
            body.len()
        )));
    }

    let mut length = [0u8; LENGTH_LEN];
    length.copy_from_slice(&body[NONCE_LEN..FRAME_HEADER_LEN]);
    let length = u32::from_be_bytes(length) as usize;

    let end = FRAME_HEADER_LEN
        .checked_add(length)
        .filter(|end| *end <= body.len())
        .ok_or_else(|| {
            GatewayError::Decrypt(format!(
                "message length {} exceeds plaintext of {} bytes",
                length,
                body.len()
            ))
        })?;

    Ok(&body[FRAME_HEADER_LEN..end])
}

/// 16 alphanumeric characters from the OS random source.
fn random_nonce() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}

/// PKCS7-pad `data` to a multiple of [`BLOCK_SIZE`].
///
/// Always adds between 1 and 16 bytes; an aligned input gains a full block.
pub fn pkcs7_pad(data: &[u8]) -> Vec<u8> {
    let pad = BLOCK_SIZE - data.len() % BLOCK_SIZE;
    let mut out = Vec::with_capacity(data.len() + pad);
    out.extend_from_slice(data);
    out.resize(data.len() + pad, pad as u8);
    out
}

/// Strip PKCS7 padding, rejecting anything that is not well formed.
pub fn pkcs7_unpad(data: &[u8]) -> Result<&[u8]> {
    if data.is_empty() || data.len() % BLOCK_SIZE != 0 {
        return Err(GatewayError::Decrypt(format!(
            "padded length {} is not a multiple of the block size",
            data.len()
        )));
    }

    let pad = data[data.len() - 1] as usize;
    if pad == 0 || pad > BLOCK_SIZE {
        return Err(GatewayError::Decrypt(format!("invalid padding value {pad}")));
    }

    let (body, padding) = data.split_at(data.len() - pad);
    if padding.iter().any(|b| *b as usize != pad) {
        return Err(GatewayError::Decrypt("corrupt padding".to_string()));
    }

    Ok(body)
}
