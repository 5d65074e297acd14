//! Wire envelopes: the discriminator shape and the encryption wrappers.

use serde::{Deserialize, Serialize};

/// Minimal shape used to pick the concrete record type.
///
/// Decoded from the same bytes as the concrete record; the two decodes are
/// independent passes over one payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericEnvelope {
    #[serde(rename = "MsgType")]
    pub msg_type: String,
    /// Present only when `MsgType` is `event`.
    #[serde(rename = "Event", skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

/// Inbound body when `encrypt_type=aes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename = "xml")]
pub struct EncryptedEnvelope {
    #[serde(rename = "ToUserName", skip_serializing_if = "String::is_empty")]
    pub to_user_name: String,
    /// Standard base64 AES-256-CBC ciphertext.
    #[serde(rename = "Encrypt")]
    pub encrypt: String,
}

/// Outbound encrypted reply with the fields the platform needs to verify it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename = "xml")]
pub struct EncryptedReply {
    #[serde(rename = "Encrypt")]
    pub encrypt: String,
    #[serde(rename = "MsgSignature")]
    pub msg_signature: String,
    #[serde(rename = "TimeStamp")]
    pub timestamp: String,
    #[serde(rename = "Nonce")]
    pub nonce: String,
}
