//! Gateway facade: handshake and message delivery.
//!
//! ```text
//! GET  → signature check (optional) → echo `echostr`
//! POST → [decode wrapper → verify msg_signature → decrypt] → dispatch
//!      → [encode reply → encrypt → encode wrapper] → 200
//! ```
//!
//! All state is fixed at construction, so one `Gateway` can serve concurrent
//! requests behind an `Arc`.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use axum::http::Method;
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use tracing::{info, warn};

use crate::codec::{self, ContentType};
use crate::crypto::{validate_signature, MerchantCredentials, MessageCipher, KEY_SIZE};
use crate::dispatch::{dispatch, Handlers};
use crate::error::{GatewayError, Result};
use crate::message::reply::unix_now;
use crate::message::EncryptedEnvelope;

/// The platform hands out the AES key as 43 base64 characters without padding.
const AES_KEY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Value of `encrypt_type` when the body is encrypted.
pub const ENCRYPT_TYPE_AES: &str = "aes";

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

// =============================================================================
// Configuration
// =============================================================================

/// Per-app gateway settings. Immutable once built.
#[derive(Clone)]
pub struct GatewayConfig {
    app_id: String,
    token: String,
    aes_key: [u8; KEY_SIZE],
    merchant: Option<MerchantCredentials>,
    validate: bool,
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("app_id", &self.app_id)
            .field("merchant", &self.merchant)
            .field("validate", &self.validate)
            .finish_non_exhaustive()
    }
}

impl GatewayConfig {
    /// Build a config, decoding the base64 AES key.
    ///
    /// # Arguments
    ///
    /// * `app_id` - Mini-program app id, appended to every encrypted plaintext
    /// * `token` - Verification token used in request signatures
    /// * `encoding_aes_key` - Base64 AES key, padding optional; must decode to 32 bytes
    /// * `validate` - Whether handshake requests are signature-checked
    pub fn new(
        app_id: impl Into<String>,
        token: impl Into<String>,
        encoding_aes_key: &str,
        validate: bool,
    ) -> Result<Self> {
        let decoded = AES_KEY_ENGINE
            .decode(encoding_aes_key.trim())
            .map_err(|e| GatewayError::InvalidKey(e.to_string()))?;

        let aes_key: [u8; KEY_SIZE] = decoded.as_slice().try_into().map_err(|_| {
            GatewayError::InvalidKey(format!(
                "expected {} bytes, got {}",
                KEY_SIZE,
                decoded.len()
            ))
        })?;

        Ok(Self {
            app_id: app_id.into(),
            token: token.into(),
            aes_key,
            merchant: None,
            validate,
        })
    }

    /// Attach merchant credentials for the logistics and business events.
    pub fn with_merchant(mut self, mch_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.merchant = Some(MerchantCredentials::new(mch_id, api_key));
        self
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn validate(&self) -> bool {
        self.validate
    }

    pub fn merchant(&self) -> Option<&MerchantCredentials> {
        self.merchant.as_ref()
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Query parameters of the `GET` handshake.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandshakeQuery {
    pub echostr: String,
    pub signature: String,
    pub timestamp: String,
    pub nonce: String,
}

impl HandshakeQuery {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            echostr: param(params, "echostr"),
            signature: param(params, "signature"),
            timestamp: param(params, "timestamp"),
            nonce: param(params, "nonce"),
        }
    }
}

/// Query parameters of a `POST` delivery.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryQuery {
    pub msg_signature: String,
    pub timestamp: String,
    pub nonce: String,
    pub encrypt_type: String,
}

impl DeliveryQuery {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            msg_signature: param(params, "msg_signature"),
            timestamp: param(params, "timestamp"),
            nonce: param(params, "nonce"),
            encrypt_type: param(params, "encrypt_type"),
        }
    }

    pub fn is_encrypted(&self) -> bool {
        self.encrypt_type == ENCRYPT_TYPE_AES
    }
}

fn param(params: &HashMap<String, String>, name: &str) -> String {
    params.get(name).cloned().unwrap_or_default()
}

/// Transport-neutral view of an inbound HTTP request.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub method: Method,
    pub query: HashMap<String, String>,
    /// Raw `Content-Type` header, if any.
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// What to write back with a 200 status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GatewayResponse {
    /// `None` when there is nothing to write.
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl GatewayResponse {
    fn empty() -> Self {
        Self::default()
    }
}

// =============================================================================
// Gateway
// =============================================================================

/// Authenticates, decrypts and dispatches platform notifications.
#[derive(Debug)]
pub struct Gateway {
    config: GatewayConfig,
    cipher: MessageCipher,
    handlers: Handlers,
}

impl Gateway {
    pub fn new(config: GatewayConfig, handlers: Handlers) -> Self {
        let cipher = MessageCipher::new(config.aes_key, config.app_id.clone(), config.token.clone());

        Self {
            config,
            cipher,
            handlers,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Merchant credentials for handlers that sign logistics replies.
    pub fn merchant(&self) -> Option<&MerchantCredentials> {
        self.config.merchant()
    }

    /// Answer the endpoint verification handshake.
    ///
    /// Returns the `echostr` to write back verbatim.
    pub fn handshake(&self, query: &HandshakeQuery) -> Result<String> {
        if self.config.validate
            && !validate_signature(
                &query.signature,
                &[&self.config.token, &query.timestamp, &query.nonce],
            )
        {
            warn!(timestamp = %query.timestamp, "notify_handshake_invalid");
            return Err(GatewayError::InvalidSource);
        }

        info!(validated = self.config.validate, "notify_handshake_verified");

        Ok(query.echostr.clone())
    }

    /// Handle one delivered notification.
    ///
    /// Returns the encoded reply body for request/response kinds, `None`
    /// otherwise.
    pub fn deliver(
        &self,
        query: &DeliveryQuery,
        content_type: &ContentType,
        body: &[u8],
    ) -> Result<Option<Vec<u8>>> {
        let encrypted = query.is_encrypted();

        info!(
            encrypted = encrypted,
            content_type = %content_type.mime(),
            body_length = body.len(),
            "notify_delivery_received"
        );

        let raw: Cow<'_, [u8]> = if encrypted {
            let envelope: EncryptedEnvelope = codec::decode(body, content_type)?;

            if !validate_signature(
                &query.msg_signature,
                &[
                    &self.config.token,
                    &query.timestamp,
                    &query.nonce,
                    &envelope.encrypt,
                ],
            ) {
                warn!(timestamp = %query.timestamp, "notify_delivery_signature_invalid");
                return Err(GatewayError::InvalidSignature);
            }

            Cow::Owned(self.cipher.open(&envelope.encrypt)?)
        } else {
            Cow::Borrowed(body)
        };

        let reply = match dispatch(&raw, content_type, &self.handlers)? {
            Some(reply) => reply,
            None => return Ok(None),
        };

        let mut encoded = reply.encode(content_type)?;

        if encrypted {
            let wrapped = self.cipher.encrypt(&encoded, unix_now() as i64)?;
            encoded = codec::encode(&wrapped, content_type)?;
        }

        info!(
            encrypted = encrypted,
            reply_length = encoded.len(),
            "notify_delivery_replied"
        );

        Ok(Some(encoded))
    }

    /// Serve one HTTP request by method.
    pub fn serve(&self, request: &GatewayRequest) -> Result<GatewayResponse> {
        match request.method {
            Method::GET => {
                let echo = self.handshake(&HandshakeQuery::from_params(&request.query))?;

                Ok(GatewayResponse {
                    content_type: Some(TEXT_PLAIN.to_string()),
                    body: echo.into_bytes(),
                })
            }
            Method::POST => {
                let content_type =
                    ContentType::from_header(request.content_type.as_deref().unwrap_or_default());
                let query = DeliveryQuery::from_params(&request.query);

                match self.deliver(&query, &content_type, &request.body)? {
                    Some(body) => Ok(GatewayResponse {
                        content_type: Some(content_type.mime().to_string()),
                        body,
                    }),
                    None => Ok(GatewayResponse::empty()),
                }
            }
            ref other => Err(GatewayError::InvalidMethod(other.to_string())),
        }
    }
}
