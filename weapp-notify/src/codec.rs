//! Body encoding, selected by the request's `Content-Type`.
//!
//! A request decoded as XML gets its reply encoded as XML, and likewise for
//! JSON. Any other content type is carried through unchanged and rejected the
//! first time something is decoded or encoded with it.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{GatewayError, Result};

pub const JSON_MIME: &str = "application/json";
pub const XML_MIME: &str = "application/xml";

/// Declared body format of one request/response cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentType {
    Json,
    Xml,
    /// Raw header value that matched neither format.
    Other(String),
}

impl ContentType {
    /// Classify a `Content-Type` header by substring match.
    pub fn from_header(value: &str) -> Self {
        if value.contains(JSON_MIME) {
            ContentType::Json
        } else if value.contains(XML_MIME) {
            ContentType::Xml
        } else {
            ContentType::Other(value.to_string())
        }
    }

    /// Header value to send back with a reply.
    pub fn mime(&self) -> &str {
        match self {
            ContentType::Json => JSON_MIME,
            ContentType::Xml => XML_MIME,
            ContentType::Other(raw) => raw,
        }
    }
}

/// Decode `raw` into `T` using the declared format.
pub fn decode<T: DeserializeOwned>(raw: &[u8], content_type: &ContentType) -> Result<T> {
    match content_type {
        ContentType::Json => {
            serde_json::from_slice(raw).map_err(|e| GatewayError::Decode(e.to_string()))
        }
        ContentType::Xml => {
            let text = std::str::from_utf8(raw).map_err(|e| GatewayError::Decode(e.to_string()))?;
            quick_xml::de::from_str(text).map_err(|e| GatewayError::Decode(e.to_string()))
        }
        ContentType::Other(raw_type) => Err(GatewayError::UnsupportedContentType(raw_type.clone())),
    }
}

/// Encode `value` using the declared format.
pub fn encode<T: Serialize>(value: &T, content_type: &ContentType) -> Result<Vec<u8>> {
    match content_type {
        ContentType::Json => {
            serde_json::to_vec(value).map_err(|e| GatewayError::Encode(e.to_string()))
        }
        ContentType::Xml => quick_xml::se::to_string(value)
            .map(String::into_bytes)
            .map_err(|e| GatewayError::Encode(e.to_string())),
        ContentType::Other(raw_type) => Err(GatewayError::UnsupportedContentType(raw_type.clone())),
    }
}
