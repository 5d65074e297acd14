//! weapp-notify - Mini-program notification gateway.
//!
//! This library receives the platform's webhook callbacks (customer service
//! messages, media check results, logistics events, balance queries),
//! authenticates and decrypts them, and routes each one to an
//! application-registered handler. Handlers for request/response events
//! return a reply that is encrypted and written back.
//!
//! ## Architecture
//!
//! ```text
//! HTTP → web → Gateway → crypto (verify, decrypt) → dispatch → Handlers
//!                      ← crypto (encrypt, sign)   ← Reply
//! ```

pub mod codec;
pub mod config;
pub mod crypto;
pub mod dispatch;
pub mod error;
pub mod gateway;
pub mod message;
pub mod web;

// Re-export commonly used types
pub use codec::ContentType;
pub use config::Config;
pub use dispatch::{dispatch, Handlers, Notification, NotificationKind, Reply};
pub use error::{GatewayError, Result};
pub use gateway::{
    DeliveryQuery, Gateway, GatewayConfig, GatewayRequest, GatewayResponse, HandshakeQuery,
};
pub use web::AppState;
