//! Platform wire records.
//!
//! - `catalog`: the `MsgType` / `Event` discriminator values
//! - `envelope`: generic and encrypted envelopes
//! - `types`: inbound message and event records
//! - `reply`: reply records for request/response events

pub mod catalog;
pub mod envelope;
pub mod reply;
pub mod types;

pub use catalog::{EventType, MsgType};
pub use envelope::{EncryptedEnvelope, EncryptedReply, GenericEnvelope};
pub use reply::{
    AddExpressOrderReply, CancelExpressOrderReply, CheckBusinessReply, GetQuotaReply, RESULT_OK,
};
pub use types::{
    AddExpressOrderEvent, AddNearbyPoiAuditEvent, CancelExpressOrderEvent, CardMessage,
    CheckBusinessEvent, ExpressCargo, ExpressContact, ExpressInsured, ExpressPathAction,
    ExpressPathUpdateEvent, ExpressService, ExpressShop, GetQuotaEvent, ImageMessage,
    MediaCheckAsyncEvent, TextMessage, UserEnterTempsessionEvent,
};
