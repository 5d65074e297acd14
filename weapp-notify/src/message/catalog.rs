//! Message and event kinds known to the platform.

use std::fmt;

/// Value of the `MsgType` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MsgType {
    Text,
    Image,
    /// Mini-program card
    Card,
    Event,
}

impl MsgType {
    pub const ALL: [MsgType; 4] = [MsgType::Text, MsgType::Image, MsgType::Card, MsgType::Event];

    pub const fn as_str(self) -> &'static str {
        match self {
            MsgType::Text => "text",
            MsgType::Image => "image",
            MsgType::Card => "miniprogrampage",
            MsgType::Event => "event",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of the `Event` discriminator when `MsgType` is `event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Merchant balance query
    GetQuota,
    /// Merchant account review
    CheckBusiness,
    /// Async image/audio content check result
    MediaCheckAsync,
    /// Logistics order placement
    AddExpressOrder,
    /// Waybill path update
    ExpressPathUpdate,
    /// Logistics order cancellation
    CancelExpressOrder,
    UserEnterTempsession,
    /// Nearby mini-program place audit result
    AddNearbyPoiAuditInfo,
}

impl EventType {
    pub const ALL: [EventType; 8] = [
        EventType::GetQuota,
        EventType::CheckBusiness,
        EventType::MediaCheckAsync,
        EventType::AddExpressOrder,
        EventType::ExpressPathUpdate,
        EventType::CancelExpressOrder,
        EventType::UserEnterTempsession,
        EventType::AddNearbyPoiAuditInfo,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            EventType::GetQuota => "get_quota",
            EventType::CheckBusiness => "check_biz",
            EventType::MediaCheckAsync => "wxa_media_check",
            EventType::AddExpressOrder => "add_waybill",
            EventType::ExpressPathUpdate => "add_express_path",
            EventType::CancelExpressOrder => "cancel_waybill",
            EventType::UserEnterTempsession => "user_enter_tempsession",
            EventType::AddNearbyPoiAuditInfo => "add_nearby_poi_audit_info",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// Whether the platform expects a reply body for this event.
    pub const fn expects_reply(self) -> bool {
        matches!(
            self,
            EventType::GetQuota
                | EventType::CheckBusiness
                | EventType::AddExpressOrder
                | EventType::CancelExpressOrder
        )
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
