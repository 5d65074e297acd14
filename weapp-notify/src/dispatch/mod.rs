//! Notification routing.
//!
//! Dispatch makes two passes over one decoded body:
//!
//! ```text
//! raw bytes → GenericEnvelope → NotificationKind
//! raw bytes → Notification (concrete record for that kind) → Handlers → Option<Reply>
//! ```
//!
//! A kind outside the platform catalog is an error. A catalogued kind with
//! no registered handler is a silent no-op.

pub mod handlers;

use std::fmt;

use tracing::warn;

use crate::codec::{self, ContentType};
use crate::error::{GatewayError, Result};
use crate::message::{
    AddExpressOrderEvent, AddExpressOrderReply, AddNearbyPoiAuditEvent, CancelExpressOrderEvent,
    CancelExpressOrderReply, CardMessage, CheckBusinessEvent, CheckBusinessReply, EventType,
    ExpressPathUpdateEvent, GenericEnvelope, GetQuotaEvent, GetQuotaReply, ImageMessage,
    MediaCheckAsyncEvent, MsgType, TextMessage, UserEnterTempsessionEvent,
};

pub use handlers::Handlers;

/// Concrete record kind selected by the `MsgType` / `Event` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Text,
    Image,
    Card,
    UserEnterTempsession,
    MediaCheckAsync,
    ExpressPathUpdate,
    AddNearbyPoiAudit,
    GetQuota,
    AddExpressOrder,
    CancelExpressOrder,
    CheckBusiness,
}

impl NotificationKind {
    /// Resolve the kind from the discriminator fields.
    pub fn resolve(envelope: &GenericEnvelope) -> Result<Self> {
        match MsgType::parse(&envelope.msg_type) {
            Some(MsgType::Text) => Ok(NotificationKind::Text),
            Some(MsgType::Image) => Ok(NotificationKind::Image),
            Some(MsgType::Card) => Ok(NotificationKind::Card),
            Some(MsgType::Event) => {
                let event = envelope.event.as_deref().unwrap_or_default();
                match EventType::parse(event) {
                    Some(event) => Ok(event.into()),
                    None => {
                        warn!(event = %event, "notify_dispatch_unexpected_event");
                        Err(GatewayError::UnexpectedType(format!("event/{}", event)))
                    }
                }
            }
            None => {
                warn!(msg_type = %envelope.msg_type, "notify_dispatch_unexpected_msg_type");
                Err(GatewayError::UnexpectedType(envelope.msg_type.clone()))
            }
        }
    }

    /// Whether the handler's return value is sent back to the platform.
    pub fn expects_reply(self) -> bool {
        match self {
            NotificationKind::Text | NotificationKind::Image | NotificationKind::Card => false,
            _ => EventType::try_from(self).map(EventType::expects_reply).unwrap_or(false),
        }
    }
}

impl From<EventType> for NotificationKind {
    fn from(event: EventType) -> Self {
        match event {
            EventType::GetQuota => NotificationKind::GetQuota,
            EventType::CheckBusiness => NotificationKind::CheckBusiness,
            EventType::MediaCheckAsync => NotificationKind::MediaCheckAsync,
            EventType::AddExpressOrder => NotificationKind::AddExpressOrder,
            EventType::ExpressPathUpdate => NotificationKind::ExpressPathUpdate,
            EventType::CancelExpressOrder => NotificationKind::CancelExpressOrder,
            EventType::UserEnterTempsession => NotificationKind::UserEnterTempsession,
            EventType::AddNearbyPoiAuditInfo => NotificationKind::AddNearbyPoiAudit,
        }
    }
}

impl TryFrom<NotificationKind> for EventType {
    type Error = MsgType;

    /// Fails with the message type for the non-event kinds.
    fn try_from(kind: NotificationKind) -> std::result::Result<Self, MsgType> {
        match kind {
            NotificationKind::Text => Err(MsgType::Text),
            NotificationKind::Image => Err(MsgType::Image),
            NotificationKind::Card => Err(MsgType::Card),
            NotificationKind::UserEnterTempsession => Ok(EventType::UserEnterTempsession),
            NotificationKind::MediaCheckAsync => Ok(EventType::MediaCheckAsync),
            NotificationKind::ExpressPathUpdate => Ok(EventType::ExpressPathUpdate),
            NotificationKind::AddNearbyPoiAudit => Ok(EventType::AddNearbyPoiAuditInfo),
            NotificationKind::GetQuota => Ok(EventType::GetQuota),
            NotificationKind::AddExpressOrder => Ok(EventType::AddExpressOrder),
            NotificationKind::CancelExpressOrder => Ok(EventType::CancelExpressOrder),
            NotificationKind::CheckBusiness => Ok(EventType::CheckBusiness),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match EventType::try_from(*self) {
            Ok(event) => write!(f, "event/{}", event),
            Err(msg_type) => write!(f, "{}", msg_type),
        }
    }
}

/// A decoded inbound notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Text(TextMessage),
    Image(ImageMessage),
    Card(CardMessage),
    UserEnterTempsession(UserEnterTempsessionEvent),
    MediaCheckAsync(MediaCheckAsyncEvent),
    ExpressPathUpdate(ExpressPathUpdateEvent),
    AddNearbyPoiAudit(AddNearbyPoiAuditEvent),
    GetQuota(GetQuotaEvent),
    AddExpressOrder(AddExpressOrderEvent),
    CancelExpressOrder(CancelExpressOrderEvent),
    CheckBusiness(CheckBusinessEvent),
}

impl Notification {
    /// Decode `raw` as the concrete record for `kind`.
    pub fn decode(kind: NotificationKind, raw: &[u8], content_type: &ContentType) -> Result<Self> {
        let notification = match kind {
            NotificationKind::Text => Notification::Text(codec::decode(raw, content_type)?),
            NotificationKind::Image => Notification::Image(codec::decode(raw, content_type)?),
            NotificationKind::Card => Notification::Card(codec::decode(raw, content_type)?),
            NotificationKind::UserEnterTempsession => {
                Notification::UserEnterTempsession(codec::decode(raw, content_type)?)
            }
            NotificationKind::MediaCheckAsync => {
                Notification::MediaCheckAsync(codec::decode(raw, content_type)?)
            }
            NotificationKind::ExpressPathUpdate => {
                Notification::ExpressPathUpdate(codec::decode(raw, content_type)?)
            }
            NotificationKind::AddNearbyPoiAudit => {
                Notification::AddNearbyPoiAudit(codec::decode(raw, content_type)?)
            }
            NotificationKind::GetQuota => Notification::GetQuota(codec::decode(raw, content_type)?),
            NotificationKind::AddExpressOrder => {
                Notification::AddExpressOrder(codec::decode(raw, content_type)?)
            }
            NotificationKind::CancelExpressOrder => {
                Notification::CancelExpressOrder(codec::decode(raw, content_type)?)
            }
            NotificationKind::CheckBusiness => {
                Notification::CheckBusiness(codec::decode(raw, content_type)?)
            }
        };

        Ok(notification)
    }

    pub fn kind(&self) -> NotificationKind {
        match self {
            Notification::Text(_) => NotificationKind::Text,
            Notification::Image(_) => NotificationKind::Image,
            Notification::Card(_) => NotificationKind::Card,
            Notification::UserEnterTempsession(_) => NotificationKind::UserEnterTempsession,
            Notification::MediaCheckAsync(_) => NotificationKind::MediaCheckAsync,
            Notification::ExpressPathUpdate(_) => NotificationKind::ExpressPathUpdate,
            Notification::AddNearbyPoiAudit(_) => NotificationKind::AddNearbyPoiAudit,
            Notification::GetQuota(_) => NotificationKind::GetQuota,
            Notification::AddExpressOrder(_) => NotificationKind::AddExpressOrder,
            Notification::CancelExpressOrder(_) => NotificationKind::CancelExpressOrder,
            Notification::CheckBusiness(_) => NotificationKind::CheckBusiness,
        }
    }
}

/// Reply produced by a request/response handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    GetQuota(GetQuotaReply),
    AddExpressOrder(AddExpressOrderReply),
    CancelExpressOrder(CancelExpressOrderReply),
    CheckBusiness(CheckBusinessReply),
}

impl Reply {
    /// Encode the inner record in the request's format.
    pub fn encode(&self, content_type: &ContentType) -> Result<Vec<u8>> {
        match self {
            Reply::GetQuota(reply) => codec::encode(reply, content_type),
            Reply::AddExpressOrder(reply) => codec::encode(reply, content_type),
            Reply::CancelExpressOrder(reply) => codec::encode(reply, content_type),
            Reply::CheckBusiness(reply) => codec::encode(reply, content_type),
        }
    }
}

/// Decode `raw`, route it to its handler and return any reply.
pub fn dispatch(raw: &[u8], content_type: &ContentType, handlers: &Handlers) -> Result<Option<Reply>> {
    let envelope: GenericEnvelope = codec::decode(raw, content_type)?;
    let kind = NotificationKind::resolve(&envelope)?;
    let notification = Notification::decode(kind, raw, content_type)?;

    Ok(handlers.handle(&notification))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn envelope(msg_type: &str, event: Option<&str>) -> GenericEnvelope {
        GenericEnvelope {
            msg_type: msg_type.to_string(),
            event: event.map(str::to_string),
        }
    }

    fn payload(kind: NotificationKind) -> Vec<u8> {
        let (msg_type, event) = match EventType::try_from(kind) {
            Ok(event) => ("event", Some(event.as_str())),
            Err(msg_type) => (msg_type.as_str(), None),
        };

        let mut json = serde_json::json!({
            "ToUserName": "gh_123",
            "FromUserName": "oUser",
            "CreateTime": 1700000000u64,
            "MsgType": msg_type,
        });
        if let Some(event) = event {
            json["Event"] = event.into();
        }
        serde_json::to_vec(&json).unwrap()
    }

    const ALL_KINDS: [NotificationKind; 11] = [
        NotificationKind::Text,
        NotificationKind::Image,
        NotificationKind::Card,
        NotificationKind::UserEnterTempsession,
        NotificationKind::MediaCheckAsync,
        NotificationKind::ExpressPathUpdate,
        NotificationKind::AddNearbyPoiAudit,
        NotificationKind::GetQuota,
        NotificationKind::AddExpressOrder,
        NotificationKind::CancelExpressOrder,
        NotificationKind::CheckBusiness,
    ];

    type Calls = Arc<Mutex<Vec<(NotificationKind, String)>>>;

    trait Sender {
        fn sender(&self) -> &str;
    }

    macro_rules! impl_sender {
        ($($ty:ty),*) => {
            $(impl Sender for $ty {
                fn sender(&self) -> &str {
                    &self.from_user_name
                }
            })*
        };
    }

    impl_sender!(
        TextMessage,
        ImageMessage,
        CardMessage,
        UserEnterTempsessionEvent,
        MediaCheckAsyncEvent,
        ExpressPathUpdateEvent,
        AddNearbyPoiAuditEvent,
        GetQuotaEvent,
        AddExpressOrderEvent,
        CancelExpressOrderEvent,
        CheckBusinessEvent
    );

    fn recorder<T: Sender>(calls: &Calls, kind: NotificationKind) -> impl Fn(&T) + Send + Sync {
        let calls = Arc::clone(calls);
        move |record: &T| {
            calls
                .lock()
                .unwrap()
                .push((kind, record.sender().to_string()));
        }
    }

    fn responder<T: Sender, R>(
        calls: &Calls,
        kind: NotificationKind,
        reply: fn(&T) -> R,
    ) -> impl Fn(&T) -> R + Send + Sync {
        let record = recorder::<T>(calls, kind);
        move |event: &T| {
            record(event);
            reply(event)
        }
    }

    /// Handlers for every kind, each recording the kind and sender it saw.
    fn recording_handlers(calls: &Calls) -> Handlers {
        Handlers::new()
            .on_text_message(recorder::<TextMessage>(calls, NotificationKind::Text))
            .on_image_message(recorder::<ImageMessage>(calls, NotificationKind::Image))
            .on_card_message(recorder::<CardMessage>(calls, NotificationKind::Card))
            .on_user_enter_tempsession(recorder::<UserEnterTempsessionEvent>(
                calls,
                NotificationKind::UserEnterTempsession,
            ))
            .on_media_check_async(recorder::<MediaCheckAsyncEvent>(
                calls,
                NotificationKind::MediaCheckAsync,
            ))
            .on_express_path_update(recorder::<ExpressPathUpdateEvent>(
                calls,
                NotificationKind::ExpressPathUpdate,
            ))
            .on_add_nearby_poi_audit(recorder::<AddNearbyPoiAuditEvent>(
                calls,
                NotificationKind::AddNearbyPoiAudit,
            ))
            .on_get_quota(responder(
                calls,
                NotificationKind::GetQuota,
                GetQuotaReply::reply_to,
            ))
            .on_add_express_order(responder(
                calls,
                NotificationKind::AddExpressOrder,
                AddExpressOrderReply::reply_to,
            ))
            .on_cancel_express_order(responder(
                calls,
                NotificationKind::CancelExpressOrder,
                CancelExpressOrderReply::reply_to,
            ))
            .on_check_business(responder(
                calls,
                NotificationKind::CheckBusiness,
                CheckBusinessReply::reply_to,
            ))
    }

    #[test]
    fn test_resolve_message_kinds() {
        assert_eq!(
            NotificationKind::resolve(&envelope("text", None)).unwrap(),
            NotificationKind::Text
        );
        assert_eq!(
            NotificationKind::resolve(&envelope("image", None)).unwrap(),
            NotificationKind::Image
        );
        assert_eq!(
            NotificationKind::resolve(&envelope("miniprogrampage", None)).unwrap(),
            NotificationKind::Card
        );
    }

    #[test]
    fn test_resolve_every_event_kind() {
        for event in EventType::ALL {
            let kind = NotificationKind::resolve(&envelope("event", Some(event.as_str()))).unwrap();
            assert_eq!(EventType::try_from(kind), Ok(event));
        }
    }

    #[test]
    fn test_resolve_rejects_unknown_kinds() {
        let err = NotificationKind::resolve(&envelope("voice", None)).unwrap_err();
        assert!(matches!(err, GatewayError::UnexpectedType(ref t) if t == "voice"));

        let err = NotificationKind::resolve(&envelope("event", Some("subscribe"))).unwrap_err();
        assert!(matches!(err, GatewayError::UnexpectedType(ref t) if t == "event/subscribe"));

        let err = NotificationKind::resolve(&envelope("event", None)).unwrap_err();
        assert!(matches!(err, GatewayError::UnexpectedType(_)));

        let err = NotificationKind::resolve(&envelope("", None)).unwrap_err();
        assert!(matches!(err, GatewayError::UnexpectedType(_)));
    }

    #[test]
    fn test_expects_reply() {
        let replying: Vec<_> = ALL_KINDS
            .into_iter()
            .filter(|kind| kind.expects_reply())
            .collect();

        assert_eq!(
            replying,
            vec![
                NotificationKind::GetQuota,
                NotificationKind::AddExpressOrder,
                NotificationKind::CancelExpressOrder,
                NotificationKind::CheckBusiness,
            ]
        );
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(NotificationKind::Card.to_string(), "miniprogrampage");
        assert_eq!(NotificationKind::GetQuota.to_string(), "event/get_quota");
    }

    #[test]
    fn test_dispatch_invokes_exactly_one_handler_per_kind() {
        for kind in ALL_KINDS {
            let calls: Calls = Arc::new(Mutex::new(Vec::new()));
            let handlers = recording_handlers(&calls);

            let reply = dispatch(&payload(kind), &ContentType::Json, &handlers).unwrap();

            let calls = calls.lock().unwrap();
            assert_eq!(calls.as_slice(), &[(kind, "oUser".to_string())], "kind {}", kind);
            assert_eq!(reply.is_some(), kind.expects_reply(), "kind {}", kind);
        }
    }

    #[test]
    fn test_dispatch_without_handlers_is_silent() {
        let handlers = Handlers::new();

        for kind in ALL_KINDS {
            let reply = dispatch(&payload(kind), &ContentType::Json, &handlers).unwrap();
            assert!(reply.is_none(), "kind {}", kind);
        }
    }

    #[test]
    fn test_dispatch_unknown_kind_invokes_nothing() {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let handlers = recording_handlers(&calls);

        for raw in [
            br#"{"MsgType":"voice"}"#.as_slice(),
            br#"{"MsgType":"event","Event":"subscribe"}"#.as_slice(),
        ] {
            let err = dispatch(raw, &ContentType::Json, &handlers).unwrap_err();
            assert!(matches!(err, GatewayError::UnexpectedType(_)));
        }

        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dispatch_reply_carries_handler_output() {
        let handlers = Handlers::new().on_get_quota(|event| GetQuotaReply {
            quota: 42.0,
            ..GetQuotaReply::reply_to(event)
        });

        let reply = dispatch(&payload(NotificationKind::GetQuota), &ContentType::Json, &handlers)
            .unwrap()
            .unwrap();

        match reply {
            Reply::GetQuota(reply) => {
                assert_eq!(reply.quota, 42.0);
                assert_eq!(reply.to_user_name, "oUser");
                assert_eq!(reply.from_user_name, "gh_123");
            }
            other => panic!("Expected GetQuota reply, got {:?}", other),
        }
    }

    #[test]
    fn test_dispatch_xml() {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let handlers = recording_handlers(&calls);

        let raw = b"<xml><FromUserName><![CDATA[oXml]]></FromUserName>\
            <MsgType><![CDATA[event]]></MsgType>\
            <Event><![CDATA[user_enter_tempsession]]></Event>\
            <SessionFrom><![CDATA[card]]></SessionFrom></xml>";

        assert!(dispatch(raw, &ContentType::Xml, &handlers).unwrap().is_none());
        assert_eq!(
            calls.lock().unwrap().as_slice(),
            &[(NotificationKind::UserEnterTempsession, "oXml".to_string())]
        );
    }

    #[test]
    fn test_dispatch_decode_error() {
        let err = dispatch(b"{", &ContentType::Json, &Handlers::new()).unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[test]
    fn test_reply_encode() {
        let reply = Reply::CheckBusiness(CheckBusinessReply {
            biz_id: "biz".to_string(),
            ..CheckBusinessReply::default()
        });

        let json: serde_json::Value =
            serde_json::from_slice(&reply.encode(&ContentType::Json).unwrap()).unwrap();
        assert_eq!(json["BizID"], "biz");

        let err = reply
            .encode(&ContentType::Other("text/plain".to_string()))
            .unwrap_err();
        assert!(matches!(err, GatewayError::UnsupportedContentType(_)));
    }
}
