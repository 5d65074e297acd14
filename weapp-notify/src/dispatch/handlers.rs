//! Application-registered notification handlers.
//!
//! One optional slot per notification kind. Slots are filled once while the
//! gateway is being set up and only read afterwards, so a built `Handlers`
//! can be shared across requests without locking.

use std::fmt;

use tracing::{debug, info};

use crate::message::{
    AddExpressOrderEvent, AddExpressOrderReply, AddNearbyPoiAuditEvent, CancelExpressOrderEvent,
    CancelExpressOrderReply, CardMessage, CheckBusinessEvent, CheckBusinessReply,
    ExpressPathUpdateEvent, GetQuotaEvent, GetQuotaReply, ImageMessage, MediaCheckAsyncEvent,
    TextMessage, UserEnterTempsessionEvent,
};

use super::{Notification, NotificationKind, Reply};

type Callback<T> = Box<dyn Fn(&T) + Send + Sync>;
type ReplyCallback<T, R> = Box<dyn Fn(&T) -> R + Send + Sync>;

/// Typed handler registry.
///
/// ```ignore
/// let handlers = Handlers::new()
///     .on_text_message(|msg| info!(content = %msg.content, "text"))
///     .on_get_quota(|event| GetQuotaReply { quota: 100.0, ..GetQuotaReply::reply_to(event) });
/// ```
#[derive(Default)]
pub struct Handlers {
    text_message: Option<Callback<TextMessage>>,
    image_message: Option<Callback<ImageMessage>>,
    card_message: Option<Callback<CardMessage>>,
    user_enter_tempsession: Option<Callback<UserEnterTempsessionEvent>>,
    media_check_async: Option<Callback<MediaCheckAsyncEvent>>,
    express_path_update: Option<Callback<ExpressPathUpdateEvent>>,
    add_nearby_poi_audit: Option<Callback<AddNearbyPoiAuditEvent>>,
    get_quota: Option<ReplyCallback<GetQuotaEvent, GetQuotaReply>>,
    add_express_order: Option<ReplyCallback<AddExpressOrderEvent, AddExpressOrderReply>>,
    cancel_express_order: Option<ReplyCallback<CancelExpressOrderEvent, CancelExpressOrderReply>>,
    check_business: Option<ReplyCallback<CheckBusinessEvent, CheckBusinessReply>>,
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Customer service messages
    // =========================================================================

    pub fn on_text_message<F>(mut self, f: F) -> Self
    where
        F: Fn(&TextMessage) + Send + Sync + 'static,
    {
        self.text_message = Some(Box::new(f));
        self
    }

    pub fn on_image_message<F>(mut self, f: F) -> Self
    where
        F: Fn(&ImageMessage) + Send + Sync + 'static,
    {
        self.image_message = Some(Box::new(f));
        self
    }

    pub fn on_card_message<F>(mut self, f: F) -> Self
    where
        F: Fn(&CardMessage) + Send + Sync + 'static,
    {
        self.card_message = Some(Box::new(f));
        self
    }

    // =========================================================================
    // Fire-and-forget events
    // =========================================================================

    pub fn on_user_enter_tempsession<F>(mut self, f: F) -> Self
    where
        F: Fn(&UserEnterTempsessionEvent) + Send + Sync + 'static,
    {
        self.user_enter_tempsession = Some(Box::new(f));
        self
    }

    pub fn on_media_check_async<F>(mut self, f: F) -> Self
    where
        F: Fn(&MediaCheckAsyncEvent) + Send + Sync + 'static,
    {
        self.media_check_async = Some(Box::new(f));
        self
    }

    pub fn on_express_path_update<F>(mut self, f: F) -> Self
    where
        F: Fn(&ExpressPathUpdateEvent) + Send + Sync + 'static,
    {
        self.express_path_update = Some(Box::new(f));
        self
    }

    pub fn on_add_nearby_poi_audit<F>(mut self, f: F) -> Self
    where
        F: Fn(&AddNearbyPoiAuditEvent) + Send + Sync + 'static,
    {
        self.add_nearby_poi_audit = Some(Box::new(f));
        self
    }

    // =========================================================================
    // Request/response events
    // =========================================================================

    pub fn on_get_quota<F>(mut self, f: F) -> Self
    where
        F: Fn(&GetQuotaEvent) -> GetQuotaReply + Send + Sync + 'static,
    {
        self.get_quota = Some(Box::new(f));
        self
    }

    pub fn on_add_express_order<F>(mut self, f: F) -> Self
    where
        F: Fn(&AddExpressOrderEvent) -> AddExpressOrderReply + Send + Sync + 'static,
    {
        self.add_express_order = Some(Box::new(f));
        self
    }

    pub fn on_cancel_express_order<F>(mut self, f: F) -> Self
    where
        F: Fn(&CancelExpressOrderEvent) -> CancelExpressOrderReply + Send + Sync + 'static,
    {
        self.cancel_express_order = Some(Box::new(f));
        self
    }

    pub fn on_check_business<F>(mut self, f: F) -> Self
    where
        F: Fn(&CheckBusinessEvent) -> CheckBusinessReply + Send + Sync + 'static,
    {
        self.check_business = Some(Box::new(f));
        self
    }

    /// Kinds that currently have a handler.
    pub fn registered(&self) -> Vec<NotificationKind> {
        let slots = [
            (NotificationKind::Text, self.text_message.is_some()),
            (NotificationKind::Image, self.image_message.is_some()),
            (NotificationKind::Card, self.card_message.is_some()),
            (
                NotificationKind::UserEnterTempsession,
                self.user_enter_tempsession.is_some(),
            ),
            (NotificationKind::MediaCheckAsync, self.media_check_async.is_some()),
            (NotificationKind::ExpressPathUpdate, self.express_path_update.is_some()),
            (NotificationKind::AddNearbyPoiAudit, self.add_nearby_poi_audit.is_some()),
            (NotificationKind::GetQuota, self.get_quota.is_some()),
            (NotificationKind::AddExpressOrder, self.add_express_order.is_some()),
            (NotificationKind::CancelExpressOrder, self.cancel_express_order.is_some()),
            (NotificationKind::CheckBusiness, self.check_business.is_some()),
        ];

        slots
            .into_iter()
            .filter_map(|(kind, set)| set.then_some(kind))
            .collect()
    }

    /// Invoke the handler for `notification`, if one is registered.
    ///
    /// Returns the reply only for request/response kinds with a handler.
    /// A missing handler is not an error.
    pub fn handle(&self, notification: &Notification) -> Option<Reply> {
        let kind = notification.kind();

        let (invoked, reply) = match notification {
            Notification::Text(msg) => (fire(&self.text_message, msg), None),
            Notification::Image(msg) => (fire(&self.image_message, msg), None),
            Notification::Card(msg) => (fire(&self.card_message, msg), None),
            Notification::UserEnterTempsession(event) => {
                (fire(&self.user_enter_tempsession, event), None)
            }
            Notification::MediaCheckAsync(event) => (fire(&self.media_check_async, event), None),
            Notification::ExpressPathUpdate(event) => {
                (fire(&self.express_path_update, event), None)
            }
            Notification::AddNearbyPoiAudit(event) => {
                (fire(&self.add_nearby_poi_audit, event), None)
            }
            Notification::GetQuota(event) => respond(&self.get_quota, event, Reply::GetQuota),
            Notification::AddExpressOrder(event) => {
                respond(&self.add_express_order, event, Reply::AddExpressOrder)
            }
            Notification::CancelExpressOrder(event) => {
                respond(&self.cancel_express_order, event, Reply::CancelExpressOrder)
            }
            Notification::CheckBusiness(event) => {
                respond(&self.check_business, event, Reply::CheckBusiness)
            }
        };

        if invoked {
            info!(kind = %kind, has_reply = reply.is_some(), "notify_dispatch_handled");
        } else {
            debug!(kind = %kind, "notify_dispatch_no_handler");
        }

        reply
    }
}

fn fire<T>(slot: &Option<Callback<T>>, record: &T) -> bool {
    match slot {
        Some(handler) => {
            handler(record);
            true
        }
        None => false,
    }
}

fn respond<T, R>(
    slot: &Option<ReplyCallback<T, R>>,
    record: &T,
    wrap: fn(R) -> Reply,
) -> (bool, Option<Reply>) {
    match slot {
        Some(handler) => (true, Some(wrap(handler(record)))),
        None => (false, None),
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("registered", &self.registered())
            .finish()
    }
}
