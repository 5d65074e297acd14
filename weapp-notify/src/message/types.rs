//! Inbound message and event records.
//!
//! One flat record per platform schema. Field names follow the platform's
//! wire names, which are PascalCase except where noted. Every field has a
//! default so that a payload missing optional fields still decodes.

use serde::{Deserialize, Serialize};

// =============================================================================
// Customer Service Messages
// =============================================================================

/// Text message sent by a user to customer service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct TextMessage {
    pub to_user_name: String,
    pub from_user_name: String,
    pub create_time: u64,
    pub msg_type: String,
    pub content: String,
    pub msg_id: u64,
}

/// Image message sent by a user to customer service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ImageMessage {
    pub to_user_name: String,
    pub from_user_name: String,
    pub create_time: u64,
    pub msg_type: String,
    pub pic_url: String,
    pub media_id: String,
    pub msg_id: u64,
}

/// Mini-program card sent by a user to customer service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CardMessage {
    pub to_user_name: String,
    pub from_user_name: String,
    pub create_time: u64,
    pub msg_type: String,
    pub title: String,
    pub app_id: String,
    pub page_path: String,
    pub thumb_url: String,
    pub thumb_media_id: String,
    pub msg_id: u64,
}

// =============================================================================
// Events
// =============================================================================

/// User opened a customer service session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct UserEnterTempsessionEvent {
    pub to_user_name: String,
    pub from_user_name: String,
    pub create_time: u64,
    pub msg_type: String,
    pub event: String,
    pub session_from: String,
}

/// Result of an async media content check. The check fields are lowercase on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct MediaCheckAsyncEvent {
    pub to_user_name: String,
    pub from_user_name: String,
    pub create_time: u64,
    pub msg_type: String,
    pub event: String,
    #[serde(rename = "isrisky")]
    pub is_risky: u8,
    #[serde(rename = "extra_info_json")]
    pub extra_info_json: String,
    #[serde(rename = "appid")]
    pub app_id: String,
    #[serde(rename = "trace_id")]
    pub trace_id: String,
    #[serde(rename = "status_code")]
    pub status_code: i64,
}

/// Merchant balance query. Expects a [`GetQuotaReply`](crate::message::GetQuotaReply).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GetQuotaEvent {
    pub to_user_name: String,
    pub from_user_name: String,
    pub create_time: u64,
    pub msg_type: String,
    pub event: String,
    #[serde(rename = "BizID")]
    pub biz_id: String,
    pub biz_pwd: String,
    #[serde(rename = "ShopAppID")]
    pub shop_app_id: String,
}

/// Sender or receiver of a logistics order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ExpressContact {
    pub name: String,
    pub tel: String,
    pub mobile: String,
    pub company: String,
    pub post_code: String,
    pub country: String,
    pub province: String,
    pub city: String,
    pub area: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ExpressCargo {
    /// Kilograms
    pub weight: f64,
    /// Centimetres
    pub space_x: f64,
    pub space_y: f64,
    pub space_z: f64,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ExpressShop {
    #[serde(rename = "WXAPath")]
    pub wxa_path: String,
    #[serde(rename = "IMGUrl")]
    pub img_url: String,
    pub goods_name: String,
    pub goods_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ExpressInsured {
    pub use_insured: u8,
    /// Fen
    pub insured_value: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ExpressService {
    pub service_type: i64,
    pub service_name: String,
}

/// Logistics order placement. Expects an [`AddExpressOrderReply`](crate::message::AddExpressOrderReply).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AddExpressOrderEvent {
    pub to_user_name: String,
    pub from_user_name: String,
    pub create_time: u64,
    pub msg_type: String,
    pub event: String,
    pub token: String,
    #[serde(rename = "OrderID")]
    pub order_id: String,
    #[serde(rename = "BizID")]
    pub biz_id: String,
    pub biz_pwd: String,
    #[serde(rename = "ShopAppID")]
    pub shop_app_id: String,
    #[serde(rename = "WayBillID")]
    pub waybill_id: String,
    pub remark: String,
    pub sender: ExpressContact,
    pub receiver: ExpressContact,
    pub cargo: ExpressCargo,
    pub shop: ExpressShop,
    pub insured: ExpressInsured,
    pub service: ExpressService,
}

/// Logistics order cancellation. Expects a [`CancelExpressOrderReply`](crate::message::CancelExpressOrderReply).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CancelExpressOrderEvent {
    pub to_user_name: String,
    pub from_user_name: String,
    pub create_time: u64,
    pub msg_type: String,
    pub event: String,
    #[serde(rename = "BizID")]
    pub biz_id: String,
    pub biz_pwd: String,
    #[serde(rename = "ShopAppID")]
    pub shop_app_id: String,
    #[serde(rename = "OrderID")]
    pub order_id: String,
    #[serde(rename = "DeliveryID")]
    pub delivery_id: String,
    #[serde(rename = "WayBillID")]
    pub waybill_id: String,
}

/// Merchant account review. Expects a [`CheckBusinessReply`](crate::message::CheckBusinessReply).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CheckBusinessEvent {
    pub to_user_name: String,
    pub from_user_name: String,
    pub create_time: u64,
    pub msg_type: String,
    pub event: String,
    #[serde(rename = "BizID")]
    pub biz_id: String,
    pub biz_pwd: String,
    #[serde(rename = "ShopAppID")]
    pub shop_app_id: String,
    pub shop_name: String,
    #[serde(rename = "ShopTelphone")]
    pub shop_tel_phone: String,
    pub sender_address: String,
    pub shop_contact: String,
    pub service_name: String,
}

/// One step of a waybill's path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ExpressPathAction {
    pub action_time: u64,
    pub action_type: u32,
    pub action_msg: String,
}

/// Waybill path update pushed by the logistics provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ExpressPathUpdateEvent {
    pub to_user_name: String,
    pub from_user_name: String,
    pub create_time: u64,
    pub msg_type: String,
    pub event: String,
    #[serde(rename = "DeliveryID")]
    pub delivery_id: String,
    #[serde(rename = "WayBillId")]
    pub waybill_id: String,
    pub version: u64,
    pub count: u32,
    pub actions: Vec<ExpressPathAction>,
}

/// Audit result for a nearby mini-program place. Audit fields are lowercase on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AddNearbyPoiAuditEvent {
    pub to_user_name: String,
    pub from_user_name: String,
    pub create_time: u64,
    pub msg_type: String,
    pub event: String,
    #[serde(rename = "audit_id")]
    pub audit_id: u64,
    /// 3 approved, 2 rejected
    #[serde(rename = "status")]
    pub status: u8,
    #[serde(rename = "reason")]
    pub reason: String,
    #[serde(rename = "poi_id")]
    pub poi_id: u64,
}
