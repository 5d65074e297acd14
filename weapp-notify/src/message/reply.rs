//! Reply records for the request/response event kinds.
//!
//! Each reply starts with the same header the platform expects on every
//! event reply. `reply_to` fills that header from the request: user names
//! swapped, the event echoed and the current time stamped.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::types::{AddExpressOrderEvent, CancelExpressOrderEvent, CheckBusinessEvent, GetQuotaEvent};

/// `ResultCode` for a successful reply.
pub const RESULT_OK: i32 = 0;

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Reply to a merchant balance query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename = "xml", rename_all = "PascalCase")]
pub struct GetQuotaReply {
    pub to_user_name: String,
    pub from_user_name: String,
    pub create_time: u64,
    pub msg_type: String,
    pub event: String,
    pub result_code: i32,
    pub result_msg: String,
    #[serde(rename = "BizID")]
    pub biz_id: String,
    /// Remaining balance, yuan
    pub quota: f64,
}

impl GetQuotaReply {
    pub fn reply_to(request: &GetQuotaEvent) -> Self {
        Self {
            to_user_name: request.from_user_name.clone(),
            from_user_name: request.to_user_name.clone(),
            create_time: unix_now(),
            msg_type: request.msg_type.clone(),
            event: request.event.clone(),
            biz_id: request.biz_id.clone(),
            ..Self::default()
        }
    }
}

/// Reply to a logistics order placement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename = "xml", rename_all = "PascalCase")]
pub struct AddExpressOrderReply {
    pub to_user_name: String,
    pub from_user_name: String,
    pub create_time: u64,
    pub msg_type: String,
    pub event: String,
    pub result_code: i32,
    pub result_msg: String,
    pub token: String,
    #[serde(rename = "OrderID")]
    pub order_id: String,
    #[serde(rename = "BizID")]
    pub biz_id: String,
    #[serde(rename = "WayBillID")]
    pub waybill_id: String,
    /// Opaque data printed on the waybill
    pub waybill_data: String,
}

impl AddExpressOrderReply {
    pub fn reply_to(request: &AddExpressOrderEvent) -> Self {
        Self {
            to_user_name: request.from_user_name.clone(),
            from_user_name: request.to_user_name.clone(),
            create_time: unix_now(),
            msg_type: request.msg_type.clone(),
            event: request.event.clone(),
            token: request.token.clone(),
            order_id: request.order_id.clone(),
            biz_id: request.biz_id.clone(),
            ..Self::default()
        }
    }
}

/// Reply to a logistics order cancellation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename = "xml", rename_all = "PascalCase")]
pub struct CancelExpressOrderReply {
    pub to_user_name: String,
    pub from_user_name: String,
    pub create_time: u64,
    pub msg_type: String,
    pub event: String,
    pub result_code: i32,
    pub result_msg: String,
    #[serde(rename = "BizID")]
    pub biz_id: String,
    #[serde(rename = "OrderID")]
    pub order_id: String,
    #[serde(rename = "WayBillID")]
    pub waybill_id: String,
}

impl CancelExpressOrderReply {
    pub fn reply_to(request: &CancelExpressOrderEvent) -> Self {
        Self {
            to_user_name: request.from_user_name.clone(),
            from_user_name: request.to_user_name.clone(),
            create_time: unix_now(),
            msg_type: request.msg_type.clone(),
            event: request.event.clone(),
            biz_id: request.biz_id.clone(),
            order_id: request.order_id.clone(),
            waybill_id: request.waybill_id.clone(),
            ..Self::default()
        }
    }
}

/// Reply to a merchant account review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename = "xml", rename_all = "PascalCase")]
pub struct CheckBusinessReply {
    pub to_user_name: String,
    pub from_user_name: String,
    pub create_time: u64,
    pub msg_type: String,
    pub event: String,
    pub result_code: i32,
    pub result_msg: String,
    #[serde(rename = "BizID")]
    pub biz_id: String,
}

impl CheckBusinessReply {
    pub fn reply_to(request: &CheckBusinessEvent) -> Self {
        Self {
            to_user_name: request.from_user_name.clone(),
            from_user_name: request.to_user_name.clone(),
            create_time: unix_now(),
            msg_type: request.msg_type.clone(),
            event: request.event.clone(),
            biz_id: request.biz_id.clone(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode, ContentType};

    fn quota_request() -> GetQuotaEvent {
        GetQuotaEvent {
            to_user_name: "gh_123".to_string(),
            from_user_name: "oPlatform".to_string(),
            create_time: 1,
            msg_type: "event".to_string(),
            event: "get_quota".to_string(),
            biz_id: "biz".to_string(),
            ..GetQuotaEvent::default()
        }
    }

    #[test]
    fn test_reply_to_swaps_user_names() {
        let reply = GetQuotaReply::reply_to(&quota_request());

        assert_eq!(reply.to_user_name, "oPlatform");
        assert_eq!(reply.from_user_name, "gh_123");
        assert_eq!(reply.event, "get_quota");
        assert_eq!(reply.biz_id, "biz");
        assert_eq!(reply.result_code, RESULT_OK);
        assert!(reply.create_time > 1_600_000_000);
    }

    #[test]
    fn test_quota_reply_json_field_names() {
        let reply = GetQuotaReply {
            quota: 12.5,
            ..GetQuotaReply::reply_to(&quota_request())
        };

        let json: serde_json::Value =
            serde_json::from_slice(&encode(&reply, &ContentType::Json).unwrap()).unwrap();

        assert_eq!(json["ToUserName"], "oPlatform");
        assert_eq!(json["BizID"], "biz");
        assert_eq!(json["Quota"], 12.5);
        assert_eq!(json["ResultCode"], 0);
    }

    #[test]
    fn test_add_express_order_reply_xml() {
        let request = AddExpressOrderEvent {
            order_id: "order-1".to_string(),
            token: "tok".to_string(),
            ..AddExpressOrderEvent::default()
        };
        let reply = AddExpressOrderReply {
            waybill_id: "wb-1".to_string(),
            ..AddExpressOrderReply::reply_to(&request)
        };

        let xml = String::from_utf8(encode(&reply, &ContentType::Xml).unwrap()).unwrap();

        assert!(xml.starts_with("<xml>"));
        assert!(xml.contains("<OrderID>order-1</OrderID>"));
        assert!(xml.contains("<WayBillID>wb-1</WayBillID>"));
        assert!(xml.contains("<Token>tok</Token>"));
    }
}
