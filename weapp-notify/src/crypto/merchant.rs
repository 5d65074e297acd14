//! Merchant credentials used by the logistics and business event kinds.
//!
//! Merchant-side signatures are HMAC-SHA256 over the request parameters:
//! non-empty values sorted by key, joined as `k=v&k=v`, with
//! `&key=<api key>` appended, keyed with the api key and rendered as
//! uppercase hex.

use std::collections::BTreeMap;
use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

use crate::crypto::signature::constant_time_compare;

type HmacSha256 = Hmac<Sha256>;

/// Merchant id and signing key pair.
#[derive(Clone)]
pub struct MerchantCredentials {
    mch_id: String,
    api_key: String,
}

impl fmt::Debug for MerchantCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerchantCredentials")
            .field("mch_id", &self.mch_id)
            .finish_non_exhaustive()
    }
}

impl MerchantCredentials {
    pub fn new(mch_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            mch_id: mch_id.into(),
            api_key: api_key.into(),
        }
    }

    pub fn mch_id(&self) -> &str {
        &self.mch_id
    }

    /// Sign a parameter set. Empty values and any `sign` entry are skipped.
    pub fn sign(&self, params: &BTreeMap<&str, &str>) -> String {
        let mut query = params
            .iter()
            .filter(|(k, v)| !v.is_empty() && **k != "sign")
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        if !query.is_empty() {
            query.push('&');
        }
        query.push_str("key=");
        query.push_str(&self.api_key);

        let mut mac = <HmacSha256 as Mac>::new_from_slice(self.api_key.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(query.as_bytes());

        hex::encode_upper(mac.finalize().into_bytes())
    }

    /// Check a merchant signature against a parameter set.
    pub fn verify(&self, params: &BTreeMap<&str, &str>, signature: &str) -> bool {
        let expected = self.sign(params);
        let valid = constant_time_compare(&expected, signature);

        if !valid {
            warn!(mch_id = %self.mch_id, "notify_merchant_signature_mismatch");
        }

        valid
    }
}
