//! Configuration module for environment variable parsing.
//!
//! Reads all configuration from environment variables. Secrets are kept as
//! raw strings here and only decoded when the gateway config is built.

use std::env;
use tracing::warn;

use crate::error::Result;
use crate::gateway::GatewayConfig;

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Route the platform posts notifications to
    pub notify_path: String,

    /// Mini-program app id
    pub app_id: String,

    /// Verification token configured on the platform
    pub token: String,

    /// Base64 message encryption key (43 characters)
    pub encoding_aes_key: String,

    /// Merchant id for logistics and business events
    pub mch_id: Option<String>,

    /// Merchant signing key
    pub api_key: Option<String>,

    /// Whether handshake requests are signature-checked
    pub validate: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("notify_path", &self.notify_path)
            .field("app_id", &self.app_id)
            .field("mch_id", &self.mch_id)
            .field("validate", &self.validate)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            notify_path: env::var("WEAPP_NOTIFY_PATH").unwrap_or_else(|_| "/notify".to_string()),

            app_id: env::var("WEAPP_APP_ID").unwrap_or_default(),

            token: env::var("WEAPP_TOKEN").unwrap_or_default(),

            encoding_aes_key: env::var("WEAPP_AES_KEY").unwrap_or_default(),

            mch_id: non_empty("WEAPP_MCH_ID"),

            api_key: non_empty("WEAPP_API_KEY"),

            validate: parse_bool("WEAPP_VALIDATE", true),
        }
    }

    /// Build the gateway config, decoding the AES key.
    ///
    /// Merchant credentials are attached only when both halves are set.
    pub fn gateway_config(&self) -> Result<GatewayConfig> {
        let config = GatewayConfig::new(
            self.app_id.clone(),
            self.token.clone(),
            &self.encoding_aes_key,
            self.validate,
        )?;

        match (&self.mch_id, &self.api_key) {
            (Some(mch_id), Some(api_key)) => Ok(config.with_merchant(mch_id.clone(), api_key.clone())),
            (None, None) => Ok(config),
            _ => {
                warn!("merchant_credentials_incomplete");
                Ok(config)
            }
        }
    }
}

/// Read a variable, treating blank values as unset.
fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a boolean flag like "true", "1", "no".
fn parse_bool(name: &str, default: bool) -> bool {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid boolean, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            port: 8080,
            notify_path: "/notify".to_string(),
            app_id: "wxapp".to_string(),
            token: "token".to_string(),
            encoding_aes_key: "abcdefghijklmnopqrstuvwxyz0123456789ABCDEFG".to_string(),
            mch_id: None,
            api_key: None,
            validate: true,
        }
    }

    #[test]
    fn test_parse_bool_valid() {
        env::set_var("TEST_BOOL_FALSE", "off");
        assert!(!parse_bool("TEST_BOOL_FALSE", true));
        env::remove_var("TEST_BOOL_FALSE");

        env::set_var("TEST_BOOL_TRUE", " TRUE ");
        assert!(parse_bool("TEST_BOOL_TRUE", false));
        env::remove_var("TEST_BOOL_TRUE");
    }

    #[test]
    fn test_parse_bool_default() {
        assert!(parse_bool("NONEXISTENT_BOOL_VAR", true));

        env::set_var("TEST_BOOL_GARBAGE", "maybe");
        assert!(!parse_bool("TEST_BOOL_GARBAGE", false));
        env::remove_var("TEST_BOOL_GARBAGE");
    }

    #[test]
    fn test_non_empty() {
        env::set_var("TEST_NON_EMPTY_BLANK", "   ");
        assert_eq!(non_empty("TEST_NON_EMPTY_BLANK"), None);
        env::remove_var("TEST_NON_EMPTY_BLANK");

        env::set_var("TEST_NON_EMPTY_SET", " 1900000109 ");
        assert_eq!(non_empty("TEST_NON_EMPTY_SET"), Some("1900000109".to_string()));
        env::remove_var("TEST_NON_EMPTY_SET");
    }

    #[test]
    fn test_gateway_config() {
        let gateway_config = config().gateway_config().unwrap();
        assert!(gateway_config.merchant().is_none());

        let with_merchant = Config {
            mch_id: Some("1900000109".to_string()),
            api_key: Some("apikey".to_string()),
            ..config()
        };
        assert!(with_merchant.gateway_config().unwrap().merchant().is_some());

        let half = Config {
            mch_id: Some("1900000109".to_string()),
            ..config()
        };
        assert!(half.gateway_config().unwrap().merchant().is_none());
    }

    #[test]
    fn test_gateway_config_bad_key() {
        let bad = Config {
            encoding_aes_key: String::new(),
            ..config()
        };

        assert!(bad.gateway_config().is_err());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let debug = format!("{:?}", config());

        assert!(debug.contains("wxapp"));
        assert!(!debug.contains("token"));
        assert!(!debug.contains("abcdefghijklmnop"));
    }
}
