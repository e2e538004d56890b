//! Ledger configuration: input limits, role enforcement, and the lock window.

use serde::{Deserialize, Serialize};

use crate::{BazaarError, Result, constants};

/// Configuration for a ledger instance.
///
/// Missing fields fall back to the defaults in [`crate::constants`], so a
/// config file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Maximum username length in bytes.
    pub max_username_len: usize,
    /// Maximum phone number length in bytes.
    pub max_phone_len: usize,
    /// Maximum store, request, and offer store-name length in bytes.
    pub max_name_len: usize,
    /// Maximum description length in bytes.
    pub max_description_len: usize,
    /// Maximum images per request or offer.
    pub max_images: usize,
    /// Maximum length of one image reference in bytes.
    pub max_image_len: usize,
    /// Restrict stores and offers to sellers, requests and acceptance to buyers.
    pub enforce_account_roles: bool,
    /// Seconds after acceptance before the buyer may complete a request.
    pub lock_window_secs: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_username_len: constants::DEFAULT_MAX_USERNAME_LEN,
            max_phone_len: constants::DEFAULT_MAX_PHONE_LEN,
            max_name_len: constants::DEFAULT_MAX_NAME_LEN,
            max_description_len: constants::DEFAULT_MAX_DESCRIPTION_LEN,
            max_images: constants::DEFAULT_MAX_IMAGES,
            max_image_len: constants::DEFAULT_MAX_IMAGE_LEN,
            enforce_account_roles: true,
            lock_window_secs: constants::DEFAULT_LOCK_WINDOW_SECS,
        }
    }
}

impl LedgerConfig {
    /// Parse and validate a JSON config.
    ///
    /// # Errors
    /// Returns [`BazaarError::Configuration`] on malformed JSON or bad limits.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject limits that would make every record invalid.
    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("max_username_len", self.max_username_len),
            ("max_phone_len", self.max_phone_len),
            ("max_name_len", self.max_name_len),
            ("max_description_len", self.max_description_len),
            ("max_image_len", self.max_image_len),
        ];
        for (field, value) in limits {
            if value == 0 {
                return Err(BazaarError::Configuration(format!("{field} must be > 0")));
            }
        }
        if self.lock_window_secs < 0 {
            return Err(BazaarError::Configuration(
                "lock_window_secs must be >= 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = LedgerConfig::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.enforce_account_roles);
        assert_eq!(cfg.max_images, 8);
        assert_eq!(cfg.lock_window_secs, 60);
    }

    #[test]
    fn partial_json_overrides_defaults() {
        let cfg = LedgerConfig::from_json_str(
            r#"{ "max_images": 2, "enforce_account_roles": false }"#,
        )
        .unwrap();
        assert_eq!(cfg.max_images, 2);
        assert!(!cfg.enforce_account_roles);
        assert_eq!(cfg.max_username_len, 32);
    }

    #[test]
    fn zero_limit_rejected() {
        let err = LedgerConfig::from_json_str(r#"{ "max_name_len": 0 }"#).unwrap_err();
        assert!(matches!(err, BazaarError::Configuration(_)));
        assert!(format!("{err}").contains("max_name_len"));
    }

    #[test]
    fn negative_lock_window_rejected() {
        let err = LedgerConfig::from_json_str(r#"{ "lock_window_secs": -1 }"#).unwrap_err();
        assert!(format!("{err}").contains("lock_window_secs"));
        let cfg = LedgerConfig::from_json_str(r#"{ "lock_window_secs": 0 }"#).unwrap();
        assert_eq!(cfg.lock_window_secs, 0);
    }

    #[test]
    fn malformed_json_rejected() {
        let err = LedgerConfig::from_json_str("{ not json").unwrap_err();
        assert!(format!("{err}").starts_with("BZ_ERR_902"));
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = LedgerConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: LedgerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
