//! Broker authentication credentials.

use super::codec::{put_str, Reader};
use super::error::ConfigError;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Maximum broker username length.
pub const MAX_USERNAME_LEN: usize = 64;

/// Maximum broker key length. Adafruit IO keys are 32 characters.
pub const MAX_KEY_LEN: usize = 128;

/// Text shown in place of a secret.
pub const REDACTED: &str = "****";

/// Username and secret key for the telemetry broker.
///
/// The key is wiped on drop and masked in `Debug` output; use
/// [`BrokerCredentials::key`] to hand it to a client.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct BrokerCredentials {
    /// Account username.
    pub username: String,
    key: String,
}

impl BrokerCredentials {
    /// Create validated broker credentials.
    pub fn new(username: impl Into<String>, key: impl Into<String>) -> Result<Self, ConfigError> {
        let creds = Self::unchecked(username, key);
        creds.validate()?;
        Ok(creds)
    }

    /// Build credentials without validation.
    ///
    /// Used for build-time values, which are checked by preflight instead.
    pub fn unchecked(username: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            key: key.into(),
        }
    }

    /// The secret key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether a key is present at all.
    pub fn has_key(&self) -> bool {
        !self.key.is_empty()
    }

    /// Validate the credentials.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.is_empty() {
            return Err(ConfigError::UsernameEmpty);
        }
        if self.username.len() > MAX_USERNAME_LEN {
            return Err(ConfigError::UsernameTooLong {
                len: self.username.len(),
                max: MAX_USERNAME_LEN,
            });
        }
        if self.key.is_empty() {
            return Err(ConfigError::KeyEmpty);
        }
        if self.key.len() > MAX_KEY_LEN {
            return Err(ConfigError::KeyTooLong {
                len: self.key.len(),
                max: MAX_KEY_LEN,
            });
        }
        Ok(())
    }

    pub(crate) fn encode_into(&self, buf: &mut Vec<u8>) {
        put_str(buf, &self.username);
        put_str(buf, &self.key);
    }

    pub(crate) fn decode_from(reader: &mut Reader<'_>) -> Result<Self, ConfigError> {
        let username = reader.string("username")?;
        let key = reader.string("key")?;
        Self::new(username, key)
    }
}

impl fmt::Debug for BrokerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrokerCredentials")
            .field("username", &self.username)
            .field("key", &REDACTED)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_credentials() {
        let creds = BrokerCredentials::new("maker", "aio_abcdefghijklmnopqrstuvwxyz12").unwrap();
        assert_eq!(creds.username, "maker");
        assert_eq!(creds.key(), "aio_abcdefghijklmnopqrstuvwxyz12");
        assert!(creds.has_key());
    }

    #[test]
    fn test_empty_fields() {
        assert_eq!(
            BrokerCredentials::new("", "key"),
            Err(ConfigError::UsernameEmpty)
        );
        assert_eq!(
            BrokerCredentials::new("maker", ""),
            Err(ConfigError::KeyEmpty)
        );
    }

    #[test]
    fn test_length_limits() {
        assert!(BrokerCredentials::new("u".repeat(64), "key").is_ok());
        assert!(matches!(
            BrokerCredentials::new("u".repeat(65), "key"),
            Err(ConfigError::UsernameTooLong { .. })
        ));
        assert!(BrokerCredentials::new("maker", "k".repeat(128)).is_ok());
        assert!(matches!(
            BrokerCredentials::new("maker", "k".repeat(129)),
            Err(ConfigError::KeyTooLong { .. })
        ));
    }

    #[test]
    fn test_unchecked_skips_validation() {
        let creds = BrokerCredentials::unchecked("", "");
        assert!(!creds.has_key());
        assert_eq!(creds.validate(), Err(ConfigError::UsernameEmpty));
    }

    #[test]
    fn test_debug_masks_key() {
        let creds = BrokerCredentials::new("maker", "supersecretkey").unwrap();
        let debug = format!("{:?}", creds);
        assert!(debug.contains("maker"));
        assert!(debug.contains(REDACTED));
        assert!(!debug.contains("supersecretkey"));
    }
}
