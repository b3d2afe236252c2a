//! WiFi network credentials.
//!
//! Platform-independent so the validation rules can be tested on the host.
//!
//! # Example
//!
//! ```
//! use mqtt_node_esp32::config::NetworkCredentials;
//!
//! let creds = NetworkCredentials::new("MyNetwork", "MyPassword").unwrap();
//! assert!(!creds.is_open());
//! assert!(!format!("{:?}", creds).contains("MyPassword"));
//! ```

use super::codec::{put_str, Reader};
use super::error::ConfigError;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Maximum SSID length per IEEE 802.11 standard.
pub const MAX_SSID_LEN: usize = 32;

/// Maximum password length for WPA2.
pub const MAX_PASSWORD_LEN: usize = 64;

/// Minimum password length for WPA2.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Credentials for joining a WiFi access point.
///
/// The passphrase is wiped from memory when the value is dropped and is
/// never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct NetworkCredentials {
    /// Network SSID (1-32 bytes).
    pub ssid: String,
    /// Network passphrase (8-64 bytes for WPA2, empty for open networks).
    pub passphrase: String,
}

impl NetworkCredentials {
    /// Create validated network credentials.
    pub fn new(
        ssid: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let creds = Self {
            ssid: ssid.into(),
            passphrase: passphrase.into(),
        };
        creds.validate()?;
        Ok(creds)
    }

    /// Create credentials for an open network (no passphrase).
    pub fn open(ssid: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(ssid, String::new())
    }

    /// Validate the credentials.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ssid.is_empty() {
            return Err(ConfigError::SsidEmpty);
        }
        if self.ssid.len() > MAX_SSID_LEN {
            return Err(ConfigError::SsidTooLong {
                len: self.ssid.len(),
                max: MAX_SSID_LEN,
            });
        }

        // Empty is OK for open networks
        if !self.passphrase.is_empty() && self.passphrase.len() < MIN_PASSWORD_LEN {
            return Err(ConfigError::PasswordTooShort {
                len: self.passphrase.len(),
                min: MIN_PASSWORD_LEN,
            });
        }
        if self.passphrase.len() > MAX_PASSWORD_LEN {
            return Err(ConfigError::PasswordTooLong {
                len: self.passphrase.len(),
                max: MAX_PASSWORD_LEN,
            });
        }

        Ok(())
    }

    /// Check if this is an open network (no passphrase).
    pub fn is_open(&self) -> bool {
        self.passphrase.is_empty()
    }

    pub(crate) fn encode_into(&self, buf: &mut Vec<u8>) {
        put_str(buf, &self.ssid);
        put_str(buf, &self.passphrase);
    }

    pub(crate) fn decode_from(reader: &mut Reader<'_>) -> Result<Self, ConfigError> {
        let ssid = reader.string("SSID")?;
        let passphrase = reader.string("password")?;
        Self::new(ssid, passphrase)
    }
}

impl fmt::Debug for NetworkCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkCredentials")
            .field("ssid", &self.ssid)
            .field(
                "passphrase",
                &if self.is_open() { "(none)" } else { "****" },
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_credentials() {
        let creds = NetworkCredentials::new("TestNetwork", "password123").unwrap();
        assert_eq!(creds.ssid, "TestNetwork");
        assert_eq!(creds.passphrase, "password123");
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn test_open_network() {
        let creds = NetworkCredentials::open("OpenNetwork").unwrap();
        assert!(creds.is_open());
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn test_empty_ssid() {
        let result = NetworkCredentials::new("", "password123");
        assert_eq!(result, Err(ConfigError::SsidEmpty));
    }

    #[test]
    fn test_ssid_too_long() {
        let result = NetworkCredentials::new("a".repeat(33), "password123");
        assert!(matches!(result, Err(ConfigError::SsidTooLong { .. })));
    }

    #[test]
    fn test_ssid_max_length() {
        let creds = NetworkCredentials::new("a".repeat(32), "password123").unwrap();
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn test_password_too_short() {
        let result = NetworkCredentials::new("TestNetwork", "short");
        assert!(matches!(result, Err(ConfigError::PasswordTooShort { .. })));
    }

    #[test]
    fn test_password_bounds() {
        assert!(NetworkCredentials::new("TestNetwork", "12345678").is_ok());
        assert!(NetworkCredentials::new("TestNetwork", "a".repeat(64)).is_ok());
        assert!(matches!(
            NetworkCredentials::new("TestNetwork", "a".repeat(65)),
            Err(ConfigError::PasswordTooLong { .. })
        ));
    }

    #[test]
    fn test_debug_hides_passphrase() {
        let creds = NetworkCredentials::new("HomeNet", "hunter2hunter2").unwrap();
        let debug = format!("{:?}", creds);
        assert!(debug.contains("HomeNet"));
        assert!(debug.contains("****"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_decode_rejects_invalid() {
        let mut buf = Vec::new();
        put_str(&mut buf, "Net");
        put_str(&mut buf, "short");
        let result = NetworkCredentials::decode_from(&mut Reader::new(&buf));
        assert!(matches!(result, Err(ConfigError::PasswordTooShort { .. })));
    }
}
