//! The device configuration object and the provider trait.
//!
//! A [`DeviceConfig`] is built once at startup (from build-time values,
//! storage, or both) and handed to whichever component needs it.
//!
//! # Example
//!
//! ```
//! use mqtt_node_esp32::config::{ConfigProvider, DeviceConfig};
//!
//! let config = DeviceConfig::build_time();
//! println!("Broker: {}", config.broker_endpoint().url());
//! ```

use super::broker::{parse_port, BrokerEndpoint};
use super::build_time;
use super::codec::Reader;
use super::credentials::BrokerCredentials;
use super::error::ConfigError;
use super::wifi::NetworkCredentials;
use std::fmt;

/// Version byte written at the start of the binary encoding.
pub const CONFIG_FORMAT_VERSION: u8 = 1;

/// Supplies configuration values to the rest of the application.
///
/// Getters never fail: a provider always has a value for every field, even
/// if that value is an unedited template placeholder. Use
/// [`preflight`](super::preflight) to check before connecting.
pub trait ConfigProvider {
    /// WiFi network name and passphrase.
    fn network_credentials(&self) -> &NetworkCredentials;

    /// Broker host and port.
    fn broker_endpoint(&self) -> &BrokerEndpoint;

    /// Broker username and key.
    fn broker_credentials(&self) -> &BrokerCredentials;
}

/// A named configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    WifiSsid,
    WifiPassword,
    MqttServer,
    MqttPort,
    MqttUser,
    MqttPass,
}

impl ConfigField {
    /// Every field, in declaration order.
    pub const ALL: [ConfigField; 6] = [
        Self::WifiSsid,
        Self::WifiPassword,
        Self::MqttServer,
        Self::MqttPort,
        Self::MqttUser,
        Self::MqttPass,
    ];

    /// Environment variable that sets this field.
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::WifiSsid => "WIFI_SSID",
            Self::WifiPassword => "WIFI_PASSWORD",
            Self::MqttServer => "MQTT_SERVER",
            Self::MqttPort => "MQTT_PORT",
            Self::MqttUser => "MQTT_USER",
            Self::MqttPass => "MQTT_PASS",
        }
    }

    /// Whether the field holds a secret.
    pub fn is_secret(&self) -> bool {
        matches!(self, Self::WifiPassword | Self::MqttPass)
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.env_var())
    }
}

/// Complete, immutable device configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    network: NetworkCredentials,
    broker: BrokerEndpoint,
    credentials: BrokerCredentials,
}

impl DeviceConfig {
    /// Assemble a configuration from its parts without validating them.
    pub fn new(
        network: NetworkCredentials,
        broker: BrokerEndpoint,
        credentials: BrokerCredentials,
    ) -> Self {
        Self {
            network,
            broker,
            credentials,
        }
    }

    /// Configuration from the values baked in at compile time.
    ///
    /// Always succeeds; unedited templates yield placeholder values.
    pub fn build_time() -> Self {
        Self {
            network: NetworkCredentials {
                ssid: build_time::WIFI_SSID.to_string(),
                passphrase: build_time::WIFI_PASSWORD.to_string(),
            },
            broker: BrokerEndpoint {
                host: build_time::MQTT_SERVER.to_string(),
                port: build_time::MQTT_PORT,
            },
            credentials: BrokerCredentials::unchecked(build_time::MQTT_USER, build_time::MQTT_PASS),
        }
    }

    /// Replace fields for which `lookup` yields a value.
    ///
    /// `lookup` receives the environment variable name of each field, so
    /// `|name| std::env::var(name).ok()` applies process environment
    /// overrides. Only the port is parsed here; everything else is left
    /// for preflight.
    pub fn with_overrides<F>(&self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |field: ConfigField| lookup(field.env_var());

        let network = NetworkCredentials {
            ssid: get(ConfigField::WifiSsid).unwrap_or_else(|| self.network.ssid.clone()),
            passphrase: get(ConfigField::WifiPassword)
                .unwrap_or_else(|| self.network.passphrase.clone()),
        };

        let port = match get(ConfigField::MqttPort) {
            Some(raw) => parse_port(&raw)?,
            None => self.broker.port,
        };
        let broker = BrokerEndpoint {
            host: get(ConfigField::MqttServer).unwrap_or_else(|| self.broker.host.clone()),
            port,
        };

        let credentials = BrokerCredentials::unchecked(
            get(ConfigField::MqttUser).unwrap_or_else(|| self.credentials.username.clone()),
            get(ConfigField::MqttPass).unwrap_or_else(|| self.credentials.key().to_string()),
        );

        Ok(Self::new(network, broker, credentials))
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(&self) -> Result<Self, ConfigError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Validate every component, returning the first error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.network.validate()?;
        self.broker.validate()?;
        self.credentials.validate()
    }

    /// Serialize to bytes for flash storage.
    ///
    /// Format: `[version:1]` followed by length-prefixed ssid, passphrase
    /// and host, a big-endian `u16` port, then length-prefixed username
    /// and key.
    ///
    /// Every field is validated first, so each length fits its one-byte
    /// prefix.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        self.validate()?;

        let mut bytes = Vec::with_capacity(
            8 + self.network.ssid.len()
                + self.network.passphrase.len()
                + self.broker.host.len()
                + self.credentials.username.len()
                + self.credentials.key().len(),
        );
        bytes.push(CONFIG_FORMAT_VERSION);
        self.network.encode_into(&mut bytes);
        self.broker.encode_into(&mut bytes);
        self.credentials.encode_into(&mut bytes);
        Ok(bytes)
    }

    /// Deserialize and validate bytes produced by [`DeviceConfig::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.is_empty() {
            return Err(ConfigError::InvalidFormat("empty data".into()));
        }

        let mut reader = Reader::new(bytes);
        let version = reader.u8("version")?;
        if version != CONFIG_FORMAT_VERSION {
            return Err(ConfigError::InvalidFormat(format!(
                "unsupported version {}",
                version
            )));
        }

        let network = NetworkCredentials::decode_from(&mut reader)?;
        let broker = BrokerEndpoint::decode_from(&mut reader)?;
        let credentials = BrokerCredentials::decode_from(&mut reader)?;

        if reader.remaining() != 0 {
            return Err(ConfigError::InvalidFormat(format!(
                "{} trailing bytes",
                reader.remaining()
            )));
        }

        Ok(Self::new(network, broker, credentials))
    }
}

impl ConfigProvider for DeviceConfig {
    fn network_credentials(&self) -> &NetworkCredentials {
        &self.network
    }

    fn broker_endpoint(&self) -> &BrokerEndpoint {
        &self.broker
    }

    fn broker_credentials(&self) -> &BrokerCredentials {
        &self.credentials
    }
}

impl<P: ConfigProvider + ?Sized> ConfigProvider for &P {
    fn network_credentials(&self) -> &NetworkCredentials {
        (**self).network_credentials()
    }

    fn broker_endpoint(&self) -> &BrokerEndpoint {
        (**self).broker_endpoint()
    }

    fn broker_credentials(&self) -> &BrokerCredentials {
        (**self).broker_credentials()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_config() -> DeviceConfig {
        DeviceConfig::new(
            NetworkCredentials::new("HomeNet", "correcthorse").unwrap(),
            BrokerEndpoint::adafruit_io(),
            BrokerCredentials::new("maker", "aio_0123456789abcdef0123456789ab").unwrap(),
        )
    }

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    // ==================== Provider Tests ====================

    #[test]
    fn test_provider_getters() {
        let config = sample_config();
        assert_eq!(config.network_credentials().ssid, "HomeNet");
        assert_eq!(config.broker_endpoint().address(), "io.adafruit.com:1883");
        assert_eq!(config.broker_credentials().username, "maker");
    }

    #[test]
    fn test_provider_through_reference() {
        fn host_of(provider: impl ConfigProvider) -> String {
            provider.broker_endpoint().host.clone()
        }
        let config = sample_config();
        assert_eq!(host_of(&config), "io.adafruit.com");
    }

    #[test]
    fn test_build_time_always_available() {
        let config = DeviceConfig::build_time();
        assert!(!config.network_credentials().ssid.is_empty());
        assert!(!config.broker_endpoint().host.is_empty());
        assert!(config.broker_endpoint().port >= 1);
        assert!(!config.broker_credentials().username.is_empty());
        assert!(config.broker_credentials().has_key());
    }

    #[test]
    fn test_config_field_env_vars() {
        let names: Vec<&str> = ConfigField::ALL.iter().map(|f| f.env_var()).collect();
        assert_eq!(
            names,
            [
                "WIFI_SSID",
                "WIFI_PASSWORD",
                "MQTT_SERVER",
                "MQTT_PORT",
                "MQTT_USER",
                "MQTT_PASS"
            ]
        );
        assert!(ConfigField::MqttPass.is_secret());
        assert!(!ConfigField::MqttUser.is_secret());
    }

    // ==================== Override Tests ====================

    #[test]
    fn test_overrides_replace_only_given_fields() {
        let base = sample_config();
        let config = base
            .with_overrides(lookup_from(&[
                ("WIFI_SSID", "Office"),
                ("MQTT_PORT", "8883"),
            ]))
            .unwrap();

        assert_eq!(config.network_credentials().ssid, "Office");
        assert_eq!(config.network_credentials().passphrase, "correcthorse");
        assert_eq!(config.broker_endpoint().host, "io.adafruit.com");
        assert_eq!(config.broker_endpoint().port, 8883);
        assert_eq!(config.broker_credentials().username, "maker");
    }

    #[test]
    fn test_overrides_none_is_identity() {
        let base = sample_config();
        let config = base.with_overrides(|_| None).unwrap();
        assert_eq!(config, base);
    }

    #[test]
    fn test_overrides_secret_key() {
        let config = sample_config()
            .with_overrides(lookup_from(&[("MQTT_PASS", "newkey")]))
            .unwrap();
        assert_eq!(config.broker_credentials().key(), "newkey");
    }

    #[test]
    fn test_overrides_bad_port() {
        let result = sample_config().with_overrides(lookup_from(&[("MQTT_PORT", "abc")]));
        assert!(matches!(result, Err(ConfigError::InvalidPort(_))));

        let result = sample_config().with_overrides(lookup_from(&[("MQTT_PORT", "0")]));
        assert_eq!(result, Err(ConfigError::PortZero));
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn test_serialize_deserialize() {
        let config = sample_config();
        let restored = DeviceConfig::from_bytes(&config.to_bytes().unwrap()).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn test_serialize_open_network() {
        let config = DeviceConfig::new(
            NetworkCredentials::open("Cafe").unwrap(),
            BrokerEndpoint::new("10.0.0.2", 1884).unwrap(),
            BrokerCredentials::new("maker", "key").unwrap(),
        );
        let restored = DeviceConfig::from_bytes(&config.to_bytes().unwrap()).unwrap();
        assert!(restored.network_credentials().is_open());
        assert_eq!(restored.broker_endpoint().port, 1884);
    }

    #[test]
    fn test_serialized_layout() {
        let bytes = sample_config().to_bytes().unwrap();
        assert_eq!(bytes[0], CONFIG_FORMAT_VERSION);
        assert_eq!(bytes[1] as usize, "HomeNet".len());
        assert_eq!(&bytes[2..9], b"HomeNet");
    }

    #[test]
    fn test_serialize_rejects_oversized_key() {
        let long_key = "k".repeat(300);
        let config = sample_config()
            .with_overrides(lookup_from(&[("MQTT_PASS", long_key.as_str())]))
            .unwrap();
        assert_eq!(
            config.to_bytes(),
            Err(ConfigError::KeyTooLong { len: 300, max: 128 })
        );
    }

    #[test]
    fn test_serialize_rejects_invalid_host() {
        let config = sample_config()
            .with_overrides(lookup_from(&[("MQTT_SERVER", "io.adafruit.com:1883")]))
            .unwrap();
        assert!(matches!(
            config.to_bytes(),
            Err(ConfigError::HostInvalid(_))
        ));
    }

    #[test]
    fn test_deserialize_empty() {
        let result = DeviceConfig::from_bytes(&[]);
        assert!(matches!(result, Err(ConfigError::InvalidFormat(_))));
    }

    #[test]
    fn test_deserialize_wrong_version() {
        let mut bytes = sample_config().to_bytes().unwrap();
        bytes[0] = 9;
        let result = DeviceConfig::from_bytes(&bytes);
        assert_eq!(
            result,
            Err(ConfigError::InvalidFormat("unsupported version 9".into()))
        );
    }

    #[test]
    fn test_deserialize_truncated() {
        let bytes = sample_config().to_bytes().unwrap();
        let result = DeviceConfig::from_bytes(&bytes[..bytes.len() - 3]);
        assert!(matches!(result, Err(ConfigError::InvalidFormat(_))));
    }

    #[test]
    fn test_deserialize_trailing_bytes() {
        let mut bytes = sample_config().to_bytes().unwrap();
        bytes.push(0);
        let result = DeviceConfig::from_bytes(&bytes);
        assert!(matches!(result, Err(ConfigError::InvalidFormat(_))));
    }

    #[test]
    fn test_debug_has_no_secrets() {
        let debug = format!("{:?}", sample_config());
        assert!(!debug.contains("correcthorse"));
        assert!(!debug.contains("aio_0123456789"));
    }
}
