//! Device configuration.
//!
//! Everything a node needs to know before it can join a network and talk
//! to its telemetry broker.
//!
//! # Components
//!
//! - [`build_time`] - values baked in at compile time (template placeholders by default)
//! - [`DeviceConfig`] - the immutable configuration object, implements [`ConfigProvider`]
//! - [`preflight`] - placeholder and validation checks before connecting
//!
//! # Example
//!
//! ```
//! use mqtt_node_esp32::config::{preflight, ConfigProvider, DeviceConfig};
//!
//! let config = DeviceConfig::build_time();
//! let report = preflight(&config);
//! report.log();
//! println!("Broker: {}", config.broker_endpoint());
//! ```

mod broker;
pub mod build_time;
mod codec;
mod credentials;
mod device;
mod error;
mod preflight;
mod wifi;

pub use broker::{
    parse_port, BrokerEndpoint, ADAFRUIT_IO_HOST, DEFAULT_MQTTS_PORT, DEFAULT_MQTT_PORT,
    MAX_HOST_LEN,
};
pub use credentials::{BrokerCredentials, MAX_KEY_LEN, MAX_USERNAME_LEN, REDACTED};
pub use device::{ConfigField, ConfigProvider, DeviceConfig, CONFIG_FORMAT_VERSION};
pub use error::ConfigError;
pub use preflight::{is_placeholder, placeholder_for, preflight, PreflightIssue, PreflightReport};
pub use wifi::{NetworkCredentials, MAX_PASSWORD_LEN, MAX_SSID_LEN, MIN_PASSWORD_LEN};
