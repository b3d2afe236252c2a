//! MQTT telemetry node configuration library for ESP32.
//!
//! This library contains platform-independent components that can be tested
//! on the host machine without ESP32 hardware.

pub mod config;
pub mod network;
#[cfg(feature = "esp32")]
pub mod persistence;
#[cfg(not(target_os = "espidf"))]
pub mod persistence_host;

// Re-export commonly used items
pub use config::{
    preflight, BrokerCredentials, BrokerEndpoint, ConfigError, ConfigProvider, DeviceConfig,
    NetworkCredentials, PreflightReport,
};
pub use network::{DeviceStatus, StatusServer, DEFAULT_STATUS_PORT};
