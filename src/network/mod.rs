//! Network-facing services.
//!
//! The WiFi and MQTT clients live outside this crate and consume a
//! [`DeviceConfig`](crate::config::DeviceConfig); this module only carries
//! the HTTP status endpoint, which works on both host and ESP32.
//!
//! # Example
//!
//! ```no_run
//! use mqtt_node_esp32::config::DeviceConfig;
//! use mqtt_node_esp32::network::{DeviceStatus, StatusServer, DEFAULT_STATUS_PORT};
//! use std::sync::Arc;
//!
//! let config = DeviceConfig::build_time();
//! let status = Arc::new(DeviceStatus::new(&config));
//! let _server = StatusServer::start(None, DEFAULT_STATUS_PORT, status)?;
//! # Ok::<(), std::io::Error>(())
//! ```

mod status_server;

pub use status_server::{DeviceStatus, StatusServer, DEFAULT_STATUS_PORT};
