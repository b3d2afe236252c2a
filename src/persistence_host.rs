//! Device configuration persistence for host (development) builds.
//!
//! Stores the configuration as JSON so it persists across runs.
//! Uses `~/.mqtt-node-esp32/device.json` by default.
//!
//! # Usage
//!
//! ```ignore
//! use mqtt_node_esp32::persistence_host;
//!
//! let config = persistence_host::load_config()
//!     .unwrap_or_else(DeviceConfig::build_time);
//! ```

use crate::config::{
    BrokerCredentials, BrokerEndpoint, ConfigProvider, DeviceConfig, NetworkCredentials,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// On-disk layout of the configuration file.
#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
struct StoredConfig {
    wifi_ssid: String,
    wifi_password: String,
    mqtt_server: String,
    mqtt_port: u16,
    mqtt_user: String,
    mqtt_pass: String,
}

impl StoredConfig {
    fn from_config(config: &DeviceConfig) -> Self {
        let network = config.network_credentials();
        let broker = config.broker_endpoint();
        let credentials = config.broker_credentials();
        Self {
            wifi_ssid: network.ssid.clone(),
            wifi_password: network.passphrase.clone(),
            mqtt_server: broker.host.clone(),
            mqtt_port: broker.port,
            mqtt_user: credentials.username.clone(),
            mqtt_pass: credentials.key().to_string(),
        }
    }

    fn to_config(&self) -> Result<DeviceConfig, crate::config::ConfigError> {
        Ok(DeviceConfig::new(
            NetworkCredentials::new(self.wifi_ssid.as_str(), self.wifi_password.as_str())?,
            BrokerEndpoint::new(self.mqtt_server.as_str(), self.mqtt_port)?,
            BrokerCredentials::new(self.mqtt_user.as_str(), self.mqtt_pass.as_str())?,
        ))
    }
}

/// Get the default configuration file path.
///
/// Returns `~/.mqtt-node-esp32/device.json`
pub fn default_config_path() -> io::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| io::Error::new(io::ErrorKind::NotFound, "HOME not set"))?;
    Ok(PathBuf::from(home)
        .join(".mqtt-node-esp32")
        .join("device.json"))
}

/// Load configuration from a specific path.
///
/// Returns `None` if the file does not exist or holds invalid data.
pub fn load_config_from(path: &Path) -> Option<DeviceConfig> {
    let json = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("No configuration file found at {:?}", path);
            return None;
        }
        Err(e) => {
            log::warn!("Failed to read configuration file: {}", e);
            return None;
        }
    };

    let stored: StoredConfig = match serde_json::from_str(&json) {
        Ok(stored) => stored,
        Err(e) => {
            log::error!("Failed to parse stored configuration: {}", e);
            return None;
        }
    };

    match stored.to_config() {
        Ok(config) => Some(config),
        Err(e) => {
            log::error!("Stored configuration is invalid: {}", e);
            None
        }
    }
}

/// Load configuration from the default path.
pub fn load_config() -> Option<DeviceConfig> {
    let path = default_config_path().ok()?;
    load_config_from(&path)
}

/// Save configuration to a specific path.
///
/// The file holds secrets, so on unix it is created readable by the
/// owner only.
pub fn save_config_to(config: &DeviceConfig, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let stored = StoredConfig::from_config(config);
    let json = serde_json::to_string_pretty(&stored)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, &json)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    // Verify write by reading back
    let read_back = fs::read_to_string(path)?;
    if read_back != json {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Configuration verification failed: wrote {} bytes, read {} bytes",
                json.len(),
                read_back.len()
            ),
        ));
    }

    info!("Configuration saved to {:?}", path);
    Ok(())
}

/// Save configuration to the default path.
pub fn save_config(config: &DeviceConfig) -> io::Result<()> {
    let path = default_config_path()?;
    save_config_to(config, &path)
}

/// Remove the configuration file at a specific path.
///
/// A missing file is not an error.
pub fn clear_config_at(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            info!("Configuration removed from {:?}", path);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Remove the configuration file at the default path.
pub fn clear_config() -> io::Result<()> {
    let path = default_config_path()?;
    clear_config_at(&path)
}
