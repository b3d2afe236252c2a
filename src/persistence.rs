//! Device configuration persistence in NVS.
//!
//! Stores the full [`DeviceConfig`] in ESP32's Non-Volatile Storage so that
//! credentials provisioned with `configure-device` survive reboots and take
//! precedence over the values baked into the firmware.
//!
//! # Security
//!
//! NVS is not encrypted unless NVS encryption is enabled in the ESP-IDF
//! sdkconfig. Anyone with physical access can read the stored key.
//!
//! # Usage
//!
//! ```ignore
//! use mqtt_node_esp32::persistence;
//!
//! let nvs = persistence::init_nvs()?;
//! let config = persistence::load_or_build_time(&nvs);
//! ```

use crate::config::{
    DeviceConfig, MAX_HOST_LEN, MAX_KEY_LEN, MAX_PASSWORD_LEN, MAX_SSID_LEN, MAX_USERNAME_LEN,
};
use esp_idf_svc::nvs::{EspNvs, EspNvsPartition, NvsDefault};
use esp_idf_sys::EspError;
use log::info;

/// NVS namespace for device configuration.
const NVS_NAMESPACE: &str = "device_cfg";

/// NVS key for the encoded configuration.
const CONFIG_KEY: &str = "config";

/// Largest possible encoding: version, five length prefixes, two port bytes
/// and every field at its maximum length.
const MAX_CONFIG_BUFFER_SIZE: usize =
    1 + 5 + 2 + MAX_SSID_LEN + MAX_PASSWORD_LEN + MAX_HOST_LEN + MAX_USERNAME_LEN + MAX_KEY_LEN;

/// Load the device configuration from NVS.
///
/// Returns `None` if nothing is stored or if the stored data is corrupted.
pub fn load_device_config(nvs: &EspNvs<NvsDefault>) -> Option<DeviceConfig> {
    let mut buf = vec![0u8; MAX_CONFIG_BUFFER_SIZE];

    let bytes = match nvs.get_raw(CONFIG_KEY, &mut buf) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            log::debug!("No device configuration found in NVS");
            return None;
        }
        Err(e) => {
            log::warn!("Failed to read device configuration from NVS: {:?}", e);
            return None;
        }
    };

    match DeviceConfig::from_bytes(bytes) {
        Ok(config) => Some(config),
        Err(e) => {
            log::error!("Stored device configuration is invalid: {}", e);
            None
        }
    }
}

/// Save the device configuration to NVS with read-back verification.
///
/// An invalid configuration is refused with `ESP_ERR_INVALID_ARG` before
/// anything is written.
pub fn save_device_config(
    nvs: &mut EspNvs<NvsDefault>,
    config: &DeviceConfig,
) -> Result<(), EspError> {
    let bytes = config.to_bytes().map_err(|e| {
        log::error!("Refusing to store invalid device configuration: {}", e);
        EspError::from_infallible::<{ esp_idf_sys::ESP_ERR_INVALID_ARG }>()
    })?;
    debug_assert!(bytes.len() <= MAX_CONFIG_BUFFER_SIZE);

    nvs.set_raw(CONFIG_KEY, &bytes)?;

    // Catch silent flash write failures
    let mut verify_buf = vec![0u8; MAX_CONFIG_BUFFER_SIZE];
    let read_bytes = nvs
        .get_raw(CONFIG_KEY, &mut verify_buf)
        .map_err(|e| {
            log::error!("Failed to read back configuration after save: {:?}", e);
            e
        })?
        .ok_or_else(|| {
            log::error!("Configuration not found after save - possible flash failure");
            EspError::from_infallible::<{ esp_idf_sys::ESP_ERR_NVS_NOT_FOUND }>()
        })?;

    if read_bytes != bytes.as_slice() {
        log::error!("Configuration verification failed - data mismatch after save");
        return Err(EspError::from_infallible::<
            { esp_idf_sys::ESP_ERR_INVALID_CRC },
        >());
    }

    info!("Device configuration saved and verified in NVS");
    Ok(())
}

/// Clear the stored configuration from NVS.
///
/// The next boot falls back to the build-time values.
pub fn clear_device_config(nvs: &mut EspNvs<NvsDefault>) -> Result<(), EspError> {
    nvs.remove(CONFIG_KEY)?;
    log::warn!("Device configuration cleared from NVS - build-time values apply on next boot");
    Ok(())
}

/// Stored configuration if present, otherwise the build-time values.
pub fn load_or_build_time(nvs: &EspNvs<NvsDefault>) -> DeviceConfig {
    match load_device_config(nvs) {
        Some(config) => {
            info!("Using device configuration from NVS");
            config
        }
        None => {
            info!("Using build-time device configuration");
            DeviceConfig::build_time()
        }
    }
}

/// Initialize NVS for device configuration storage.
pub fn init_nvs() -> Result<EspNvs<NvsDefault>, EspError> {
    let partition = EspNvsPartition::<NvsDefault>::take()?;
    EspNvs::new(partition, NVS_NAMESPACE, true)
}
