//! Values baked into the binary at compile time.
//!
//! Each constant is read from the environment variable of the same name
//! when the crate is built, falling back to the template placeholder:
//!
//! ```bash
//! WIFI_SSID="HomeNet" WIFI_PASSWORD="secret123" \
//! MQTT_USER="maker" MQTT_PASS="aio_xxx" cargo build --release
//! ```
//!
//! An invalid `MQTT_PORT` fails the build rather than the device.

use super::broker::{ADAFRUIT_IO_HOST, DEFAULT_MQTT_PORT};

/// Template value for the WiFi SSID.
pub const PLACEHOLDER_SSID: &str = "YOUR_SSID";

/// Template value for the WiFi password.
pub const PLACEHOLDER_PASSWORD: &str = "YOUR_PASSWORD";

/// Template value for the broker username.
pub const PLACEHOLDER_USERNAME: &str = "YOUR_ADAFRUIT_IO_USERNAME";

/// Template value for the broker key.
pub const PLACEHOLDER_KEY: &str = "YOUR_ADAFRUIT_IO_KEY";

/// WiFi network name.
pub const WIFI_SSID: &str = match option_env!("WIFI_SSID") {
    Some(v) => v,
    None => PLACEHOLDER_SSID,
};

/// WiFi passphrase.
pub const WIFI_PASSWORD: &str = match option_env!("WIFI_PASSWORD") {
    Some(v) => v,
    None => PLACEHOLDER_PASSWORD,
};

/// Broker hostname.
pub const MQTT_SERVER: &str = match option_env!("MQTT_SERVER") {
    Some(v) => v,
    None => ADAFRUIT_IO_HOST,
};

/// Broker TCP port.
pub const MQTT_PORT: u16 = match option_env!("MQTT_PORT") {
    Some(v) => const_parse_port(v),
    None => DEFAULT_MQTT_PORT,
};

/// Broker username.
pub const MQTT_USER: &str = match option_env!("MQTT_USER") {
    Some(v) => v,
    None => PLACEHOLDER_USERNAME,
};

/// Broker key.
pub const MQTT_PASS: &str = match option_env!("MQTT_PASS") {
    Some(v) => v,
    None => PLACEHOLDER_KEY,
};

/// Parse a decimal port in const context. Panics (a compile error when
/// evaluated for a `const`) on anything outside 1..=65535.
const fn const_parse_port(s: &str) -> u16 {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        panic!("MQTT_PORT is empty");
    }

    let mut value: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !b.is_ascii_digit() {
            panic!("MQTT_PORT must be a decimal number");
        }
        value = value * 10 + (b - b'0') as u32;
        if value > u16::MAX as u32 {
            panic!("MQTT_PORT must be at most 65535");
        }
        i += 1;
    }

    if value == 0 {
        panic!("MQTT_PORT must not be 0");
    }
    value as u16
}
