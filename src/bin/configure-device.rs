//! Device configuration utility for ESP32.
//!
//! Stores the configuration baked in at compile time to NVS, so the main
//! firmware picks it up on every boot.
//!
//! Usage:
//!   WIFI_SSID="MyNetwork" WIFI_PASSWORD="secret123" \
//!   MQTT_USER="maker" MQTT_PASS="aio_xxx" \
//!   cargo espflash flash --bin configure-device --features esp32 --release --monitor
//!
//! `MQTT_SERVER` and `MQTT_PORT` default to io.adafruit.com:1883.

/// Print error message and halt. On ESP32, we pause briefly then return
/// so the process terminates cleanly (espflash monitor will show the output).
#[cfg(feature = "esp32")]
fn halt_with_error(msg: &str) -> ! {
    eprintln!("\n{}", msg);
    eprintln!("\n=== Configuration failed ===\n");
    // Brief pause to ensure serial output is flushed before process exits
    std::thread::sleep(std::time::Duration::from_secs(2));
    std::process::exit(1);
}

#[cfg(feature = "esp32")]
fn main() {
    use mqtt_node_esp32::config::{preflight, ConfigProvider, DeviceConfig};
    use mqtt_node_esp32::persistence::{init_nvs, save_device_config};

    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    println!("\n=== Device Configuration Utility ===\n");

    let config = DeviceConfig::build_time();
    println!("WiFi:        {:?}", config.network_credentials());
    println!("Broker:      {}", config.broker_endpoint().url());
    println!("Credentials: {:?}", config.broker_credentials());

    let report = preflight(&config);
    if !report.is_ready() {
        let lines: Vec<String> = report
            .issues()
            .iter()
            .map(|issue| format!("  - {}", issue))
            .collect();
        halt_with_error(&format!(
            "Error: configuration is incomplete:\n{}\n\n\
             Set the variables above when building, e.g.:\n  \
             WIFI_SSID=\"MyNetwork\" WIFI_PASSWORD=\"secret123\" \
             MQTT_USER=\"maker\" MQTT_PASS=\"aio_xxx\" cargo espflash flash --bin configure-device",
            lines.join("\n")
        ));
    }

    match init_nvs() {
        Ok(mut nvs) => match save_device_config(&mut nvs, &config) {
            Ok(()) => {
                println!("\n=== Device configuration saved to NVS ===");
                println!("\nCredentials persist across reboots.");
            }
            Err(e) => {
                halt_with_error(&format!("Error saving to NVS: {:?}", e));
            }
        },
        Err(e) => {
            halt_with_error(&format!("Error initializing NVS: {:?}", e));
        }
    }

    println!("\n=== Done - flash the main firmware next ===\n");

    // Brief pause to ensure serial output is visible, then exit cleanly
    std::thread::sleep(std::time::Duration::from_secs(2));
}

#[cfg(not(feature = "esp32"))]
fn main() {
    eprintln!("This binary must be built for ESP32.");
    eprintln!();
    eprintln!("Usage:");
    eprintln!(
        "  WIFI_SSID=\"MyNetwork\" WIFI_PASSWORD=\"secret123\" MQTT_USER=\"maker\" MQTT_PASS=\"aio_xxx\" \\"
    );
    eprintln!("  cargo espflash flash --bin configure-device --features esp32 --release");
    std::process::exit(1);
}
