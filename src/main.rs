//! MQTT telemetry node firmware binary.

#[cfg(feature = "esp32")]
fn main() {
    use mqtt_node_esp32::config::{preflight, ConfigProvider, DeviceConfig};
    use mqtt_node_esp32::persistence;
    use std::time::Duration;

    // Link ESP-IDF patches (must be first!)
    esp_idf_sys::link_patches();

    println!("=== MQTT node starting ===");

    // Initialize ESP-IDF logger for log crate integration
    esp_idf_svc::log::EspLogger::initialize_default();

    let config = match persistence::init_nvs() {
        Ok(nvs) => persistence::load_or_build_time(&nvs),
        Err(e) => {
            log::warn!("NVS unavailable ({:?}), using build-time configuration", e);
            DeviceConfig::build_time()
        }
    };

    log::info!("WiFi: {:?}", config.network_credentials());
    log::info!("Broker: {}", config.broker_endpoint().url());
    log::info!("Credentials: {:?}", config.broker_credentials());

    let report = preflight(&config);
    report.log();

    // The WiFi and MQTT clients take `config` from here.

    println!("Entering main loop...");
    let mut heartbeat_counter = 0u64;
    loop {
        std::thread::sleep(Duration::from_secs(30));
        heartbeat_counter += 1;
        if report.is_ready() {
            log::info!("Heartbeat #{}", heartbeat_counter);
        } else {
            log::warn!(
                "Heartbeat #{} - configuration incomplete, run configure-device or rebuild",
                heartbeat_counter
            );
        }
    }
}

#[cfg(not(feature = "esp32"))]
fn main() {
    println!("This binary requires the 'esp32' feature.");
    println!("Use 'cargo run --bin config-check' to inspect the configuration on the host.");
}
