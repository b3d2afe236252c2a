/// Variables baked into the firmware by `config::build_time`.
const CONFIG_ENV_VARS: [&str; 6] = [
    "WIFI_SSID",
    "WIFI_PASSWORD",
    "MQTT_SERVER",
    "MQTT_PORT",
    "MQTT_USER",
    "MQTT_PASS",
];

fn main() {
    // Rebuild when credentials change, not only when sources do
    for var in CONFIG_ENV_VARS {
        println!("cargo:rerun-if-env-changed={}", var);
    }

    // Only run ESP-IDF build system when targeting ESP32 (Xtensa architecture)
    // Build scripts run on the host, so we check the TARGET env var
    if let Ok(target) = std::env::var("TARGET") {
        if target.contains("xtensa") {
            embuild::espidf::sysenv::output();
        }
    }
}
