//! Host-side configuration check.
//!
//! Resolves the configuration the same way a development node would
//! (build-time values, then the stored file, then environment overrides),
//! prints it with secrets masked and runs preflight.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin config-check
//! WIFI_SSID="HomeNet" MQTT_USER="maker" cargo run --bin config-check -- --save
//! cargo run --bin config-check -- --serve 8000
//! cargo run --bin config-check -- --clear
//! ```
//!
//! Exits with status 1 when preflight finds issues.

// This binary only runs on the host, not on ESP32
#![cfg(not(target_os = "espidf"))]

use log::{error, info, warn};
use mqtt_node_esp32::config::{preflight, ConfigProvider, DeviceConfig};
use mqtt_node_esp32::network::{DeviceStatus, StatusServer, DEFAULT_STATUS_PORT};
use mqtt_node_esp32::persistence_host;
use std::process::exit;
use std::sync::Arc;
use std::time::Duration;

/// What the user asked for on the command line.
#[derive(Debug, PartialEq)]
struct Options {
    save: bool,
    clear: bool,
    serve: Option<u16>,
    help: bool,
}

/// Parse the arguments that follow the program name.
fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        save: false,
        clear: false,
        serve: None,
        help: false,
    };

    let mut iter = args.iter().peekable();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--save" => options.save = true,
            "--clear" => options.clear = true,
            "--serve" => {
                let port = match iter.peek().map(|p| p.parse::<u16>()) {
                    Some(Ok(port)) => {
                        iter.next();
                        port
                    }
                    _ => DEFAULT_STATUS_PORT,
                };
                options.serve = Some(port);
            }
            "--help" | "-h" => options.help = true,
            other => return Err(format!("Unknown option: {}", other)),
        }
    }

    // Clearing exits before a configuration is resolved
    if options.clear && (options.save || options.serve.is_some()) {
        return Err("--clear cannot be combined with --save or --serve".to_string());
    }

    Ok(options)
}

fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map_or("config-check", String::as_str);

    let options = match parse_options(args.get(1..).unwrap_or_default()) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Run {} --help for usage", program);
            exit(2);
        }
    };

    if options.help {
        println!("Usage: {} [OPTIONS]", program);
        println!();
        println!("Options:");
        println!("  --save          Store the resolved configuration");
        println!("  --clear         Remove the stored configuration (alone)");
        println!("  --serve [PORT]  Serve /status (default port {})", DEFAULT_STATUS_PORT);
        exit(0);
    }

    options
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_args();

    if options.clear {
        if let Err(e) = persistence_host::clear_config() {
            error!("Failed to clear stored configuration: {}", e);
            exit(1);
        }
        info!("Stored configuration cleared");
        return;
    }

    let base = match persistence_host::load_config() {
        Some(config) => {
            info!("Using stored configuration");
            config
        }
        None => {
            info!("Using build-time configuration");
            DeviceConfig::build_time()
        }
    };

    let config = match base.with_env_overrides() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid environment override: {}", e);
            exit(1);
        }
    };

    println!("=== Device Configuration ===\n");
    println!("WiFi:        {:?}", config.network_credentials());
    println!("Broker:      {}", config.broker_endpoint().url());
    println!("Credentials: {:?}", config.broker_credentials());
    println!();

    let report = preflight(&config);
    report.log();

    if options.save {
        if !report.is_ready() {
            error!("Refusing to save an incomplete configuration");
            exit(1);
        }
        if let Err(e) = persistence_host::save_config(&config) {
            error!("Failed to save configuration: {}", e);
            exit(1);
        }
    }

    if let Some(port) = options.serve {
        let status = Arc::new(DeviceStatus::new(&config));
        let _server = match StatusServer::start(None, port, status) {
            Ok(server) => server,
            Err(e) => {
                error!("Failed to start status server: {}", e);
                exit(1);
            }
        };

        info!("Serving status (Ctrl+C to exit)...");
        loop {
            std::thread::sleep(Duration::from_secs(60));
        }
    }

    if !report.is_ready() {
        warn!("Configuration is not ready");
        exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_parse_no_options() {
        let options = parse_options(&[]).unwrap();
        assert!(!options.save && !options.clear && !options.help);
        assert_eq!(options.serve, None);
    }

    #[test]
    fn test_parse_serve_port() {
        let options = parse_options(&args(&["--save", "--serve", "9000"])).unwrap();
        assert!(options.save);
        assert_eq!(options.serve, Some(9000));

        let options = parse_options(&args(&["--serve"])).unwrap();
        assert_eq!(options.serve, Some(DEFAULT_STATUS_PORT));
    }

    #[test]
    fn test_parse_clear_alone() {
        let options = parse_options(&args(&["--clear"])).unwrap();
        assert!(options.clear);
    }

    #[test]
    fn test_parse_clear_with_save_or_serve_rejected() {
        assert!(parse_options(&args(&["--clear", "--save"])).is_err());
        assert!(parse_options(&args(&["--serve", "--clear"])).is_err());
        assert!(parse_options(&args(&["--clear", "--serve", "8080"])).is_err());
    }

    #[test]
    fn test_parse_unknown_option() {
        assert_eq!(
            parse_options(&args(&["--verbose"])),
            Err("Unknown option: --verbose".to_string())
        );
    }
}
