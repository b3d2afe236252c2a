//! HTTP status server for configuration monitoring.
//!
//! Provides a `/status` endpoint that returns the active configuration
//! (with secrets masked) and the preflight result as JSON.
//! Uses `tiny_http` which works on both host and ESP32 (via std::net).
//!
//! # Example Response
//!
//! ```json
//! {
//!   "uptime_secs": 42,
//!   "ready": false,
//!   "network": { "ssid": "YOUR_SSID", "passphrase_set": true },
//!   "broker": { "host": "io.adafruit.com", "port": 1883, "url": "mqtt://io.adafruit.com:1883" },
//!   "credentials": { "username": "maker", "key": "****" },
//!   "issues": ["WIFI_SSID still holds the template placeholder"]
//! }
//! ```

use crate::config::{preflight, ConfigProvider, REDACTED};
use log::{error, info, warn};
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::io::Cursor;
use std::thread;
use std::time::{Duration, Instant};
use tiny_http::{Header, Method, Response, Server};

/// Default port for the status server.
pub const DEFAULT_STATUS_PORT: u16 = 8000;

/// Escape a string for embedding in a JSON document.
fn json_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Redacted snapshot of a configuration, safe to serve over HTTP.
///
/// Secrets are not copied; only whether they are set.
#[derive(Debug)]
pub struct DeviceStatus {
    /// When the snapshot was taken.
    start_time: Instant,
    ssid: String,
    passphrase_set: bool,
    host: String,
    port: u16,
    url: String,
    username: String,
    key_set: bool,
    issues: Vec<String>,
}

impl DeviceStatus {
    /// Take a snapshot of `provider` and run preflight on it.
    pub fn new(provider: &impl ConfigProvider) -> Self {
        let network = provider.network_credentials();
        let broker = provider.broker_endpoint();
        let credentials = provider.broker_credentials();
        let report = preflight(provider);

        Self {
            start_time: Instant::now(),
            ssid: network.ssid.clone(),
            passphrase_set: !network.is_open(),
            host: broker.host.clone(),
            port: broker.port,
            url: broker.url(),
            username: credentials.username.clone(),
            key_set: credentials.has_key(),
            issues: report.issues().iter().map(|i| i.to_string()).collect(),
        }
    }

    /// Get uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// True when preflight found nothing.
    pub fn is_ready(&self) -> bool {
        self.issues.is_empty()
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> String {
        let issues: Vec<String> = self.issues.iter().map(|i| json_escape(i)).collect();
        format!(
            r#"{{"uptime_secs":{},"ready":{},"network":{{"ssid":{},"passphrase_set":{}}},"broker":{{"host":{},"port":{},"url":{}}},"credentials":{{"username":{},"key":{}}},"issues":[{}]}}"#,
            self.uptime_secs(),
            self.is_ready(),
            json_escape(&self.ssid),
            self.passphrase_set,
            json_escape(&self.host),
            self.port,
            json_escape(&self.url),
            json_escape(&self.username),
            if self.key_set {
                json_escape(REDACTED)
            } else {
                "null".to_string()
            },
            issues.join(",")
        )
    }
}

/// HTTP status server.
///
/// Runs in a background thread and serves the device status as JSON.
pub struct StatusServer {
    /// Server thread handle.
    handle: Option<thread::JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Port actually bound (differs from the requested one when that was 0).
    port: u16,
}

impl StatusServer {
    /// Start the status server.
    ///
    /// # Arguments
    ///
    /// * `bind_addr` - IP address to bind to (use `None` for 0.0.0.0)
    /// * `port` - Port to listen on (0 picks a free port)
    /// * `status` - Shared status snapshot to serve
    ///
    /// # Returns
    ///
    /// A handle to the running server. Drop it to stop the server.
    pub fn start(
        bind_addr: Option<IpAddr>,
        port: u16,
        status: Arc<DeviceStatus>,
    ) -> Result<Self, std::io::Error> {
        let addr = match bind_addr {
            Some(ip) => format!("{}:{}", ip, port),
            None => format!("0.0.0.0:{}", port),
        };

        let server = Server::http(&addr)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::AddrInUse, format!("{}", e)))?;

        let bound_port = server
            .server_addr()
            .to_ip()
            .map(|a| a.port())
            .unwrap_or(port);

        info!(
            "Status server listening on http://{}:{}/status",
            bind_addr.map_or_else(|| "0.0.0.0".to_string(), |ip| ip.to_string()),
            bound_port
        );

        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::spawn(move || {
            Self::run_server(server, status, shutdown_clone);
        });

        Ok(Self {
            handle: Some(handle),
            shutdown,
            port: bound_port,
        })
    }

    /// Port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    fn run_server(server: Server, status: Arc<DeviceStatus>, shutdown: Arc<AtomicBool>) {
        loop {
            if shutdown.load(Ordering::Acquire) {
                info!("Status server shutting down");
                break;
            }

            match server.recv_timeout(Duration::from_millis(100)) {
                Ok(Some(request)) => {
                    let path = request.url().to_string();
                    let response = route(request.method(), &path, &status);
                    if let Err(e) = request.respond(response) {
                        warn!("Failed to answer request for {}: {}", path, e);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    error!("Server error: {}", e);
                    break;
                }
            }
        }
    }

    /// Stop the server.
    ///
    /// Note: May take up to 100ms due to polling interval.
    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Response for a single request: JSON on `/status`, a redirect from `/`,
/// 404 elsewhere and 405 for anything but GET.
fn route(method: &Method, path: &str, status: &DeviceStatus) -> Response<Cursor<Vec<u8>>> {
    let (code, body, header): (u16, String, Option<&str>) = match (method, path) {
        (Method::Get, "/status" | "/status/") => {
            (200, status.to_json(), Some("Content-Type: application/json"))
        }
        (Method::Get, "/") => (
            302,
            "See /status for device status".to_string(),
            Some("Location: /status"),
        ),
        (Method::Get, _) => (404, "Not Found".to_string(), None),
        _ => (405, "Method Not Allowed".to_string(), Some("Allow: GET")),
    };

    let mut response = Response::from_string(body).with_status_code(code);
    if let Some(header) = header.and_then(|h| h.parse::<Header>().ok()) {
        response.add_header(header);
    }
    response
}

impl Drop for StatusServer {
    fn drop(&mut self) {
        self.stop();
    }
}
