//! Message broker endpoint.
//!
//! Platform-independent description of where the telemetry broker lives.

use super::codec::{put_str, put_u16, Reader};
use super::error::ConfigError;
use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;

/// Default plain-text MQTT port.
pub const DEFAULT_MQTT_PORT: u16 = 1883;

/// Default MQTT-over-TLS port.
pub const DEFAULT_MQTTS_PORT: u16 = 8883;

/// Adafruit IO broker hostname.
pub const ADAFRUIT_IO_HOST: &str = "io.adafruit.com";

/// Maximum hostname length per RFC 1035.
pub const MAX_HOST_LEN: usize = 253;

/// Host and TCP port of a message broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerEndpoint {
    /// Hostname or IP address. IPv6 literals keep their brackets
    /// (`[::1]`) so `address()` and `url()` stay unambiguous.
    pub host: String,
    /// TCP port (1-65535).
    pub port: u16,
}

impl BrokerEndpoint {
    /// Create a validated broker endpoint.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, ConfigError> {
        let endpoint = Self {
            host: host.into(),
            port,
        };
        endpoint.validate()?;
        Ok(endpoint)
    }

    /// The Adafruit IO broker on the plain-text MQTT port.
    pub fn adafruit_io() -> Self {
        Self {
            host: ADAFRUIT_IO_HOST.to_string(),
            port: DEFAULT_MQTT_PORT,
        }
    }

    /// Validate the endpoint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::HostEmpty);
        }
        if self.host.len() > MAX_HOST_LEN {
            return Err(ConfigError::HostTooLong {
                len: self.host.len(),
                max: MAX_HOST_LEN,
            });
        }
        let valid = match ipv6_literal(&self.host) {
            Some(inner) => inner.parse::<Ipv6Addr>().is_ok(),
            None => !self
                .host
                .chars()
                .any(|c| c == ':' || c == '[' || c == ']' || c == '/' || c.is_whitespace()),
        };
        if !valid {
            return Err(ConfigError::HostInvalid(self.host.clone()));
        }
        if self.port == 0 {
            return Err(ConfigError::PortZero);
        }
        Ok(())
    }

    /// Get the address string for connection (host:port).
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the broker URL in the form MQTT clients expect.
    pub fn url(&self) -> String {
        let scheme = if self.port == DEFAULT_MQTTS_PORT {
            "mqtts"
        } else {
            "mqtt"
        };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    pub(crate) fn encode_into(&self, buf: &mut Vec<u8>) {
        put_str(buf, &self.host);
        put_u16(buf, self.port);
    }

    pub(crate) fn decode_from(reader: &mut Reader<'_>) -> Result<Self, ConfigError> {
        let host = reader.string("host")?;
        let port = reader.u16("port")?;
        Self::new(host, port)
    }
}

/// Address inside `[...]`, if `host` is written as a bracketed literal.
fn ipv6_literal(host: &str) -> Option<&str> {
    host.strip_prefix('[')?.strip_suffix(']')
}

/// Parse a port string into a non-zero TCP port.
pub fn parse_port(s: &str) -> Result<u16, ConfigError> {
    match s.trim().parse::<u16>() {
        Ok(0) => Err(ConfigError::PortZero),
        Ok(port) => Ok(port),
        Err(_) => Err(ConfigError::InvalidPort(s.to_string())),
    }
}

impl FromStr for BrokerEndpoint {
    type Err = ConfigError;

    /// Parse `host`, `host:port`, `[v6]` or `[v6]:port`; the port defaults
    /// to 1883.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('[') {
            let end = s
                .find(']')
                .ok_or_else(|| ConfigError::HostInvalid(s.to_string()))?;
            let (host, rest) = s.split_at(end + 1);
            return match rest.strip_prefix(':') {
                Some(port) => Self::new(host, parse_port(port)?),
                None if rest.is_empty() => Self::new(host, DEFAULT_MQTT_PORT),
                None => Err(ConfigError::HostInvalid(s.to_string())),
            };
        }
        match s.rsplit_once(':') {
            Some((host, port)) => Self::new(host, parse_port(port)?),
            None => Self::new(s, DEFAULT_MQTT_PORT),
        }
    }
}

impl fmt::Display for BrokerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address())
    }
}
