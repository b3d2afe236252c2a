//! Configuration errors.

use std::fmt;

/// Errors that can occur while validating or decoding configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// SSID is empty.
    SsidEmpty,
    /// SSID exceeds maximum length.
    SsidTooLong { len: usize, max: usize },
    /// Password is too short for WPA2.
    PasswordTooShort { len: usize, min: usize },
    /// Password exceeds maximum length.
    PasswordTooLong { len: usize, max: usize },
    /// Broker host is empty.
    HostEmpty,
    /// Broker host exceeds maximum length.
    HostTooLong { len: usize, max: usize },
    /// Broker host contains whitespace, a scheme or a port separator, or is
    /// a malformed `[...]` IPv6 literal.
    HostInvalid(String),
    /// Port 0 is not a connectable TCP port.
    PortZero,
    /// Port string could not be parsed.
    InvalidPort(String),
    /// Broker username is empty.
    UsernameEmpty,
    /// Broker username exceeds maximum length.
    UsernameTooLong { len: usize, max: usize },
    /// Broker key is empty.
    KeyEmpty,
    /// Broker key exceeds maximum length.
    KeyTooLong { len: usize, max: usize },
    /// Invalid data format during deserialization.
    InvalidFormat(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SsidEmpty => write!(f, "SSID cannot be empty"),
            Self::SsidTooLong { len, max } => {
                write!(f, "SSID too long: {} bytes (max {})", len, max)
            }
            Self::PasswordTooShort { len, min } => {
                write!(f, "password too short: {} bytes (min {})", len, min)
            }
            Self::PasswordTooLong { len, max } => {
                write!(f, "password too long: {} bytes (max {})", len, max)
            }
            Self::HostEmpty => write!(f, "broker host cannot be empty"),
            Self::HostTooLong { len, max } => {
                write!(f, "broker host too long: {} bytes (max {})", len, max)
            }
            Self::HostInvalid(host) => write!(f, "invalid broker host: {:?}", host),
            Self::PortZero => write!(f, "broker port must be in 1..=65535"),
            Self::InvalidPort(port) => write!(f, "invalid broker port: {:?}", port),
            Self::UsernameEmpty => write!(f, "broker username cannot be empty"),
            Self::UsernameTooLong { len, max } => {
                write!(f, "broker username too long: {} bytes (max {})", len, max)
            }
            Self::KeyEmpty => write!(f, "broker key cannot be empty"),
            Self::KeyTooLong { len, max } => {
                write!(f, "broker key too long: {} bytes (max {})", len, max)
            }
            Self::InvalidFormat(msg) => write!(f, "invalid format: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
