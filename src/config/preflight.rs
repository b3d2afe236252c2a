//! Pre-connection checks.
//!
//! A firmware image built from the unedited template still boots, and only
//! fails later when the access point or the broker rejects it. Preflight
//! catches that earlier: it flags fields still holding template
//! placeholders and fields that fail validation, so the operator sees a
//! warning before any connection is attempted.

use super::build_time::{
    PLACEHOLDER_KEY, PLACEHOLDER_PASSWORD, PLACEHOLDER_SSID, PLACEHOLDER_USERNAME,
};
use super::device::{ConfigField, ConfigProvider};
use super::error::ConfigError;
use log::{info, warn};
use std::fmt;

/// Template placeholder for a field, if it has one.
pub fn placeholder_for(field: ConfigField) -> Option<&'static str> {
    match field {
        ConfigField::WifiSsid => Some(PLACEHOLDER_SSID),
        ConfigField::WifiPassword => Some(PLACEHOLDER_PASSWORD),
        ConfigField::MqttUser => Some(PLACEHOLDER_USERNAME),
        ConfigField::MqttPass => Some(PLACEHOLDER_KEY),
        ConfigField::MqttServer | ConfigField::MqttPort => None,
    }
}

/// Check whether `value` is the unedited template value of `field`.
pub fn is_placeholder(field: ConfigField, value: &str) -> bool {
    placeholder_for(field) == Some(value)
}

/// A single problem found by [`preflight`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreflightIssue {
    /// The field still holds its template placeholder.
    Placeholder(ConfigField),
    /// The field failed validation.
    Invalid(ConfigField, ConfigError),
}

impl PreflightIssue {
    /// The field this issue concerns.
    pub fn field(&self) -> ConfigField {
        match self {
            Self::Placeholder(field) | Self::Invalid(field, _) => *field,
        }
    }
}

impl fmt::Display for PreflightIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder(field) => {
                write!(f, "{} still holds the template placeholder", field)
            }
            Self::Invalid(field, err) => write!(f, "{}: {}", field, err),
        }
    }
}

/// Outcome of a preflight check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreflightReport {
    issues: Vec<PreflightIssue>,
}

impl PreflightReport {
    /// True when no issues were found.
    pub fn is_ready(&self) -> bool {
        self.issues.is_empty()
    }

    /// All issues, in field order.
    pub fn issues(&self) -> &[PreflightIssue] {
        &self.issues
    }

    /// Check whether any issue concerns `field`.
    pub fn has_issue(&self, field: ConfigField) -> bool {
        self.issues.iter().any(|issue| issue.field() == field)
    }

    /// Log one warning per issue, or a single info line when ready.
    pub fn log(&self) {
        if self.is_ready() {
            info!("Preflight passed: configuration looks complete");
            return;
        }
        for issue in &self.issues {
            warn!("Preflight: {} (set {} and rebuild)", issue, issue.field().env_var());
        }
        warn!(
            "Preflight found {} issue(s); connections will likely fail",
            self.issues.len()
        );
    }
}

/// Field that a validation error belongs to.
fn field_of(err: &ConfigError) -> ConfigField {
    match err {
        ConfigError::SsidEmpty | ConfigError::SsidTooLong { .. } => ConfigField::WifiSsid,
        ConfigError::PasswordTooShort { .. } | ConfigError::PasswordTooLong { .. } => {
            ConfigField::WifiPassword
        }
        ConfigError::PortZero | ConfigError::InvalidPort(_) => ConfigField::MqttPort,
        ConfigError::UsernameEmpty | ConfigError::UsernameTooLong { .. } => ConfigField::MqttUser,
        ConfigError::KeyEmpty | ConfigError::KeyTooLong { .. } => ConfigField::MqttPass,
        ConfigError::HostEmpty
        | ConfigError::HostTooLong { .. }
        | ConfigError::HostInvalid(_)
        | ConfigError::InvalidFormat(_) => ConfigField::MqttServer,
    }
}

/// Check a configuration for placeholders and invalid values.
pub fn preflight(provider: &impl ConfigProvider) -> PreflightReport {
    let network = provider.network_credentials();
    let broker = provider.broker_endpoint();
    let credentials = provider.broker_credentials();

    let values = [
        (ConfigField::WifiSsid, network.ssid.as_str()),
        (ConfigField::WifiPassword, network.passphrase.as_str()),
        (ConfigField::MqttUser, credentials.username.as_str()),
        (ConfigField::MqttPass, credentials.key()),
    ];

    let mut issues: Vec<PreflightIssue> = values
        .iter()
        .filter(|(field, value)| is_placeholder(*field, value))
        .map(|(field, _)| PreflightIssue::Placeholder(*field))
        .collect();

    let checks = [
        network.validate(),
        broker.validate(),
        credentials.validate(),
    ];
    for err in checks.into_iter().filter_map(Result::err) {
        issues.push(PreflightIssue::Invalid(field_of(&err), err));
    }

    // Keep the report in field declaration order
    issues.sort_by_key(|issue| {
        ConfigField::ALL
            .iter()
            .position(|f| *f == issue.field())
            .unwrap_or(usize::MAX)
    });

    PreflightReport { issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BrokerCredentials, BrokerEndpoint, DeviceConfig, NetworkCredentials};

    fn template_config() -> DeviceConfig {
        DeviceConfig::new(
            NetworkCredentials {
                ssid: PLACEHOLDER_SSID.to_string(),
                passphrase: PLACEHOLDER_PASSWORD.to_string(),
            },
            BrokerEndpoint::adafruit_io(),
            BrokerCredentials::unchecked(PLACEHOLDER_USERNAME, PLACEHOLDER_KEY),
        )
    }

    fn filled_config() -> DeviceConfig {
        DeviceConfig::new(
            NetworkCredentials::new("HomeNet", "correcthorse").unwrap(),
            BrokerEndpoint::adafruit_io(),
            BrokerCredentials::new("maker", "aio_key").unwrap(),
        )
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(is_placeholder(ConfigField::WifiSsid, "YOUR_SSID"));
        assert!(is_placeholder(ConfigField::WifiPassword, "YOUR_PASSWORD"));
        assert!(is_placeholder(ConfigField::MqttUser, "YOUR_ADAFRUIT_IO_USERNAME"));
        assert!(is_placeholder(ConfigField::MqttPass, "YOUR_ADAFRUIT_IO_KEY"));
        assert!(!is_placeholder(ConfigField::WifiSsid, "HomeNet"));
        assert!(!is_placeholder(ConfigField::WifiSsid, "your_ssid"));
        assert!(!is_placeholder(ConfigField::MqttServer, "io.adafruit.com"));
    }

    #[test]
    fn test_template_flags_all_placeholders() {
        let report = preflight(&template_config());
        assert!(!report.is_ready());
        assert_eq!(
            report.issues(),
            &[
                PreflightIssue::Placeholder(ConfigField::WifiSsid),
                PreflightIssue::Placeholder(ConfigField::WifiPassword),
                PreflightIssue::Placeholder(ConfigField::MqttUser),
                PreflightIssue::Placeholder(ConfigField::MqttPass),
            ]
        );
        assert!(!report.has_issue(ConfigField::MqttServer));
    }

    #[test]
    fn test_filled_config_is_ready() {
        let report = preflight(&filled_config());
        assert!(report.is_ready());
        assert!(report.issues().is_empty());
    }

    #[test]
    fn test_invalid_values_reported() {
        let config = DeviceConfig::new(
            NetworkCredentials {
                ssid: "HomeNet".to_string(),
                passphrase: "short".to_string(),
            },
            BrokerEndpoint {
                host: "io.adafruit.com".to_string(),
                port: 0,
            },
            BrokerCredentials::unchecked("maker", ""),
        );
        let report = preflight(&config);

        assert_eq!(report.issues().len(), 3);
        assert!(matches!(
            report.issues()[0],
            PreflightIssue::Invalid(ConfigField::WifiPassword, ConfigError::PasswordTooShort { .. })
        ));
        assert_eq!(
            report.issues()[1],
            PreflightIssue::Invalid(ConfigField::MqttPort, ConfigError::PortZero)
        );
        assert_eq!(
            report.issues()[2],
            PreflightIssue::Invalid(ConfigField::MqttPass, ConfigError::KeyEmpty)
        );
    }

    #[test]
    fn test_server_with_port_suffix_reported() {
        let config = filled_config()
            .with_overrides(|name: &str| {
                (name == "MQTT_SERVER").then(|| "io.adafruit.com:1883".to_string())
            })
            .unwrap();
        let report = preflight(&config);

        assert!(!report.is_ready());
        assert!(matches!(
            report.issues(),
            [PreflightIssue::Invalid(ConfigField::MqttServer, ConfigError::HostInvalid(_))]
        ));
    }

    #[test]
    fn test_issue_display() {
        let issue = PreflightIssue::Placeholder(ConfigField::MqttPass);
        assert_eq!(
            issue.to_string(),
            "MQTT_PASS still holds the template placeholder"
        );
        let issue = PreflightIssue::Invalid(ConfigField::MqttPort, ConfigError::PortZero);
        assert_eq!(issue.to_string(), "MQTT_PORT: broker port must be in 1..=65535");
    }
}
