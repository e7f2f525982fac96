// Run configuration

use crate::Result;
use crate::error::WatchError;
use crate::monitor::types::HostTarget;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete configuration for one checking pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfiguration {
    /// Certificates with fewer remaining days than this are reported
    pub threshold: i64,
    #[serde(default)]
    pub verbose: bool,
    /// Maximum number of probes in flight
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Per-probe deadline in seconds
    #[serde(default = "default_timeout_seconds", alias = "timeout")]
    pub timeout_seconds: u64,
    /// Endpoints to check, in report order
    #[serde(default)]
    pub hosts: Vec<HostEntry>,
    pub smtp: SmtpSettings,
    pub email: EmailTemplate,
}

/// Raw host entry as written in the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEntry {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

impl HostEntry {
    pub fn new(host: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            host: Some(host.into()),
            port,
        }
    }
}

/// SMTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "SmtpSettingsFile")]
pub struct SmtpSettings {
    pub host: String,
    pub port: Option<u16>,
    pub security: SmtpSecurity,
    pub timeout_seconds: Option<u64>,
    pub auth: Option<SmtpAuth>,
}

/// `smtp` table as written on disk.
///
/// Besides `security`, accepts the nodemailer-style `secure` flag:
/// `true` means implicit TLS, `false` means STARTTLS. An explicit
/// `security` wins when both are present.
#[derive(Deserialize)]
struct SmtpSettingsFile {
    host: String,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    security: Option<SmtpSecurity>,
    #[serde(default)]
    secure: Option<bool>,
    #[serde(default)]
    timeout_seconds: Option<u64>,
    #[serde(default)]
    auth: Option<SmtpAuth>,
}

impl From<SmtpSettingsFile> for SmtpSettings {
    fn from(file: SmtpSettingsFile) -> Self {
        let security = match (file.security, file.secure) {
            (Some(security), _) => security,
            (None, Some(true)) => SmtpSecurity::Tls,
            (None, Some(false)) | (None, None) => SmtpSecurity::Starttls,
        };

        Self {
            host: file.host,
            port: file.port,
            security,
            timeout_seconds: file.timeout_seconds,
            auth: file.auth,
        }
    }
}

impl SmtpSettings {
    /// Configured port, or the conventional one for the security mode
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(match self.security {
            SmtpSecurity::Tls => 465,
            SmtpSecurity::Starttls => 587,
            SmtpSecurity::None => 25,
        })
    }
}

/// How the SMTP connection is secured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Plain connection, no TLS
    None,
    /// Upgrade with STARTTLS
    #[default]
    Starttls,
    /// Implicit TLS from the first byte
    Tls,
}

impl std::fmt::Display for SmtpSecurity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SmtpSecurity::None => write!(f, "none"),
            SmtpSecurity::Starttls => write!(f, "starttls"),
            SmtpSecurity::Tls => write!(f, "tls"),
        }
    }
}

/// SMTP credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpAuth {
    pub user: String,
    pub pass: String,
}

/// Fixed parts of the report email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailTemplate {
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub footer: String,
    #[serde(alias = "fromAddr")]
    pub from_addr: String,
    /// One address or a comma separated list
    #[serde(alias = "toAddr")]
    pub to_addr: String,
    pub subject: String,
}

impl EmailTemplate {
    /// Recipients split out of `to_addr`
    pub fn recipients(&self) -> Vec<String> {
        self.to_addr
            .split(',')
            .map(str::trim)
            .filter(|addr| !addr.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn default_concurrency() -> usize {
    4
}

fn default_timeout_seconds() -> u64 {
    10
}

impl RunConfiguration {
    /// Load configuration from a TOML file, or JSON when the extension is `.json`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            WatchError::config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config = if is_json {
            Self::from_json_str(&contents)?
        } else {
            Self::from_toml_str(&contents)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse TOML without validating
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Parse JSON without validating
    pub fn from_json_str(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Reject configurations that cannot produce a meaningful run
    pub fn validate(&self) -> Result<()> {
        if self.threshold < 0 {
            return Err(WatchError::config(format!(
                "threshold must not be negative (got {})",
                self.threshold
            )));
        }

        if self.concurrency == 0 {
            return Err(WatchError::config("concurrency must be at least 1"));
        }

        if self.timeout_seconds == 0 {
            return Err(WatchError::config("timeout_seconds must be at least 1"));
        }

        for (idx, entry) in self.hosts.iter().enumerate() {
            HostTarget::from_entry(entry).map_err(|_| {
                WatchError::config(format!("no hostname provided for hosts[{}]", idx))
            })?;
        }

        if self.smtp.host.trim().is_empty() {
            return Err(WatchError::config("smtp.host must not be empty"));
        }

        if self.email.recipients().is_empty() {
            return Err(WatchError::config("email.to_addr must name a recipient"));
        }

        Ok(())
    }

    /// Example configuration written by `--config-example`
    pub fn example() -> Self {
        Self {
            hosts: vec![
                HostEntry::new("example.com", None),
                HostEntry::new("mail.example.com", Some(465)),
            ],
            threshold: 30,
            verbose: false,
            concurrency: default_concurrency(),
            timeout_seconds: default_timeout_seconds(),
            smtp: SmtpSettings {
                host: "smtp.example.com".to_string(),
                port: Some(587),
                security: SmtpSecurity::Starttls,
                auth: Some(SmtpAuth {
                    user: "alerts@example.com".to_string(),
                    pass: "change-me".to_string(),
                }),
                timeout_seconds: Some(30),
            },
            email: EmailTemplate {
                header: "The following certificates expire soon:\n\n".to_string(),
                footer: "\nPlease renew them.\n".to_string(),
                from_addr: "certwatch@example.com".to_string(),
                to_addr: "ops@example.com".to_string(),
                subject: "Certificates about to expire".to_string(),
            },
        }
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| WatchError::Other(format!("Failed to serialize config: {}", e)))?;

        fs::write(path.as_ref(), toml_str).map_err(|e| {
            WatchError::Other(format!(
                "Failed to write config file {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TOML_CONFIG: &str = r#"
threshold = 30
verbose = true

[[hosts]]
host = "a.example"

[[hosts]]
host = "b.example"
port = 8443

[smtp]
host = "smtp.example.com"
security = "tls"

[smtp.auth]
user = "alerts"
pass = "secret"

[email]
header = "Expiring:\n"
footer = "-- certwatch\n"
from_addr = "certwatch@example.com"
to_addr = "ops@example.com, sec@example.com"
subject = "Certificates expiring"
"#;

    const JSON_CONFIG: &str = r#"{
        "hosts": [{ "host": "a.example", "port": 443 }, { "host": "b.example" }],
        "threshold": 14,
        "verbose": false,
        "smtp": { "host": "smtp.example.com", "port": 25, "security": "none" },
        "email": {
            "header": "Hi\n",
            "footer": "Bye\n",
            "fromAddr": "certwatch@example.com",
            "toAddr": "ops@example.com",
            "subject": "Expiring"
        }
    }"#;

    #[test]
    fn test_parse_toml_with_defaults() {
        let config = RunConfiguration::from_toml_str(TOML_CONFIG).unwrap();
        config.validate().unwrap();

        assert_eq!(config.threshold, 30);
        assert!(config.verbose);
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.hosts.len(), 2);
        assert_eq!(config.hosts[0].port, None);
        assert_eq!(config.smtp.security, SmtpSecurity::Tls);
        assert_eq!(config.smtp.effective_port(), 465);
        assert_eq!(
            config.email.recipients(),
            vec!["ops@example.com", "sec@example.com"]
        );
    }

    #[test]
    fn test_parse_json_with_camel_case_addresses() {
        let config = RunConfiguration::from_json_str(JSON_CONFIG).unwrap();
        config.validate().unwrap();

        assert_eq!(config.email.from_addr, "certwatch@example.com");
        assert_eq!(config.email.to_addr, "ops@example.com");
        assert_eq!(config.smtp.effective_port(), 25);
    }

    #[test]
    fn test_nodemailer_secure_flag_selects_implicit_tls() {
        let json = r#"{
            "hosts": [{ "host": "a.example" }],
            "threshold": 30,
            "smtp": {
                "host": "smtp.example.com",
                "port": 465,
                "secure": true,
                "auth": { "user": "alerts", "pass": "secret" }
            },
            "email": {
                "fromAddr": "certwatch@example.com",
                "toAddr": "ops@example.com",
                "subject": "Expiring"
            }
        }"#;

        let config = RunConfiguration::from_json_str(json).unwrap();
        config.validate().unwrap();

        assert_eq!(config.smtp.security, SmtpSecurity::Tls);
        assert_eq!(config.smtp.effective_port(), 465);
        assert_eq!(config.smtp.auth.unwrap().user, "alerts");
    }

    #[test]
    fn test_smtp_security_resolution() {
        let parse = |smtp: &str| -> SmtpSecurity {
            let json = format!(
                r#"{{"threshold": 1, "smtp": {}, "email": {{"fromAddr": "a@example.com", "toAddr": "b@example.com", "subject": "s"}}}}"#,
                smtp
            );
            RunConfiguration::from_json_str(&json).unwrap().smtp.security
        };

        assert_eq!(parse(r#"{"host": "h", "secure": false}"#), SmtpSecurity::Starttls);
        assert_eq!(parse(r#"{"host": "h"}"#), SmtpSecurity::Starttls);
        assert_eq!(
            parse(r#"{"host": "h", "secure": true, "security": "none"}"#),
            SmtpSecurity::None
        );
    }

    #[test]
    fn test_targets_apply_default_port_in_order() {
        let config = RunConfiguration::from_toml_str(TOML_CONFIG).unwrap();
        let targets: Vec<HostTarget> = config
            .hosts
            .iter()
            .map(|entry| HostTarget::from_entry(entry).unwrap())
            .collect();

        assert_eq!(targets[0].to_string(), "a.example:443");
        assert_eq!(targets[1].to_string(), "b.example:8443");
        // raw entries are not rewritten
        assert_eq!(config.hosts[0].port, None);
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let mut config = RunConfiguration::example();
        config.threshold = -1;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, WatchError::ConfigError { .. }));
        assert!(err.to_string().contains("threshold"));
    }

    #[test]
    fn test_missing_host_rejected() {
        let mut config = RunConfiguration::example();
        config.hosts.push(HostEntry {
            host: None,
            port: Some(443),
        });

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("hosts[2]"));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = RunConfiguration::example();
        config.concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_picks_format_by_extension() {
        let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        json_file.write_all(JSON_CONFIG.as_bytes()).unwrap();
        let config = RunConfiguration::from_file(json_file.path()).unwrap();
        assert_eq!(config.threshold, 14);

        let mut toml_file = NamedTempFile::new().unwrap();
        toml_file.write_all(TOML_CONFIG.as_bytes()).unwrap();
        let config = RunConfiguration::from_file(toml_file.path()).unwrap();
        assert_eq!(config.threshold, 30);
    }

    #[test]
    fn test_from_file_missing_is_config_error() {
        let err = RunConfiguration::from_file("/nonexistent/certwatch.toml").unwrap_err();
        assert!(matches!(err, WatchError::ConfigError { .. }));
    }

    #[test]
    fn test_example_round_trips_through_file() {
        let file = NamedTempFile::new().unwrap();
        RunConfiguration::example().save_to_file(file.path()).unwrap();

        let loaded = RunConfiguration::from_file(file.path()).unwrap();
        assert_eq!(loaded.hosts.len(), 2);
        assert_eq!(loaded.threshold, 30);
    }
}
