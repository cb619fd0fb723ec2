use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SentryError};

/// HTTP methods flagged by the suspicious-method detector
pub const SUSPICIOUS_METHODS: &[&str] = &["PUT", "DELETE", "TRACE", "TRACK", "OPTIONS"];

/// Path fragments that indicate directory traversal (case-sensitive)
pub const TRAVERSAL_MARKERS: &[&str] = &["../", "..%2f"];

/// Path fragments that indicate SQL injection (case-sensitive)
pub const SQL_INJECTION_MARKERS: &[&str] = &["'", "1=1"];

/// Path keywords that indicate SQL injection (case-insensitive)
pub const SQL_INJECTION_KEYWORDS: &[&str] = &["union"];

/// Lower-cased user agents treated as tooling rather than browsers
pub const SUSPICIOUS_AGENTS: &[&str] = &[
    "",
    "-",
    "sqlmap",
    "curl/7.58.0",
    "curl/7.64.1",
    "curl/7.80.0",
];

/// Largest brute force window, in seconds, that a `chrono::Duration` can hold
pub const MAX_WINDOW_SECONDS: i64 = i64::MAX / 1000;

/// Path fragments of admin and secret locations
pub const SENSITIVE_PATHS: &[&str] = &["/admin", "/wp-admin", "/config", "/.env"];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where to read logs from
    pub input: InputConfig,
    /// Detector thresholds and pattern lists
    pub detection: DetectionConfig,
    /// How findings are written
    pub output: OutputConfig,
}

/// Input folder configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Folder of sshd auth logs (`*.log`)
    pub auth_dir: Option<PathBuf>,
    /// Folder of HTTP access logs (`*.log`)
    pub access_dir: Option<PathBuf>,
}

/// Detection rules configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub brute_force: BruteForceConfig,
    pub intrusion: IntrusionConfig,
    pub user_enumeration: UserEnumerationConfig,
    pub port_scan: PortScanConfig,
    pub dos: DosConfig,
    pub http_method: HttpMethodConfig,
    pub web_attack: WebAttackConfig,
}

/// Brute force: `failures` failed logins within `window_seconds`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BruteForceConfig {
    pub window_seconds: i64,
    pub failures: usize,
}

impl Default for BruteForceConfig {
    fn default() -> Self {
        BruteForceConfig {
            window_seconds: 60,
            failures: 5,
        }
    }
}

/// Intrusion: `max_attempts` failed logins within `window_minutes`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntrusionConfig {
    pub max_attempts: usize,
    pub window_minutes: u32,
}

impl Default for IntrusionConfig {
    fn default() -> Self {
        IntrusionConfig {
            max_attempts: 5,
            window_minutes: 2,
        }
    }
}

/// User enumeration: distinct invalid usernames per IP
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserEnumerationConfig {
    pub threshold: usize,
}

impl Default for UserEnumerationConfig {
    fn default() -> Self {
        UserEnumerationConfig { threshold: 5 }
    }
}

/// Port scan: distinct ports per IP within a resetting window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortScanConfig {
    pub threshold: usize,
    pub window_minutes: u32,
}

impl Default for PortScanConfig {
    fn default() -> Self {
        PortScanConfig {
            threshold: 10,
            window_minutes: 5,
        }
    }
}

/// Denial of service: total requests per IP
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DosConfig {
    pub threshold: usize,
}

impl Default for DosConfig {
    fn default() -> Self {
        DosConfig { threshold: 100 }
    }
}

/// Suspicious HTTP methods, compared upper-cased
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpMethodConfig {
    pub methods: Vec<String>,
}

impl Default for HttpMethodConfig {
    fn default() -> Self {
        HttpMethodConfig {
            methods: to_strings(SUSPICIOUS_METHODS),
        }
    }
}

/// Pattern lists for the web attack rule chain
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebAttackConfig {
    pub traversal_markers: Vec<String>,
    pub sql_injection_markers: Vec<String>,
    pub sql_injection_keywords: Vec<String>,
    pub suspicious_agents: Vec<String>,
    pub sensitive_paths: Vec<String>,
}

impl Default for WebAttackConfig {
    fn default() -> Self {
        WebAttackConfig {
            traversal_markers: to_strings(TRAVERSAL_MARKERS),
            sql_injection_markers: to_strings(SQL_INJECTION_MARKERS),
            sql_injection_keywords: to_strings(SQL_INJECTION_KEYWORDS),
            suspicious_agents: to_strings(SUSPICIOUS_AGENTS),
            sensitive_paths: to_strings(SENSITIVE_PATHS),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json", "jsonl", "csv", or "console"
    pub format: String,
    /// Output file path (stdout when absent)
    pub file_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: "console".to_string(),
            file_path: None,
        }
    }
}

impl DetectionConfig {
    /// Reject windows and thresholds that can never or always fire
    pub fn validate(&self) -> Result<()> {
        let checks = [
            (self.brute_force.failures == 0, "brute_force.failures must be at least 1"),
            (self.brute_force.window_seconds < 0, "brute_force.window_seconds must not be negative"),
            (
                self.brute_force.window_seconds > MAX_WINDOW_SECONDS,
                "brute_force.window_seconds is too large",
            ),
            (self.intrusion.max_attempts == 0, "intrusion.max_attempts must be at least 1"),
            (self.user_enumeration.threshold == 0, "user_enumeration.threshold must be at least 1"),
            (self.port_scan.threshold == 0, "port_scan.threshold must be at least 1"),
            (self.dos.threshold == 0, "dos.threshold must be at least 1"),
        ];

        match checks.iter().find(|(failed, _)| *failed) {
            Some((_, message)) => Err(SentryError::Configuration(message.to_string())),
            None => Ok(()),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.detection.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
