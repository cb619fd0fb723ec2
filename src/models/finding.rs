//! Detector output types
//!
//! Each detector produces its own finding struct; `Finding` tags them so
//! heterogeneous results can travel through one collection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BruteForceFinding {
    pub ip: String,
    /// Total failed logins for the IP, not just the triggering run
    pub failed_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrusionFinding {
    pub ip: String,
    pub attempts: usize,
    pub window_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEnumerationFinding {
    pub ip: String,
    pub usernames: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortScanFinding {
    pub ip: String,
    pub distinct_ports: usize,
    pub window_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DosFinding {
    pub ip: String,
    pub request_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspiciousMethodFinding {
    pub ip: String,
    pub method: String,
    pub path: String,
}

/// Why an access line was classified as a web attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebAttackReason {
    PathTraversal,
    SqlInjection,
    SuspiciousUserAgent,
    SensitivePathAccess,
}

impl WebAttackReason {
    pub fn label(&self) -> &'static str {
        match self {
            WebAttackReason::PathTraversal => "Path Traversal",
            WebAttackReason::SqlInjection => "SQL Injection",
            WebAttackReason::SuspiciousUserAgent => "Suspicious User-Agent",
            WebAttackReason::SensitivePathAccess => "Access to Sensitive Path",
        }
    }
}

impl fmt::Display for WebAttackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAttackFinding {
    pub ip: String,
    pub reason: WebAttackReason,
    pub path: String,
}

/// A single suspicious condition reported by one detector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    BruteForce(BruteForceFinding),
    Intrusion(IntrusionFinding),
    UserEnumeration(UserEnumerationFinding),
    PortScan(PortScanFinding),
    Dos(DosFinding),
    SuspiciousHttpMethod(SuspiciousMethodFinding),
    WebAttack(WebAttackFinding),
}

impl Finding {
    /// Source address the finding is about
    pub fn ip(&self) -> &str {
        match self {
            Finding::BruteForce(f) => &f.ip,
            Finding::Intrusion(f) => &f.ip,
            Finding::UserEnumeration(f) => &f.ip,
            Finding::PortScan(f) => &f.ip,
            Finding::Dos(f) => &f.ip,
            Finding::SuspiciousHttpMethod(f) => &f.ip,
            Finding::WebAttack(f) => &f.ip,
        }
    }

    /// Serialized `kind` tag
    pub fn kind(&self) -> &'static str {
        match self {
            Finding::BruteForce(_) => "brute_force",
            Finding::Intrusion(_) => "intrusion",
            Finding::UserEnumeration(_) => "user_enumeration",
            Finding::PortScan(_) => "port_scan",
            Finding::Dos(_) => "dos",
            Finding::SuspiciousHttpMethod(_) => "suspicious_http_method",
            Finding::WebAttack(_) => "web_attack",
        }
    }

    /// Human readable detector name
    pub fn detector_name(&self) -> &'static str {
        match self {
            Finding::BruteForce(_) => "Brute Force",
            Finding::Intrusion(_) => "Intrusion",
            Finding::UserEnumeration(_) => "User Enumeration",
            Finding::PortScan(_) => "Port Scan",
            Finding::Dos(_) => "Denial of Service",
            Finding::SuspiciousHttpMethod(_) => "Suspicious HTTP Method",
            Finding::WebAttack(_) => "Web Attack",
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::BruteForce(b) => write!(f, "{} ({} failed attempts)", b.ip, b.failed_count),
            Finding::Intrusion(i) => write!(
                f,
                "{} reached {} failed attempts within {} minutes",
                i.ip, i.attempts, i.window_minutes
            ),
            Finding::UserEnumeration(u) => {
                let names: Vec<&str> = u.usernames.iter().map(String::as_str).collect();
                write!(f, "{} tried {} usernames: {}", u.ip, names.len(), names.join(", "))
            }
            Finding::PortScan(p) => write!(
                f,
                "{} hit {} distinct ports within {} minutes",
                p.ip, p.distinct_ports, p.window_minutes
            ),
            Finding::Dos(d) => write!(f, "{} sent {} requests", d.ip, d.request_count),
            Finding::SuspiciousHttpMethod(m) => {
                write!(f, "{} used {} on path: {}", m.ip, m.method, m.path)
            }
            Finding::WebAttack(w) => {
                write!(f, "{} triggered [{}] on path: {}", w.ip, w.reason, w.path)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brute_force_display() {
        let finding = Finding::BruteForce(BruteForceFinding {
            ip: "10.0.0.5".to_string(),
            failed_count: 7,
        });
        assert_eq!(finding.to_string(), "10.0.0.5 (7 failed attempts)");
        assert_eq!(finding.ip(), "10.0.0.5");
    }

    #[test]
    fn test_web_attack_display() {
        let finding = Finding::WebAttack(WebAttackFinding {
            ip: "1.2.3.4".to_string(),
            reason: WebAttackReason::SqlInjection,
            path: "/search?q=1=1".to_string(),
        });
        assert_eq!(
            finding.to_string(),
            "1.2.3.4 triggered [SQL Injection] on path: /search?q=1=1"
        );
    }

    #[test]
    fn test_json_is_tagged_by_kind() {
        let finding = Finding::Dos(DosFinding {
            ip: "9.9.9.9".to_string(),
            request_count: 150,
        });
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["kind"], "dos");
        assert_eq!(json["kind"], finding.kind());
        assert_eq!(json["request_count"], 150);

        let back: Finding = serde_json::from_value(json).unwrap();
        assert_eq!(back, finding);
    }
}
