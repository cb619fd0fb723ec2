//! Web attack classification
//!
//! Each access record runs through an ordered rule list. The first rule
//! that matches decides the reason; later rules are not consulted.

use std::path::Path;

use crate::config::WebAttackConfig;
use crate::error::Result;
use crate::input::load_access_folder;
use crate::models::{AccessRecord, WebAttackFinding, WebAttackReason};

type RuleCheck = fn(&AccessRecord, &WebAttackConfig) -> bool;

/// Rules in priority order
const RULES: [(WebAttackReason, RuleCheck); 4] = [
    (WebAttackReason::PathTraversal, is_path_traversal),
    (WebAttackReason::SqlInjection, is_sql_injection),
    (WebAttackReason::SuspiciousUserAgent, is_suspicious_agent),
    (WebAttackReason::SensitivePathAccess, is_sensitive_path),
];

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

fn is_path_traversal(record: &AccessRecord, config: &WebAttackConfig) -> bool {
    contains_any(&record.path, &config.traversal_markers)
}

fn is_sql_injection(record: &AccessRecord, config: &WebAttackConfig) -> bool {
    if contains_any(&record.path, &config.sql_injection_markers) {
        return true;
    }
    let lowered = record.path.to_lowercase();
    config
        .sql_injection_keywords
        .iter()
        .any(|k| lowered.contains(&k.to_lowercase()))
}

fn is_suspicious_agent(record: &AccessRecord, config: &WebAttackConfig) -> bool {
    let agent = record.agent.to_lowercase();
    config.suspicious_agents.iter().any(|a| *a == agent)
}

fn is_sensitive_path(record: &AccessRecord, config: &WebAttackConfig) -> bool {
    contains_any(&record.path, &config.sensitive_paths)
}

/// First matching reason for a single record
pub fn classify(record: &AccessRecord, config: &WebAttackConfig) -> Option<WebAttackReason> {
    RULES
        .iter()
        .find(|(_, check)| check(record, config))
        .map(|(reason, _)| *reason)
}

pub fn detect_web_attacks(records: &[AccessRecord], config: &WebAttackConfig) -> Vec<WebAttackFinding> {
    records
        .iter()
        .filter_map(|r| {
            classify(r, config).map(|reason| WebAttackFinding {
                ip: r.ip.clone(),
                reason,
                path: r.path.clone(),
            })
        })
        .collect()
}

/// Load every access log in `folder` and classify its records
pub fn detect_web_attacks_in_folder(
    folder: &Path,
    config: &WebAttackConfig,
) -> Result<Vec<WebAttackFinding>> {
    let records = load_access_folder(folder)?;
    Ok(detect_web_attacks(&records, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn create_request(path: &str, agent: &str) -> AccessRecord {
        AccessRecord {
            timestamp: DateTime::parse_from_rfc3339("2025-06-30T10:00:00+00:00").unwrap(),
            ip: "192.0.2.7".to_string(),
            method: "GET".to_string(),
            path: path.to_string(),
            status_code: 200,
            response_size: 10,
            agent: agent.to_string(),
            source_file: None,
        }
    }

    fn reason(path: &str, agent: &str) -> Option<WebAttackReason> {
        classify(&create_request(path, agent), &WebAttackConfig::default())
    }

    #[test]
    fn test_sql_injection() {
        assert_eq!(reason("/search?q=1=1", "Mozilla/5.0"), Some(WebAttackReason::SqlInjection));
        assert_eq!(reason("/item?id=5'--", "Mozilla/5.0"), Some(WebAttackReason::SqlInjection));
        assert_eq!(
            reason("/p?id=1%20UnIoN%20select", "Mozilla/5.0"),
            Some(WebAttackReason::SqlInjection)
        );
    }

    #[test]
    fn test_path_traversal() {
        assert_eq!(reason("/../../etc/passwd", "Mozilla/5.0"), Some(WebAttackReason::PathTraversal));
        assert_eq!(reason("/static/..%2fsecret", "Mozilla/5.0"), Some(WebAttackReason::PathTraversal));
    }

    #[test]
    fn test_traversal_wins_over_sql_injection() {
        assert_eq!(reason("/../x?q=1=1", "Mozilla/5.0"), Some(WebAttackReason::PathTraversal));
    }

    #[test]
    fn test_suspicious_user_agent() {
        assert_eq!(reason("/", "sqlmap"), Some(WebAttackReason::SuspiciousUserAgent));
        assert_eq!(reason("/", "SQLMAP"), Some(WebAttackReason::SuspiciousUserAgent));
        assert_eq!(reason("/", ""), Some(WebAttackReason::SuspiciousUserAgent));
        assert_eq!(reason("/", "-"), Some(WebAttackReason::SuspiciousUserAgent));
        assert_eq!(reason("/", "curl/7.80.0"), Some(WebAttackReason::SuspiciousUserAgent));
        assert_eq!(reason("/", "sqlmap/1.7"), None);
    }

    #[test]
    fn test_agent_checked_before_sensitive_path() {
        assert_eq!(reason("/admin", "curl/7.58.0"), Some(WebAttackReason::SuspiciousUserAgent));
    }

    #[test]
    fn test_sensitive_path() {
        assert_eq!(reason("/admin", "Mozilla/5.0"), Some(WebAttackReason::SensitivePathAccess));
        assert_eq!(reason("/app/.env", "Mozilla/5.0"), Some(WebAttackReason::SensitivePathAccess));
        assert_eq!(reason("/wp-admin/", "Mozilla/5.0"), Some(WebAttackReason::SensitivePathAccess));
    }

    #[test]
    fn test_clean_entry() {
        assert_eq!(reason("/home", "Mozilla/5.0"), None);
    }

    #[test]
    fn test_detect_keeps_input_order() {
        let records = vec![
            create_request("/admin", "Mozilla/5.0"),
            create_request("/home", "Mozilla/5.0"),
            create_request("/../etc", "Mozilla/5.0"),
        ];
        let result = detect_web_attacks(&records, &WebAttackConfig::default());

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].reason, WebAttackReason::SensitivePathAccess);
        assert_eq!(result[1].reason, WebAttackReason::PathTraversal);
        assert_eq!(result[1].path, "/../etc");
    }

    #[test]
    fn test_overridden_lists() {
        let config = WebAttackConfig {
            sensitive_paths: vec!["/internal".to_string()],
            ..WebAttackConfig::default()
        };
        let record = create_request("/internal/metrics", "Mozilla/5.0");
        assert_eq!(classify(&record, &config), Some(WebAttackReason::SensitivePathAccess));
        assert_eq!(classify(&create_request("/admin", "Mozilla/5.0"), &config), None);
    }
}
