//! Intrusion detection: the configurable form of brute force detection.

use chrono::Duration;

use super::window::{group_by_ip, has_dense_run};
use crate::config::IntrusionConfig;
use crate::models::{AuthRecord, IntrusionFinding};

/// Report each IP with `max_attempts` failed logins inside `window_minutes`.
///
/// Findings echo the configuration rather than per-IP counts.
pub fn detect_intrusions(records: &[AuthRecord], config: &IntrusionConfig) -> Vec<IntrusionFinding> {
    let failures = group_by_ip(
        records
            .iter()
            .filter(|r| r.is_failure())
            .map(|r| (r.ip.as_str(), r.timestamp)),
    );
    let limit = Duration::minutes(i64::from(config.window_minutes));

    failures
        .into_iter()
        .filter_map(|(ip, mut times)| {
            times.sort();
            has_dense_run(&times, config.max_attempts, limit).then(|| IntrusionFinding {
                ip: ip.to_string(),
                attempts: config.max_attempts,
                window_minutes: config.window_minutes,
            })
        })
        .collect()
}
