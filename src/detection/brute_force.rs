//! Brute force login detection
//!
//! Flags an IP when a fixed number of its failed logins, taken in time
//! order, fall within a short window.

use chrono::Duration;
use std::path::Path;

use super::window::{group_by_ip, has_dense_run};
use crate::config::{BruteForceConfig, MAX_WINDOW_SECONDS};
use crate::error::Result;
use crate::input::load_auth_folder;
use crate::models::{AuthRecord, BruteForceFinding};

/// Report each IP with `failures` failed logins within `window_seconds`.
///
/// The reported count is the IP's total number of failures.
pub fn detect_brute_force(records: &[AuthRecord], config: &BruteForceConfig) -> Vec<BruteForceFinding> {
    let failures = group_by_ip(
        records
            .iter()
            .filter(|r| r.is_failure())
            .map(|r| (r.ip.as_str(), r.timestamp)),
    );
    let limit = Duration::seconds(config.window_seconds.clamp(0, MAX_WINDOW_SECONDS));

    failures
        .into_iter()
        .filter_map(|(ip, mut times)| {
            times.sort();
            has_dense_run(&times, config.failures, limit).then(|| BruteForceFinding {
                ip: ip.to_string(),
                failed_count: times.len(),
            })
        })
        .collect()
}

/// Load every auth log in `folder` and run brute force detection on it
pub fn detect_brute_force_in_folder(
    folder: &Path,
    config: &BruteForceConfig,
) -> Result<Vec<BruteForceFinding>> {
    let records = load_auth_folder(folder)?;
    Ok(detect_brute_force(&records, config))
}
