//! Port scan detection over HTTP access logs
//!
//! A port is taken from the request target (`:8080`). Each IP's attempts
//! are walked in time order through a window that restarts whenever an
//! attempt lands more than `window_minutes` after the window start.

use chrono::Duration;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::window::group_by_ip;
use crate::config::PortScanConfig;
use crate::models::{AccessRecord, PortScanFinding};

static RE_PATH_PORT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":(\d+)").expect("regex"));

/// Port mentioned in a request target, if any
pub fn extract_port(path: &str) -> Option<&str> {
    RE_PATH_PORT.captures(path)?.get(1).map(|m| m.as_str())
}

pub fn detect_port_scans(records: &[AccessRecord], config: &PortScanConfig) -> Vec<PortScanFinding> {
    let attempts = group_by_ip(records.iter().filter_map(|r| {
        let port = extract_port(&r.path)?;
        Some((r.ip.as_str(), (r.timestamp, port)))
    }));
    let window = Duration::minutes(i64::from(config.window_minutes));

    let mut flagged = Vec::new();
    for (ip, mut attempts) in attempts {
        attempts.sort();

        let mut ports_seen: HashSet<&str> = HashSet::new();
        let mut window_start = None;

        for (timestamp, port) in attempts {
            let start = *window_start.get_or_insert(timestamp);
            if timestamp - start > window {
                ports_seen.clear();
                window_start = Some(timestamp);
            }

            ports_seen.insert(port);
            if ports_seen.len() >= config.threshold {
                flagged.push(PortScanFinding {
                    ip: ip.to_string(),
                    distinct_ports: ports_seen.len(),
                    window_minutes: config.window_minutes,
                });
                break;
            }
        }
    }

    flagged
}
