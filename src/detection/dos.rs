//! Volume-based denial of service detection. No time windowing.

use super::window::group_by_ip;
use crate::config::DosConfig;
use crate::models::{AccessRecord, DosFinding};

/// Report IPs whose total request count reaches `threshold`
pub fn detect_dos(records: &[AccessRecord], config: &DosConfig) -> Vec<DosFinding> {
    group_by_ip(records.iter().map(|r| (r.ip.as_str(), ())))
        .into_iter()
        .filter(|(_, hits)| hits.len() >= config.threshold)
        .map(|(ip, hits)| DosFinding {
            ip: ip.to_string(),
            request_count: hits.len(),
        })
        .collect()
}
