//! Per-request check for HTTP methods that rarely belong on a public site.

use crate::config::HttpMethodConfig;
use crate::models::{AccessRecord, SuspiciousMethodFinding};

/// One finding per record whose upper-cased method is in the configured set
pub fn detect_suspicious_methods(
    records: &[AccessRecord],
    config: &HttpMethodConfig,
) -> Vec<SuspiciousMethodFinding> {
    records
        .iter()
        .filter_map(|r| {
            let method = r.method.to_uppercase();
            config
                .methods
                .iter()
                .any(|m| m.eq_ignore_ascii_case(&method))
                .then(|| SuspiciousMethodFinding {
                    ip: r.ip.clone(),
                    method,
                    path: r.path.clone(),
                })
        })
        .collect()
}
