//! User enumeration detection
//!
//! Counts the distinct usernames each IP tried that sshd reported as
//! "invalid user". Works on loosely parsed `MessageRecord`s.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use super::window::group_by_ip;
use crate::config::UserEnumerationConfig;
use crate::models::{MessageRecord, UserEnumerationFinding};

static RE_INVALID_USER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"invalid user (\w+)").expect("regex"));

/// Report IPs that tried at least `threshold` distinct invalid usernames.
///
/// Messages are lower-cased before matching, so usernames are reported
/// lower-cased.
pub fn detect_user_enumeration(
    records: &[MessageRecord],
    config: &UserEnumerationConfig,
) -> Vec<UserEnumerationFinding> {
    let attempts = group_by_ip(records.iter().filter_map(|r| {
        let message = r.message.to_lowercase();
        let username = RE_INVALID_USER.captures(&message)?.get(1)?.as_str().to_string();
        Some((r.ip.as_str(), username))
    }));

    attempts
        .into_iter()
        .filter_map(|(ip, names)| {
            let usernames: BTreeSet<String> = names.into_iter().collect();
            (usernames.len() >= config.threshold).then(|| UserEnumerationFinding {
                ip: ip.to_string(),
                usernames,
            })
        })
        .collect()
}
