//! Tolerant extraction of `{ip, message}` pairs from auth log lines.
//!
//! Unlike the strict sshd grammar this accepts any line that mentions an
//! IPv4 address, e.g. `Invalid user oracle from 203.0.113.9 port 4242`.

use crate::models::MessageRecord;
use regex::Regex;
use std::sync::LazyLock;

static RE_IPV4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})\b").expect("regex")
});

/// Pair the first IPv4 address on the line with the line's text
pub fn parse_message_line(line: &str) -> Option<MessageRecord> {
    let line = line.trim();
    let ip = RE_IPV4.captures(line)?.get(1)?.as_str();
    Some(MessageRecord::new(ip, line))
}
