//! Parser for Apache/Nginx combined access log lines.
//!
//! Format: `IP - - [DD/Mon/YYYY:HH:MM:SS +ZZZZ] "METHOD /path HTTP/x.y" status size "referer" "user-agent"`

use crate::models::AccessRecord;
use chrono::DateTime;
use regex::Regex;
use std::sync::LazyLock;

static RE_COMBINED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?P<ip>\d+\.\d+\.\d+\.\d+)\s+-\s+-\s+\[(?P<timestamp>[^\]]+)\]\s+"(?P<method>\w+)\s+(?P<path>.+?)\s+HTTP/\d\.\d"\s+(?P<status>\d+)\s+(?P<size>\d+)\s+"[^"]*"\s+"(?P<agent>[^"]*)""#,
    )
    .expect("regex")
});

const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

pub fn parse_access_line(line: &str) -> Option<AccessRecord> {
    let caps = RE_COMBINED.captures(line.trim())?;

    let timestamp = DateTime::parse_from_str(caps.name("timestamp")?.as_str(), TIMESTAMP_FORMAT).ok()?;
    let status_code: u32 = caps.name("status")?.as_str().parse().ok()?;
    let response_size: u64 = caps.name("size")?.as_str().parse().ok()?;

    Some(AccessRecord {
        timestamp,
        ip: caps.name("ip")?.as_str().to_string(),
        method: caps.name("method")?.as_str().to_string(),
        path: caps.name("path")?.as_str().to_string(),
        status_code,
        response_size,
        agent: caps.name("agent")?.as_str().to_string(),
        source_file: None,
    })
}
