//! Parser for sshd password authentication lines.
//!
//! Example: `Jun 30 10:12:45 myserver sshd[12345]: Failed password for invalid user admin from 192.168.0.10 port 54321 ssh2`
//!
//! Syslog timestamps carry no year. The current calendar year is substituted
//! at parse time, so logs spanning a new year are mis-dated.

use crate::models::{AuthRecord, AuthStatus};
use chrono::{Datelike, Local, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

static RE_SSHD_PASSWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<month>\w+)\s+(?P<day>\d+)\s+(?P<time>\d+:\d+:\d+)\s+(?P<host>\S+)\s+sshd\[\d+\]:\s+(?P<status>\w+)\s+password for (?:(?P<validity>invalid user|user)\s+)?(?P<user>\S+)\s+from\s+(?P<ip>\d+\.\d+\.\d+\.\d+)\s+port\s+(?P<port>\d+)\s+ssh2",
    )
    .expect("regex")
});

/// Parse an sshd line, dating it in the current local year
pub fn parse_auth_line(line: &str) -> Option<AuthRecord> {
    parse_auth_line_with_year(line, Local::now().year())
}

/// Parse an sshd line, dating it in `year`
pub fn parse_auth_line_with_year(line: &str, year: i32) -> Option<AuthRecord> {
    let caps = RE_SSHD_PASSWORD.captures(line.trim())?;

    let status = AuthStatus::from_word(caps.name("status")?.as_str())?;
    let date_str = format!(
        "{} {} {} {}",
        year,
        caps.name("month")?.as_str(),
        caps.name("day")?.as_str(),
        caps.name("time")?.as_str()
    );
    let timestamp = NaiveDateTime::parse_from_str(&date_str, "%Y %b %d %H:%M:%S").ok()?;
    let port: u32 = caps.name("port")?.as_str().parse().ok()?;

    Some(AuthRecord {
        timestamp,
        host: caps.name("host")?.as_str().to_string(),
        status,
        user: caps.name("user")?.as_str().to_string(),
        user_was_invalid: caps
            .name("validity")
            .map_or(false, |v| v.as_str() == "invalid user"),
        ip: caps.name("ip")?.as_str().to_string(),
        port,
        source_file: None,
    })
}
