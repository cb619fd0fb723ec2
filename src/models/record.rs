use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Outcome of an SSH password authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthStatus {
    Failed,
    Accepted,
}

impl AuthStatus {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "Failed" => Some(AuthStatus::Failed),
            "Accepted" => Some(AuthStatus::Accepted),
            _ => None,
        }
    }
}

/// A single sshd password authentication line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthRecord {
    /// Local time of the event. The year is not in the source line and is
    /// filled in at parse time.
    pub timestamp: NaiveDateTime,
    pub host: String,
    pub status: AuthStatus,
    pub user: String,
    /// True when sshd logged the user as "invalid user"
    pub user_was_invalid: bool,
    /// Dotted-quad source address, not range checked
    pub ip: String,
    pub port: u32,
    pub source_file: Option<String>,
}

impl AuthRecord {
    pub fn is_failure(&self) -> bool {
        self.status == AuthStatus::Failed
    }
}

/// A single combined-format HTTP access line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub timestamp: DateTime<FixedOffset>,
    pub ip: String,
    pub method: String,
    /// Raw request target, not percent-decoded
    pub path: String,
    pub status_code: u32,
    pub response_size: u64,
    /// User agent, possibly empty
    pub agent: String,
    pub source_file: Option<String>,
}

/// Loosely structured auth line: a source address and the free text around it.
///
/// Used where the strict sshd grammar would reject useful lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub ip: String,
    pub message: String,
}

impl MessageRecord {
    pub fn new(ip: impl Into<String>, message: impl Into<String>) -> Self {
        MessageRecord {
            ip: ip.into(),
            message: message.into(),
        }
    }
}
