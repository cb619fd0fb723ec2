pub mod config;
pub mod detection;
pub mod error;
pub mod input;
pub mod models;
pub mod output;
pub mod parser;

// Re-export commonly used types
pub use config::{Config, DetectionConfig};
pub use detection::{DetectionEngine, DetectionInput, DetectorOutputs};
pub use error::{Result, SentryError};
pub use models::{AccessRecord, AuthRecord, AuthStatus, Finding, MessageRecord, WebAttackReason};
pub use parser::{parse_access_line, parse_auth_line, parse_message_line};
