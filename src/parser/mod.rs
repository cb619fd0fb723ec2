//! Line parsers for SSH auth logs and HTTP access logs
//!
//! Every parser takes one line and returns `None` when the line does not
//! match its grammar. Callers drop such lines and carry on.

pub mod access;
pub mod auth;
pub mod message;

pub use access::parse_access_line;
pub use auth::{parse_auth_line, parse_auth_line_with_year};
pub use message::parse_message_line;
