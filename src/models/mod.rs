mod finding;
mod record;

pub use finding::{
    BruteForceFinding, DosFinding, Finding, IntrusionFinding, PortScanFinding,
    SuspiciousMethodFinding, UserEnumerationFinding, WebAttackFinding, WebAttackReason,
};
pub use record::{AccessRecord, AuthRecord, AuthStatus, MessageRecord};
