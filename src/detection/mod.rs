pub mod brute_force;
pub mod dos;
pub mod engine;
pub mod http_method;
pub mod intrusion;
pub mod port_scan;
pub mod user_enum;
pub mod web_attack;
pub mod window;

pub use brute_force::{detect_brute_force, detect_brute_force_in_folder};
pub use dos::detect_dos;
pub use engine::{DetectionEngine, DetectionInput, DetectorOutputs};
pub use http_method::detect_suspicious_methods;
pub use intrusion::detect_intrusions;
pub use port_scan::detect_port_scans;
pub use user_enum::detect_user_enumeration;
pub use web_attack::{classify, detect_web_attacks, detect_web_attacks_in_folder};
