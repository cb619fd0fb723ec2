//! Runs the detectors over one batch of records and merges their output.
//!
//! Detectors only run when the record category they need was supplied:
//! auth records feed brute force and intrusion, message records feed user
//! enumeration, access records feed the four web detectors.

use std::sync::Arc;
use tokio::task::{spawn_blocking, JoinHandle};

use super::{
    detect_brute_force, detect_dos, detect_intrusions, detect_port_scans, detect_suspicious_methods,
    detect_user_enumeration, detect_web_attacks,
};
use crate::config::DetectionConfig;
use crate::error::{Result, SentryError};
use crate::models::{
    AccessRecord, AuthRecord, BruteForceFinding, DosFinding, Finding, IntrusionFinding,
    MessageRecord, PortScanFinding, SuspiciousMethodFinding, UserEnumerationFinding,
    WebAttackFinding,
};

/// Record collections for one detection pass
#[derive(Debug, Clone, Default)]
pub struct DetectionInput {
    pub auth: Option<Vec<AuthRecord>>,
    pub access: Option<Vec<AccessRecord>>,
    pub messages: Option<Vec<MessageRecord>>,
}

impl DetectionInput {
    pub fn is_empty(&self) -> bool {
        self.auth.is_none() && self.access.is_none() && self.messages.is_none()
    }
}

/// Per-detector results; `None` means the detector did not run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectorOutputs {
    pub brute_force: Option<Vec<BruteForceFinding>>,
    pub intrusion: Option<Vec<IntrusionFinding>>,
    pub user_enumeration: Option<Vec<UserEnumerationFinding>>,
    pub port_scan: Option<Vec<PortScanFinding>>,
    pub dos: Option<Vec<DosFinding>>,
    pub suspicious_methods: Option<Vec<SuspiciousMethodFinding>>,
    pub web_attacks: Option<Vec<WebAttackFinding>>,
}

fn tagged<T>(items: Option<Vec<T>>, tag: fn(T) -> Finding) -> impl Iterator<Item = Finding> {
    items.into_iter().flatten().map(tag)
}

impl DetectorOutputs {
    /// Merge into one tagged sequence.
    ///
    /// Detector order is fixed and each detector's own ordering is kept.
    /// The same IP flagged by two detectors yields two findings.
    pub fn into_findings(self) -> Vec<Finding> {
        tagged(self.brute_force, Finding::BruteForce)
            .chain(tagged(self.intrusion, Finding::Intrusion))
            .chain(tagged(self.user_enumeration, Finding::UserEnumeration))
            .chain(tagged(self.port_scan, Finding::PortScan))
            .chain(tagged(self.dos, Finding::Dos))
            .chain(tagged(self.suspicious_methods, Finding::SuspiciousHttpMethod))
            .chain(tagged(self.web_attacks, Finding::WebAttack))
            .collect()
    }

    /// `(detector name, finding count)` for every detector that ran
    pub fn summary(&self) -> Vec<(&'static str, usize)> {
        let counts = [
            ("Brute Force", self.brute_force.as_ref().map(Vec::len)),
            ("Intrusion", self.intrusion.as_ref().map(Vec::len)),
            ("User Enumeration", self.user_enumeration.as_ref().map(Vec::len)),
            ("Port Scan", self.port_scan.as_ref().map(Vec::len)),
            ("Denial of Service", self.dos.as_ref().map(Vec::len)),
            ("Suspicious HTTP Method", self.suspicious_methods.as_ref().map(Vec::len)),
            ("Web Attack", self.web_attacks.as_ref().map(Vec::len)),
        ];
        counts
            .into_iter()
            .filter_map(|(name, count)| count.map(|c| (name, c)))
            .collect()
    }
}

/// Holds detector configuration and runs detection passes
#[derive(Debug, Clone, Default)]
pub struct DetectionEngine {
    config: DetectionConfig,
}

impl DetectionEngine {
    /// Create an engine, rejecting unusable thresholds
    pub fn new(config: DetectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(DetectionEngine { config })
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Run every applicable detector on the calling thread
    pub fn run(&self, input: &DetectionInput) -> Result<DetectorOutputs> {
        Self::check_input(input)?;
        let c = &self.config;

        let outputs = DetectorOutputs {
            brute_force: input.auth.as_deref().map(|r| detect_brute_force(r, &c.brute_force)),
            intrusion: input.auth.as_deref().map(|r| detect_intrusions(r, &c.intrusion)),
            user_enumeration: input
                .messages
                .as_deref()
                .map(|r| detect_user_enumeration(r, &c.user_enumeration)),
            port_scan: input.access.as_deref().map(|r| detect_port_scans(r, &c.port_scan)),
            dos: input.access.as_deref().map(|r| detect_dos(r, &c.dos)),
            suspicious_methods: input
                .access
                .as_deref()
                .map(|r| detect_suspicious_methods(r, &c.http_method)),
            web_attacks: input.access.as_deref().map(|r| detect_web_attacks(r, &c.web_attack)),
        };

        Self::log_outputs(&outputs);
        Ok(outputs)
    }

    /// Run the applicable detectors in parallel on the blocking pool.
    ///
    /// Produces the same result as [`DetectionEngine::run`].
    pub async fn run_concurrent(
        self: Arc<Self>,
        input: Arc<DetectionInput>,
    ) -> Result<DetectorOutputs> {
        Self::check_input(&input)?;

        let brute_force = self.spawn(&input, |e, i| {
            i.auth.as_deref().map(|r| detect_brute_force(r, &e.config.brute_force))
        });
        let intrusion = self.spawn(&input, |e, i| {
            i.auth.as_deref().map(|r| detect_intrusions(r, &e.config.intrusion))
        });
        let user_enumeration = self.spawn(&input, |e, i| {
            i.messages
                .as_deref()
                .map(|r| detect_user_enumeration(r, &e.config.user_enumeration))
        });
        let port_scan = self.spawn(&input, |e, i| {
            i.access.as_deref().map(|r| detect_port_scans(r, &e.config.port_scan))
        });
        let dos = self.spawn(&input, |e, i| {
            i.access.as_deref().map(|r| detect_dos(r, &e.config.dos))
        });
        let suspicious_methods = self.spawn(&input, |e, i| {
            i.access
                .as_deref()
                .map(|r| detect_suspicious_methods(r, &e.config.http_method))
        });
        let web_attacks = self.spawn(&input, |e, i| {
            i.access.as_deref().map(|r| detect_web_attacks(r, &e.config.web_attack))
        });

        let (bf, intr, ue, ps, dos, sm, wa) = tokio::join!(
            brute_force,
            intrusion,
            user_enumeration,
            port_scan,
            dos,
            suspicious_methods,
            web_attacks
        );

        let outputs = DetectorOutputs {
            brute_force: Self::joined(bf)?,
            intrusion: Self::joined(intr)?,
            user_enumeration: Self::joined(ue)?,
            port_scan: Self::joined(ps)?,
            dos: Self::joined(dos)?,
            suspicious_methods: Self::joined(sm)?,
            web_attacks: Self::joined(wa)?,
        };

        Self::log_outputs(&outputs);
        Ok(outputs)
    }

    fn spawn<T, F>(self: &Arc<Self>, input: &Arc<DetectionInput>, detector: F) -> JoinHandle<T>
    where
        T: Send + 'static,
        F: FnOnce(&DetectionEngine, &DetectionInput) -> T + Send + 'static,
    {
        let engine = Arc::clone(self);
        let input = Arc::clone(input);
        spawn_blocking(move || detector(&engine, &input))
    }

    fn joined<T>(result: std::result::Result<T, tokio::task::JoinError>) -> Result<T> {
        result.map_err(|e| SentryError::Task(e.to_string()))
    }

    fn check_input(input: &DetectionInput) -> Result<()> {
        if input.is_empty() {
            return Err(SentryError::Configuration(
                "no auth, access, or message records were supplied".to_string(),
            ));
        }
        Ok(())
    }

    fn log_outputs(outputs: &DetectorOutputs) {
        for (name, count) in outputs.summary() {
            log::debug!("{} detector reported {} finding(s)", name, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthStatus, WebAttackReason};
    use chrono::{DateTime, Duration, NaiveDate};

    fn failure(ip: &str, seconds: i64) -> AuthRecord {
        AuthRecord {
            timestamp: NaiveDate::from_ymd_opt(2025, 6, 30)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
                + Duration::seconds(seconds),
            host: "server".to_string(),
            status: AuthStatus::Failed,
            user: "root".to_string(),
            user_was_invalid: false,
            ip: ip.to_string(),
            port: 22,
            source_file: None,
        }
    }

    fn request(ip: &str, method: &str, path: &str) -> AccessRecord {
        AccessRecord {
            timestamp: DateTime::parse_from_rfc3339("2025-06-30T12:00:00+00:00").unwrap(),
            ip: ip.to_string(),
            method: method.to_string(),
            path: path.to_string(),
            status_code: 200,
            response_size: 1,
            agent: "Mozilla/5.0".to_string(),
            source_file: None,
        }
    }

    fn sample_input() -> DetectionInput {
        let mut access: Vec<_> = (0..100).map(|_| request("10.0.0.5", "GET", "/")).collect();
        access.push(request("10.0.0.9", "DELETE", "/admin"));

        DetectionInput {
            auth: Some((0..5).map(|i| failure("10.0.0.5", i * 10)).collect()),
            access: Some(access),
            messages: None,
        }
    }

    #[test]
    fn test_empty_input_is_configuration_error() {
        let engine = DetectionEngine::default();
        let result = engine.run(&DetectionInput::default());
        assert!(matches!(result, Err(SentryError::Configuration(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = DetectionConfig::default();
        config.dos.threshold = 0;
        assert!(DetectionEngine::new(config).is_err());
    }

    #[test]
    fn test_only_applicable_detectors_run() {
        let engine = DetectionEngine::default();
        let input = DetectionInput {
            auth: Some(vec![failure("1.1.1.1", 0)]),
            ..DetectionInput::default()
        };

        let outputs = engine.run(&input).unwrap();
        assert_eq!(outputs.brute_force, Some(vec![]));
        assert_eq!(outputs.intrusion, Some(vec![]));
        assert!(outputs.user_enumeration.is_none());
        assert!(outputs.port_scan.is_none());
        assert!(outputs.web_attacks.is_none());
        assert_eq!(outputs.summary().len(), 2);
    }

    #[test]
    fn test_aggregation_keeps_detector_order_without_dedup() {
        let engine = DetectionEngine::default();
        let findings = engine.run(&sample_input()).unwrap().into_findings();

        let kinds: Vec<&str> = findings.iter().map(|f| f.detector_name()).collect();
        assert_eq!(
            kinds,
            vec![
                "Brute Force",
                "Intrusion",
                "Denial of Service",
                "Suspicious HTTP Method",
                "Web Attack"
            ]
        );
        // 10.0.0.5 shows up once per detector that flagged it
        assert_eq!(findings.iter().filter(|f| f.ip() == "10.0.0.5").count(), 3);
        assert!(matches!(
            &findings[4],
            Finding::WebAttack(w) if w.reason == WebAttackReason::SensitivePathAccess
        ));
    }

    #[test]
    fn test_idempotent() {
        let engine = DetectionEngine::default();
        let input = sample_input();
        assert_eq!(engine.run(&input).unwrap(), engine.run(&input).unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential() {
        let engine = Arc::new(DetectionEngine::default());
        let input = Arc::new(sample_input());

        let sequential = engine.run(&input).unwrap();
        let concurrent = engine.clone().run_concurrent(input).await.unwrap();
        assert_eq!(sequential, concurrent);
    }

    #[test]
    fn test_concurrent_empty_input() {
        let engine = Arc::new(DetectionEngine::default());
        let result = tokio_test::block_on(engine.run_concurrent(Arc::new(DetectionInput::default())));
        assert!(matches!(result, Err(SentryError::Configuration(_))));
    }
}
