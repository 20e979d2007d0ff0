//! Per-object evaluation results.
//!
//! The serialized form is a durable contract: `version`, `timestamp`,
//! `lints` and the four `*_present` rollups must not be renamed or
//! reinterpreted. Bump [`RESULT_SET_VERSION`] on any incompatible change.

use crate::lint::LintMetadata;
use crate::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Schema version of serialized result sets.
pub const RESULT_SET_VERSION: i64 = 3;

/// Outcome of one lint on one object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintResult {
    #[serde(rename = "result")]
    pub status: Status,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    /// Metadata of the lint that produced this result. Not serialized;
    /// `None` only for results read back from a snapshot.
    #[serde(skip)]
    pub metadata: Option<Arc<LintMetadata>>,
}

impl LintResult {
    pub fn new(status: Status, details: Option<String>, metadata: Arc<LintMetadata>) -> Self {
        Self {
            status,
            details,
            metadata: Some(metadata),
        }
    }
}

impl PartialEq for LintResult {
    fn eq(&self, other: &Self) -> bool {
        self.status == other.status && self.details == other.details
    }
}

impl Eq for LintResult {}

/// Counts of results per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub total: usize,
    pub not_applicable: usize,
    pub pass: usize,
    pub notices: usize,
    pub warnings: usize,
    pub errors: usize,
    pub fatals: usize,
}

/// All lint results for one evaluated object. Read-only once returned;
/// deserializing recomputes the rollup flags from the entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawResultSet")]
pub struct ResultSet {
    version: i64,

    /// Evaluation time, unix seconds.
    pub(crate) timestamp: i64,

    #[serde(rename = "lints")]
    results: BTreeMap<String, LintResult>,

    notices_present: bool,
    warnings_present: bool,
    errors_present: bool,
    fatals_present: bool,
}

/// Serialized shape as read back. Stored flags are accepted and discarded.
#[derive(Deserialize)]
struct RawResultSet {
    version: i64,
    timestamp: i64,
    lints: BTreeMap<String, LintResult>,
}

impl From<RawResultSet> for ResultSet {
    fn from(raw: RawResultSet) -> Self {
        let mut set = ResultSet {
            version: raw.version,
            timestamp: raw.timestamp,
            results: BTreeMap::new(),
            notices_present: false,
            warnings_present: false,
            errors_present: false,
            fatals_present: false,
        };
        for (name, result) in raw.lints {
            set.record(name, result);
        }
        set
    }
}

impl ResultSet {
    pub(crate) fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            version: RESULT_SET_VERSION,
            timestamp: timestamp.timestamp(),
            results: BTreeMap::new(),
            notices_present: false,
            warnings_present: false,
            errors_present: false,
            fatals_present: false,
        }
    }

    /// Record one lint's result. Each name owns exactly one slot.
    pub(crate) fn record(&mut self, name: String, result: LintResult) {
        self.raise(result.status);
        let previous = self.results.insert(name, result);
        debug_assert!(previous.is_none(), "lint names are unique");
    }

    fn raise(&mut self, status: Status) {
        match status {
            Status::Notice => self.notices_present = true,
            Status::Warn => self.warnings_present = true,
            Status::Error => self.errors_present = true,
            Status::Fatal => self.fatals_present = true,
            Status::NotApplicable | Status::Pass => {}
        }
    }

    pub fn get(&self, name: &str) -> Option<&LintResult> {
        self.results.get(name)
    }

    pub fn status_of(&self, name: &str) -> Option<Status> {
        self.results.get(name).map(|r| r.status)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Results in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LintResult)> {
        self.results.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names_with(&self, status: Status) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .filter(move |(_, r)| r.status == status)
            .map(|(k, _)| k.as_str())
    }

    pub fn notices_present(&self) -> bool {
        self.notices_present
    }

    pub fn warnings_present(&self) -> bool {
        self.warnings_present
    }

    pub fn errors_present(&self) -> bool {
        self.errors_present
    }

    pub fn fatals_present(&self) -> bool {
        self.fatals_present
    }

    /// Whether any result is at least `threshold`. Answered from the rollup
    /// flags for the reportable severities.
    pub fn has_at_least(&self, threshold: Status) -> bool {
        match threshold {
            Status::Fatal => self.fatals_present,
            Status::Error => self.fatals_present || self.errors_present,
            Status::Warn => self.fatals_present || self.errors_present || self.warnings_present,
            Status::Notice => {
                self.fatals_present
                    || self.errors_present
                    || self.warnings_present
                    || self.notices_present
            }
            Status::Pass | Status::NotApplicable => {
                self.results.values().any(|r| r.status >= threshold)
            }
        }
    }

    /// Highest status recorded, `None` for an empty set.
    pub fn max_status(&self) -> Option<Status> {
        self.results.values().map(|r| r.status).max()
    }

    pub fn summary(&self) -> ResultSummary {
        let mut summary = ResultSummary {
            total: self.results.len(),
            ..ResultSummary::default()
        };
        for result in self.results.values() {
            match result.status {
                Status::NotApplicable => summary.not_applicable += 1,
                Status::Pass => summary.pass += 1,
                Status::Notice => summary.notices += 1,
                Status::Warn => summary.warnings += 1,
                Status::Error => summary.errors += 1,
                Status::Fatal => summary.fatals += 1,
            }
        }
        summary
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    /// Evaluation time, unix seconds.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn evaluated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Read a snapshot back. Rollup flags are recomputed from the entries
    /// rather than trusted.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Stable fingerprint of the content, ignoring the timestamp:
    /// `sha256:<hex>` over the serialized set with `timestamp` zeroed.
    pub fn content_digest(&self) -> String {
        let canonical = ResultSet {
            timestamp: 0,
            ..self.clone()
        };
        // Map keys are sorted and every field is plain data, so encoding
        // cannot fail.
        let bytes = serde_json::to_vec(&canonical).unwrap_or_default();
        format!("sha256:{}", hex::encode(Sha256::digest(&bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::Source;
    use chrono::TimeZone;

    fn md(name: &str) -> Arc<LintMetadata> {
        Arc::new(
            LintMetadata::builder(name)
                .description("test")
                .citation("test")
                .source(Source::Community)
                .build(),
        )
    }

    fn at() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn sample() -> ResultSet {
        let mut set = ResultSet::new(at());
        set.record("e_b".into(), LintResult::new(Status::Error, Some("bad".into()), md("e_b")));
        set.record("n_a".into(), LintResult::new(Status::Notice, None, md("n_a")));
        set.record("e_c".into(), LintResult::new(Status::Pass, None, md("e_c")));
        set
    }

    #[test]
    fn test_rollups_follow_entries() {
        let set = sample();
        assert!(set.notices_present());
        assert!(!set.warnings_present());
        assert!(set.errors_present());
        assert!(!set.fatals_present());
        assert!(set.has_at_least(Status::Error));
        assert!(set.has_at_least(Status::Warn));
        assert!(!set.has_at_least(Status::Fatal));
        assert_eq!(set.max_status(), Some(Status::Error));
    }

    #[test]
    fn test_summary_counts() {
        let summary = sample().summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.notices, 1);
        assert_eq!(summary.pass, 1);
        assert_eq!(summary.fatals, 0);
    }

    #[test]
    fn test_serialized_shape() {
        let value: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        assert_eq!(value["version"], RESULT_SET_VERSION);
        assert_eq!(value["timestamp"], 1_700_000_000i64);
        assert_eq!(value["lints"]["e_b"]["result"], "error");
        assert_eq!(value["lints"]["e_b"]["details"], "bad");
        assert!(value["lints"]["n_a"].get("details").is_none());
        assert_eq!(value["notices_present"], true);
        assert_eq!(value["warnings_present"], false);
        assert_eq!(value["errors_present"], true);
        assert_eq!(value["fatals_present"], false);
    }

    #[test]
    fn test_snapshot_round_trip_recomputes_flags() {
        let original = sample();
        let mut tampered: serde_json::Value =
            serde_json::from_str(&original.to_json().unwrap()).unwrap();
        tampered["fatals_present"] = serde_json::Value::Bool(true);

        let restored = ResultSet::from_json(&tampered.to_string()).unwrap();
        assert_eq!(restored, original);
        assert!(!restored.fatals_present());
        assert!(restored.get("e_b").unwrap().metadata.is_none());
    }

    #[test]
    fn test_serde_deserialize_recomputes_flags() {
        let json = r#"{
            "version": 3,
            "timestamp": 0,
            "lints": {"e_a": {"result": "pass"}, "w_b": {"result": "warn"}},
            "notices_present": true,
            "warnings_present": false,
            "errors_present": false,
            "fatals_present": true
        }"#;
        let set: ResultSet = serde_json::from_str(json).unwrap();
        assert!(!set.fatals_present());
        assert!(!set.notices_present());
        assert!(set.warnings_present());
        assert_eq!(set.version(), 3);
        assert_eq!(set.timestamp(), 0);

        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        let from_value: ResultSet = serde_json::from_value(value).unwrap();
        assert_eq!(from_value, set);
    }

    #[test]
    fn test_digest_ignores_timestamp() {
        let a = sample();
        let mut b = sample();
        b.timestamp += 3600;
        assert_eq!(a.content_digest(), b.content_digest());
        assert!(a.content_digest().starts_with("sha256:"));

        let mut c = sample();
        c.record("w_d".into(), LintResult::new(Status::Warn, None, md("w_d")));
        assert_ne!(a.content_digest(), c.content_digest());
    }

    #[test]
    fn test_names_with_status() {
        let set = sample();
        assert_eq!(set.names_with(Status::Error).collect::<Vec<_>>(), vec!["e_b"]);
        assert_eq!(set.names_with(Status::Fatal).count(), 0);
    }
}
