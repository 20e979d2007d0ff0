//! The status lattice every lint result is drawn from.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Outcome of running one lint against one object.
///
/// Ordered by severity: `NotApplicable < Pass < Notice < Warn < Error < Fatal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "NA")]
    NotApplicable,
    #[serde(rename = "pass")]
    Pass,
    #[serde(rename = "notice")]
    Notice,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "fatal")]
    Fatal,
}

impl Status {
    /// All six values in lattice order.
    pub const ALL: [Status; 6] = [
        Status::NotApplicable,
        Status::Pass,
        Status::Notice,
        Status::Warn,
        Status::Error,
        Status::Fatal,
    ];

    /// Wire code of this status (`0..=5`, lattice order).
    pub fn code(self) -> u8 {
        self as u8
    }

    /// True for the severities that raise a rollup flag and that a lint may
    /// declare as its severity class.
    pub fn is_reportable(self) -> bool {
        self >= Status::Notice
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::NotApplicable => "NA",
            Status::Pass => "pass",
            Status::Notice => "notice",
            Status::Warn => "warn",
            Status::Error => "error",
            Status::Fatal => "fatal",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status code outside the lattice.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("status code {code} is outside the lint status lattice")]
pub struct LatticeViolation {
    pub code: i64,
}

impl TryFrom<u8> for Status {
    type Error = LatticeViolation;

    fn try_from(code: u8) -> Result<Self, LatticeViolation> {
        Status::try_from(i64::from(code))
    }
}

impl TryFrom<i64> for Status {
    type Error = LatticeViolation;

    fn try_from(code: i64) -> Result<Self, LatticeViolation> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Status::ALL.get(idx).copied())
            .ok_or(LatticeViolation { code })
    }
}

/// Unrecognised status name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown lint status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "na" | "n/a" | "not_applicable" => Ok(Status::NotApplicable),
            "pass" => Ok(Status::Pass),
            "notice" | "info" => Ok(Status::Notice),
            "warn" | "warning" => Ok(Status::Warn),
            "error" => Ok(Status::Error),
            "fatal" => Ok(Status::Fatal),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}
