//! Lint metadata: identity, citations, source tag, severity class and the
//! effective date window.

use crate::status::Status;
use crate::target::ObjectKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Standards body or profile a lint's requirement originates from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Source {
    Rfc5280,
    Rfc5480,
    Rfc5891,
    Rfc6960,
    Rfc8813,
    CabfBaselineRequirements,
    CabfEvGuidelines,
    CabfSmimeBaselineRequirements,
    EtsiEsi,
    Mozilla,
    Apple,
    Community,
    AwsLabs,
    /// A profile without a dedicated tag. Kept verbatim.
    Other(String),
}

impl Source {
    pub fn as_str(&self) -> &str {
        match self {
            Source::Rfc5280 => "RFC5280",
            Source::Rfc5480 => "RFC5480",
            Source::Rfc5891 => "RFC5891",
            Source::Rfc6960 => "RFC6960",
            Source::Rfc8813 => "RFC8813",
            Source::CabfBaselineRequirements => "CABF_BR",
            Source::CabfEvGuidelines => "CABF_EV",
            Source::CabfSmimeBaselineRequirements => "CABF_SMIME_BR",
            Source::EtsiEsi => "ETSI_ESI",
            Source::Mozilla => "Mozilla",
            Source::Apple => "Apple",
            Source::Community => "Community",
            Source::AwsLabs => "AWSLabs",
            Source::Other(tag) => tag,
        }
    }
}

impl From<String> for Source {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "RFC5280" => Source::Rfc5280,
            "RFC5480" => Source::Rfc5480,
            "RFC5891" => Source::Rfc5891,
            "RFC6960" => Source::Rfc6960,
            "RFC8813" => Source::Rfc8813,
            "CABF_BR" => Source::CabfBaselineRequirements,
            "CABF_EV" => Source::CabfEvGuidelines,
            "CABF_SMIME_BR" => Source::CabfSmimeBaselineRequirements,
            "ETSI_ESI" => Source::EtsiEsi,
            "Mozilla" => Source::Mozilla,
            "Apple" => Source::Apple,
            "Community" => Source::Community,
            "AWSLabs" => Source::AwsLabs,
            _ => Source::Other(tag),
        }
    }
}

impl From<&str> for Source {
    fn from(tag: &str) -> Self {
        Source::from(tag.to_string())
    }
}

impl From<Source> for String {
    fn from(source: Source) -> Self {
        source.as_str().to_string()
    }
}

impl FromStr for Source {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Source::from(s.trim()))
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comma-separated list of source tags, e.g. `"RFC5280,CABF_BR"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceList(pub Vec<Source>);

impl FromStr for SourceList {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SourceList(
            s.split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(Source::from)
                .collect(),
        ))
    }
}

impl SourceList {
    pub fn contains(&self, source: &Source) -> bool {
        self.0.contains(source)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Immutable description of a lint, attached at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintMetadata {
    /// Unique lint name (primary key).
    pub name: String,

    /// One-line description of the requirement.
    pub description: String,

    /// References to the source documents (opaque).
    pub citations: Vec<String>,

    /// Standards body or profile the requirement comes from.
    pub source: Source,

    /// Declared severity class (`Notice` through `Fatal`).
    pub severity: Status,

    /// Objects issued before this instant are out of scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective: Option<DateTime<Utc>>,

    /// Objects issued at or after this instant are out of scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ineffective: Option<DateTime<Utc>>,

    /// Object kind; filled in by the typed registration call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ObjectKind>,
}

impl LintMetadata {
    pub fn builder(name: impl Into<String>) -> LintMetadataBuilder {
        LintMetadataBuilder::new(name)
    }

    /// Whether an object issued at `issued_at` falls inside the effective
    /// window. Objects without an issuance instant are always inside.
    pub fn is_effective_at(&self, issued_at: Option<DateTime<Utc>>) -> bool {
        let Some(at) = issued_at else {
            return true;
        };
        if self.effective.is_some_and(|from| at < from) {
            return false;
        }
        if self.ineffective.is_some_and(|until| at >= until) {
            return false;
        }
        true
    }

    /// Check the metadata is complete and well-formed.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("missing name".into());
        }
        if !is_valid_lint_name(&self.name) {
            return Err(
                "name must be lowercase alphanumeric with '_' or '-' separators".into(),
            );
        }
        if self.description.trim().is_empty() {
            return Err("missing description".into());
        }
        if self.citations.iter().all(|c| c.trim().is_empty()) {
            return Err("missing citation".into());
        }
        if !self.severity.is_reportable() {
            return Err(format!(
                "severity class must be notice, warn, error or fatal (got {})",
                self.severity
            ));
        }
        if let (Some(from), Some(until)) = (self.effective, self.ineffective) {
            if until <= from {
                return Err("ineffective date must be after effective date".into());
            }
        }
        Ok(())
    }
}

/// Lowercase alphanumeric with `_`/`-` separators, no leading/trailing separator.
fn is_valid_lint_name(name: &str) -> bool {
    let is_sep = |c: char| c == '_' || c == '-';
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || is_sep(c))
        && !name.starts_with(is_sep)
        && !name.ends_with(is_sep)
}

/// Chained construction of [`LintMetadata`]. Validation happens at
/// registration.
#[derive(Debug, Clone)]
pub struct LintMetadataBuilder {
    metadata: LintMetadata,
}

impl LintMetadataBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: LintMetadata {
                name: name.into(),
                description: String::new(),
                citations: Vec::new(),
                source: Source::Community,
                severity: Status::Error,
                effective: None,
                ineffective: None,
                kind: None,
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = description.into();
        self
    }

    pub fn citation(mut self, citation: impl Into<String>) -> Self {
        self.metadata.citations.push(citation.into());
        self
    }

    pub fn source(mut self, source: impl Into<Source>) -> Self {
        self.metadata.source = source.into();
        self
    }

    pub fn severity(mut self, severity: Status) -> Self {
        self.metadata.severity = severity;
        self
    }

    pub fn effective(mut self, from: DateTime<Utc>) -> Self {
        self.metadata.effective = Some(from);
        self
    }

    pub fn ineffective(mut self, until: DateTime<Utc>) -> Self {
        self.metadata.ineffective = Some(until);
        self
    }

    pub fn kind(mut self, kind: ObjectKind) -> Self {
        self.metadata.kind = Some(kind);
        self
    }

    pub fn build(self) -> LintMetadata {
        self.metadata
    }
}

impl From<LintMetadataBuilder> for LintMetadata {
    fn from(builder: LintMetadataBuilder) -> Self {
        builder.build()
    }
}
