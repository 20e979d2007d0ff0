//! Composable registry filters.
//!
//! Every criterion is optional and they are AND-ed together, so chaining
//! `filter(a)` and `filter(b)` selects exactly the lints both accept, in
//! either order.

use crate::error::RegistryError;
use crate::lint::{LintMetadata, Source, SourceList};
use crate::status::Status;
use crate::target::ObjectKind;
use regex::Regex;
use std::collections::BTreeSet;

/// Selection criteria for [`Registry::filter`](super::Registry::filter).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Keep only lints for these object kinds.
    pub kinds: Vec<ObjectKind>,
    /// Keep only lints from these sources.
    pub include_sources: SourceList,
    /// Drop lints from these sources.
    pub exclude_sources: SourceList,
    /// Keep only lints whose severity class is at least this.
    pub min_severity: Option<Status>,
    /// Keep only these lints. Unknown names are an error.
    pub include_names: Vec<String>,
    /// Drop these lints. Unknown names are an error.
    pub exclude_names: Vec<String>,
    /// Keep only lints whose name matches this regex.
    pub name_pattern: Option<String>,
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_kind(mut self, kind: ObjectKind) -> Self {
        self.kinds.push(kind);
        self
    }

    pub fn include_source(mut self, source: impl Into<Source>) -> Self {
        self.include_sources.0.push(source.into());
        self
    }

    pub fn exclude_source(mut self, source: impl Into<Source>) -> Self {
        self.exclude_sources.0.push(source.into());
        self
    }

    pub fn with_min_severity(mut self, severity: Status) -> Self {
        self.min_severity = Some(severity);
        self
    }

    pub fn include_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn exclude_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = Some(pattern.into());
        self
    }

    pub(crate) fn compile(&self) -> Result<CompiledFilter<'_>, RegistryError> {
        let name_pattern = match &self.name_pattern {
            Some(pattern) => Some(Regex::new(pattern).map_err(|source| {
                RegistryError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                }
            })?),
            None => None,
        };
        Ok(CompiledFilter {
            options: self,
            include_names: self.include_names.iter().map(String::as_str).collect(),
            exclude_names: self.exclude_names.iter().map(String::as_str).collect(),
            name_pattern,
        })
    }
}

pub(crate) struct CompiledFilter<'a> {
    options: &'a FilterOptions,
    include_names: BTreeSet<&'a str>,
    exclude_names: BTreeSet<&'a str>,
    name_pattern: Option<Regex>,
}

impl CompiledFilter<'_> {
    pub(crate) fn matches(&self, metadata: &LintMetadata) -> bool {
        let opts = self.options;
        if !opts.kinds.is_empty() && !metadata.kind.is_some_and(|k| opts.kinds.contains(&k)) {
            return false;
        }
        if !opts.include_sources.is_empty() && !opts.include_sources.contains(&metadata.source) {
            return false;
        }
        if opts.exclude_sources.contains(&metadata.source) {
            return false;
        }
        if opts.min_severity.is_some_and(|min| metadata.severity < min) {
            return false;
        }
        let name = metadata.name.as_str();
        if !self.include_names.is_empty() && !self.include_names.contains(name) {
            return false;
        }
        if self.exclude_names.contains(name) {
            return false;
        }
        if let Some(pattern) = &self.name_pattern {
            if !pattern.is_match(name) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn md(name: &str, source: Source, severity: Status, kind: ObjectKind) -> LintMetadata {
        LintMetadata::builder(name)
            .description("test")
            .citation("test")
            .source(source)
            .severity(severity)
            .kind(kind)
            .build()
    }

    #[test]
    fn test_empty_options_match_everything() {
        let opts = FilterOptions::new();
        assert!(opts.is_empty());
        let filter = opts.compile().unwrap();
        assert!(filter.matches(&md(
            "n_anything",
            Source::Apple,
            Status::Notice,
            ObjectKind::OcspResponse
        )));
    }

    #[test]
    fn test_source_include_and_exclude() {
        let opts = FilterOptions::new()
            .include_source(Source::EtsiEsi)
            .include_source(Source::Rfc5280)
            .exclude_source(Source::Rfc5280);
        let filter = opts.compile().unwrap();
        let cert = ObjectKind::Certificate;
        assert!(filter.matches(&md("e_etsi", Source::EtsiEsi, Status::Error, cert)));
        assert!(!filter.matches(&md("e_rfc", Source::Rfc5280, Status::Error, cert)));
        assert!(!filter.matches(&md("e_br", Source::CabfBaselineRequirements, Status::Error, cert)));
    }

    #[test]
    fn test_min_severity_excludes_notices() {
        let filter = FilterOptions::new().with_min_severity(Status::Warn);
        let filter = filter.compile().unwrap();
        let cert = ObjectKind::Certificate;
        assert!(!filter.matches(&md("n_info", Source::Community, Status::Notice, cert)));
        assert!(filter.matches(&md("w_warn", Source::Community, Status::Warn, cert)));
        assert!(filter.matches(&md("e_err", Source::Community, Status::Error, cert)));
    }

    #[test]
    fn test_kind_selection() {
        let opts = FilterOptions::new().with_kind(ObjectKind::RevocationList);
        let filter = opts.compile().unwrap();
        assert!(filter.matches(&md("e_crl", Source::Rfc5280, Status::Error, ObjectKind::RevocationList)));
        assert!(!filter.matches(&md("e_cert", Source::Rfc5280, Status::Error, ObjectKind::Certificate)));
    }

    #[test]
    fn test_name_lists_and_pattern() {
        let opts = FilterOptions::new()
            .include_names(["e_a", "e_b", "w_c"])
            .exclude_names(["e_b"])
            .with_name_pattern("^e_");
        let filter = opts.compile().unwrap();
        let mk = |name: &str| md(name, Source::Community, Status::Error, ObjectKind::Certificate);
        assert!(filter.matches(&mk("e_a")));
        assert!(!filter.matches(&mk("e_b")));
        assert!(!filter.matches(&mk("w_c")));
        assert!(!filter.matches(&mk("e_d")));
    }

    #[test]
    fn test_invalid_pattern() {
        let opts = FilterOptions::new().with_name_pattern("(unclosed");
        assert!(matches!(
            opts.compile(),
            Err(RegistryError::InvalidPattern { .. })
        ));
    }
}
