//! In-memory object model shared by the integration tests.

#![allow(dead_code)]

use certlint_core::{
    from_fn, LintConfig, LintMetadata, LintTarget, ObjectKind, ObjectModel, Outcome, Registry,
    RegistryBuilder, Source, Status,
};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default)]
pub struct FakeCert {
    pub subject: String,
    /// Optional field policed by `e_policy_oid_format`.
    pub policy_oid: Option<String>,
    pub validity_days: u32,
    pub not_before: Option<DateTime<Utc>>,
}

impl LintTarget for FakeCert {
    const KIND: ObjectKind = ObjectKind::Certificate;
    fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.not_before
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeCrl {
    pub entries: usize,
}

impl LintTarget for FakeCrl {
    const KIND: ObjectKind = ObjectKind::RevocationList;
    fn issued_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeOcsp;

impl LintTarget for FakeOcsp {
    const KIND: ObjectKind = ObjectKind::OcspResponse;
    fn issued_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

pub struct Fake;

impl ObjectModel for Fake {
    type Certificate = FakeCert;
    type RevocationList = FakeCrl;
    type OcspResponse = FakeOcsp;
}

pub fn metadata(name: &str, source: Source, severity: Status) -> LintMetadata {
    LintMetadata::builder(name)
        .description(format!("{} test lint", name))
        .citation("test citation")
        .source(source)
        .severity(severity)
        .build()
}

pub fn always_pass(_: &FakeCert, _: &LintConfig) -> anyhow::Result<Outcome> {
    Ok(Outcome::pass())
}

pub fn policy_oid_format(cert: &FakeCert, _: &LintConfig) -> anyhow::Result<Outcome> {
    let oid = cert.policy_oid.as_deref().unwrap_or_default();
    let well_formed = !oid.is_empty()
        && oid
            .split('.')
            .all(|arc| !arc.is_empty() && arc.bytes().all(|b| b.is_ascii_digit()));
    Ok(if well_formed {
        Outcome::pass()
    } else {
        Outcome::error(format!("policy OID '{}' is not dotted decimal", oid))
    })
}

pub fn crl_has_entries(crl: &FakeCrl, _: &LintConfig) -> anyhow::Result<Outcome> {
    Ok(if crl.entries > 0 {
        Outcome::pass()
    } else {
        Outcome::notice("CRL lists no revoked certificates")
    })
}

/// Three lints: one always passing, one gated on an optional field, one
/// for CRLs only.
pub fn scenario_builder() -> RegistryBuilder<Fake> {
    let mut builder = RegistryBuilder::<Fake>::new();
    builder
        .register_certificate_lint(
            metadata("n_always_pass", Source::Community, Status::Notice),
            from_fn(always_pass),
        )
        .unwrap()
        .register_certificate_lint(
            metadata("e_policy_oid_format", Source::Rfc5280, Status::Error),
            from_fn(policy_oid_format).applies_when(|c: &FakeCert| c.policy_oid.is_some()),
        )
        .unwrap()
        .register_revocation_list_lint(
            metadata("n_crl_has_entries", Source::Rfc5280, Status::Notice),
            from_fn(crl_has_entries),
        )
        .unwrap();
    builder
}

pub fn scenario_registry() -> Registry<Fake> {
    scenario_builder().build()
}
