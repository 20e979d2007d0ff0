//! Certificate lints.

use crate::model::ParsedCertificate;
use certlint_core::{Lint, LintConfig, LintMetadata, Outcome, Source, Status};
use chrono::{TimeZone, Utc};
use der::asn1::ObjectIdentifier;
use der::Decode;
use serde::Deserialize;
use x509_cert::certificate::Version;
use x509_cert::ext::pkix::BasicConstraints;

const SECONDS_PER_DAY: u64 = 86_400;

const ID_CE_BASIC_CONSTRAINTS: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.19");

/// Whether basicConstraints is present with `cA` set. An undecodable
/// extension counts as not a CA.
fn is_ca(cert: &ParsedCertificate) -> bool {
    cert.tbs_certificate
        .extensions
        .iter()
        .flatten()
        .find(|ext| ext.extn_id == ID_CE_BASIC_CONSTRAINTS)
        .and_then(|ext| BasicConstraints::from_der(ext.extn_value.as_bytes()).ok())
        .is_some_and(|bc| bc.ca)
}

/// Extensions were introduced in v3; any other version carrying them is
/// malformed.
pub struct ExtensionsRequireV3;

impl ExtensionsRequireV3 {
    pub const NAME: &'static str = "e_cert_extensions_require_v3";

    pub fn metadata() -> LintMetadata {
        LintMetadata::builder(Self::NAME)
            .description("Certificates containing extensions must be version 3")
            .citation("RFC 5280: 4.1.2.1")
            .source(Source::Rfc5280)
            .severity(Status::Error)
            .build()
    }
}

impl Lint<ParsedCertificate> for ExtensionsRequireV3 {
    fn applies(&self, cert: &ParsedCertificate) -> bool {
        cert.tbs_certificate
            .extensions
            .as_ref()
            .is_some_and(|exts| !exts.is_empty())
    }

    fn check(&self, cert: &ParsedCertificate, _config: &LintConfig) -> anyhow::Result<Outcome> {
        Ok(match cert.tbs_certificate.version {
            Version::V3 => Outcome::pass(),
            other => Outcome::error(format!(
                "certificate has extensions but is {:?}",
                other
            )),
        })
    }
}

/// Serial numbers must be positive integers.
pub struct SerialNumberNotPositive;

impl SerialNumberNotPositive {
    pub const NAME: &'static str = "e_cert_serial_number_not_positive";

    pub fn metadata() -> LintMetadata {
        LintMetadata::builder(Self::NAME)
            .description("Certificate serial numbers must be positive integers")
            .citation("RFC 5280: 4.1.2.2")
            .source(Source::Rfc5280)
            .severity(Status::Error)
            .build()
    }
}

impl Lint<ParsedCertificate> for SerialNumberNotPositive {
    fn check(&self, cert: &ParsedCertificate, _config: &LintConfig) -> anyhow::Result<Outcome> {
        // Two's complement content octets.
        let bytes = cert.tbs_certificate.serial_number.as_bytes();
        Ok(match bytes.first() {
            None => Outcome::error("serial number is empty"),
            Some(first) if first & 0x80 != 0 => Outcome::error("serial number is negative"),
            Some(_) if bytes.iter().all(|b| *b == 0) => Outcome::error("serial number is zero"),
            Some(_) => Outcome::pass(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ValiditySettings {
    max_validity_days: u64,
}

impl Default for ValiditySettings {
    fn default() -> Self {
        Self {
            max_validity_days: ValidityPeriodTooLong::DEFAULT_MAX_DAYS,
        }
    }
}

/// Subscriber certificates issued after 2020-09-01 may not be valid for
/// more than 398 days. The limit is configurable through
/// `max_validity_days`. CA certificates are out of scope.
pub struct ValidityPeriodTooLong;

impl ValidityPeriodTooLong {
    pub const NAME: &'static str = "w_cert_validity_period_too_long";
    pub const DEFAULT_MAX_DAYS: u64 = 398;

    pub fn metadata() -> LintMetadata {
        let mut builder = LintMetadata::builder(Self::NAME)
            .description("Certificate validity period exceeds the configured maximum")
            .citation("CABF BR: 6.3.2")
            .source(Source::CabfBaselineRequirements)
            .severity(Status::Warn);
        if let Some(effective) = Utc.with_ymd_and_hms(2020, 9, 1, 0, 0, 0).single() {
            builder = builder.effective(effective);
        }
        builder.build()
    }
}

impl Lint<ParsedCertificate> for ValidityPeriodTooLong {
    fn applies(&self, cert: &ParsedCertificate) -> bool {
        !is_ca(cert)
    }

    fn check(&self, cert: &ParsedCertificate, config: &LintConfig) -> anyhow::Result<Outcome> {
        let settings: ValiditySettings = config.deserialize()?;
        let validity = &cert.tbs_certificate.validity;
        let not_before = validity.not_before.to_unix_duration().as_secs();
        let not_after = validity.not_after.to_unix_duration().as_secs();
        if not_after < not_before {
            return Ok(Outcome::error("notAfter precedes notBefore"));
        }

        // Both bounds are inclusive.
        let period = not_after - not_before + 1;
        let limit = settings.max_validity_days.saturating_mul(SECONDS_PER_DAY);
        Ok(if period > limit {
            Outcome::warn(format!(
                "validity period of {} days exceeds {} days",
                period / SECONDS_PER_DAY,
                settings.max_validity_days
            ))
        } else {
            Outcome::pass()
        })
    }
}
