//! Revocation list lints.

use crate::model::ParsedCrl;
use certlint_core::{Lint, LintConfig, LintMetadata, Outcome, Source, Status};

/// Conforming CRL issuers must include nextUpdate.
pub struct NextUpdateMissing;

impl NextUpdateMissing {
    pub const NAME: &'static str = "e_crl_next_update_missing";

    pub fn metadata() -> LintMetadata {
        LintMetadata::builder(Self::NAME)
            .description("CRLs must include the nextUpdate field")
            .citation("RFC 5280: 5.1.2.5")
            .source(Source::Rfc5280)
            .severity(Status::Error)
            .build()
    }
}

impl Lint<ParsedCrl> for NextUpdateMissing {
    fn check(&self, crl: &ParsedCrl, _config: &LintConfig) -> anyhow::Result<Outcome> {
        Ok(if crl.tbs_cert_list.next_update.is_some() {
            Outcome::pass()
        } else {
            Outcome::error("CRL has no nextUpdate")
        })
    }
}

/// nextUpdate must be later than thisUpdate.
pub struct NextUpdateBeforeThisUpdate;

impl NextUpdateBeforeThisUpdate {
    pub const NAME: &'static str = "e_crl_next_update_before_this_update";

    pub fn metadata() -> LintMetadata {
        LintMetadata::builder(Self::NAME)
            .description("CRL nextUpdate must be later than thisUpdate")
            .citation("RFC 5280: 5.1.2.5")
            .source(Source::Rfc5280)
            .severity(Status::Error)
            .build()
    }
}

impl Lint<ParsedCrl> for NextUpdateBeforeThisUpdate {
    fn applies(&self, crl: &ParsedCrl) -> bool {
        crl.tbs_cert_list.next_update.is_some()
    }

    fn check(&self, crl: &ParsedCrl, _config: &LintConfig) -> anyhow::Result<Outcome> {
        let tbs = &crl.tbs_cert_list;
        let Some(next_update) = tbs.next_update else {
            return Ok(Outcome::not_applicable());
        };
        let this_update = tbs.this_update.to_unix_duration();
        Ok(if next_update.to_unix_duration() <= this_update {
            Outcome::error(format!(
                "nextUpdate {} is not later than thisUpdate {}",
                next_update.to_date_time(),
                tbs.this_update.to_date_time()
            ))
        } else {
            Outcome::pass()
        })
    }
}
