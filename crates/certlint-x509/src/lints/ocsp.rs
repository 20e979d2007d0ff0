//! OCSP response lints.

use crate::model::ParsedOcspResponse;
use certlint_core::{Lint, LintConfig, LintMetadata, Outcome, Source, Status};

/// A basic response answers at least one certificate status request.
pub struct WithoutSingleResponses;

impl WithoutSingleResponses {
    pub const NAME: &'static str = "e_ocsp_response_without_single_responses";

    pub fn metadata() -> LintMetadata {
        LintMetadata::builder(Self::NAME)
            .description("Basic OCSP responses must contain at least one SingleResponse")
            .citation("RFC 6960: 4.2.1")
            .source(Source::Rfc6960)
            .severity(Status::Error)
            .build()
    }
}

impl Lint<ParsedOcspResponse> for WithoutSingleResponses {
    fn check(&self, response: &ParsedOcspResponse, _config: &LintConfig) -> anyhow::Result<Outcome> {
        Ok(if response.tbs_response_data.responses.is_empty() {
            Outcome::error("response lists no certificate statuses")
        } else {
            Outcome::pass()
        })
    }
}
