//! `ObjectModel` binding for the RustCrypto X.509 types.
//!
//! The decoded values are wrapped in local newtypes so the engine traits can
//! be implemented for them; each wrapper derefs to the `x509-cert` /
//! `x509-ocsp` structure it holds.

use certlint_core::{LintTarget, ObjectKind, ObjectModel};
use chrono::{DateTime, Utc};
use std::ops::Deref;
use std::time::Duration;
use x509_cert::crl::CertificateList;
use x509_cert::time::Time;
use x509_cert::Certificate;
use x509_ocsp::BasicOcspResponse;

/// Certificates, CRLs and basic OCSP responses as decoded by `x509-cert`
/// and `x509-ocsp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct X509;

impl ObjectModel for X509 {
    type Certificate = ParsedCertificate;
    type RevocationList = ParsedCrl;
    type OcspResponse = ParsedOcspResponse;
}

macro_rules! wrapper {
    ($(#[$doc:meta])* $name:ident, $inner:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name(pub $inner);

        impl $name {
            pub fn into_inner(self) -> $inner {
                self.0
            }
        }

        impl Deref for $name {
            type Target = $inner;

            fn deref(&self) -> &$inner {
                &self.0
            }
        }

        impl From<$inner> for $name {
            fn from(inner: $inner) -> Self {
                Self(inner)
            }
        }
    };
}

wrapper!(
    /// A decoded X.509 certificate.
    ParsedCertificate,
    Certificate
);
wrapper!(
    /// A decoded certificate revocation list.
    ParsedCrl,
    CertificateList
);
wrapper!(
    /// The basic response carried inside a successful OCSP response.
    ParsedOcspResponse,
    BasicOcspResponse
);

impl LintTarget for ParsedCertificate {
    const KIND: ObjectKind = ObjectKind::Certificate;

    fn issued_at(&self) -> Option<DateTime<Utc>> {
        time_to_utc(&self.tbs_certificate.validity.not_before)
    }
}

impl LintTarget for ParsedCrl {
    const KIND: ObjectKind = ObjectKind::RevocationList;

    fn issued_at(&self) -> Option<DateTime<Utc>> {
        time_to_utc(&self.tbs_cert_list.this_update)
    }
}

impl LintTarget for ParsedOcspResponse {
    const KIND: ObjectKind = ObjectKind::OcspResponse;

    fn issued_at(&self) -> Option<DateTime<Utc>> {
        duration_to_utc(self.tbs_response_data.produced_at.0.to_unix_duration())
    }
}

pub fn time_to_utc(time: &Time) -> Option<DateTime<Utc>> {
    duration_to_utc(time.to_unix_duration())
}

fn duration_to_utc(since_epoch: Duration) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(since_epoch.as_secs()).ok()?;
    DateTime::from_timestamp(secs, since_epoch.subsec_nanos())
}
