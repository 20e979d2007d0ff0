//! X.509 binding for `certlint-core`.
//!
//! Decodes certificates, CRLs and OCSP responses with the RustCrypto
//! `x509-cert` / `x509-ocsp` crates and ships a set of built-in lints.
//!
//! ```no_run
//! use certlint_x509::{builtin_registry, decode_certificate_pem};
//!
//! # fn main() -> anyhow::Result<()> {
//! let pem = std::fs::read_to_string("leaf.pem")?;
//! let cert = decode_certificate_pem(&pem)?;
//! let registry = builtin_registry()?;
//! let results = certlint_core::lint_certificate(&cert, &registry).results;
//! println!("{}", results.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```

pub mod decode;
pub mod lints;
pub mod model;

pub use decode::{
    decode_basic_ocsp_response, decode_certificate, decode_certificate_pem, decode_ocsp_response,
    decode_revocation_list, decode_revocation_list_pem, DecodeError,
};
pub use lints::{builtin_registry, builtin_registry_with, register_builtin};
pub use model::{ParsedCertificate, ParsedCrl, ParsedOcspResponse, X509};
