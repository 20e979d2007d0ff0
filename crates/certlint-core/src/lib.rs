//! Lint registry and execution engine for X.509 certificates, CRLs and
//! OCSP responses.
//!
//! The crate never parses bytes: a decoder crate implements
//! [`ObjectModel`] for its structured types and registers lints against
//! them. See `certlint-x509` for the RustCrypto binding.

pub mod config;
pub mod engine;
pub mod error;
pub mod lint;
pub mod registry;
pub mod result;
pub mod status;
pub mod target;

// Convenience re-exports
pub use config::{ConfigStore, LintConfig, CONFIG_ENV_VAR};
pub use engine::{
    lint, lint_certificate, lint_ocsp_response, lint_revocation_list, lint_with_options,
    Evaluation, EvaluationWarning, ExecutionOptions,
};
pub use error::{ConfigError, EngineError, RegistryError};
pub use lint::{from_fn, FnLint, Lint, LintMetadata, LintMetadataBuilder, Outcome, Source, SourceList};
pub use registry::{FilterOptions, LintImpl, RegisteredLint, Registry, RegistryBuilder};
pub use result::{LintResult, ResultSet, ResultSummary, RESULT_SET_VERSION};
pub use status::{LatticeViolation, Status, UnknownStatus};
pub use target::{LintTarget, ObjectKind, ObjectModel, Target};
