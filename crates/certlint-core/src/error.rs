use crate::target::ObjectKind;
use std::path::PathBuf;
use thiserror::Error;

/// Registry build and filter errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Lint '{name}' is already registered (existing kind: {existing}, new kind: {new})")]
    DuplicateName {
        name: String,
        existing: ObjectKind,
        new: ObjectKind,
    },

    #[error("Lint '{name}' is invalid: {reason}")]
    InvalidLint { name: String, reason: String },

    #[error("Lint '{name}' not found")]
    NotFound { name: String },

    #[error("Filter names unknown lints: {}", names.join(", "))]
    UnknownNames { names: Vec<String> },

    #[error("Invalid lint name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Configuration loading and lookup errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read lint configuration '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse lint configuration: {message}")]
    Parse { message: String },

    #[error("Lint configuration is malformed: {message}")]
    Shape { message: String },

    #[error("Configuration value '{key}' for lint '{lint}' is invalid: {message}")]
    Value {
        lint: String,
        key: String,
        message: String,
    },
}

/// Errors about an evaluation request itself.
///
/// Faults inside a single lint never surface here; they become a `Fatal`
/// entry in the result set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Unknown object kind '{kind}' (expected certificate, crl or ocsp)")]
    UnknownKind { kind: String },
}
