//! The lint contract.
//!
//! A lint is a cheap applicability gate plus a check. The gate runs for
//! every object of the lint's kind and should only look at what it needs to
//! rule the object out (e.g. "is this a CA certificate"). The check may do
//! full field decoding and may still conclude `NotApplicable` when the
//! condition it polices does not occur.

pub mod metadata;

pub use metadata::{LintMetadata, LintMetadataBuilder, Source, SourceList};

use crate::config::LintConfig;
use crate::status::{LatticeViolation, Status};
use std::marker::PhantomData;

/// A compliance check over one decoded object type.
///
/// Implementations hold no mutable state: the same instance is invoked
/// concurrently on different objects.
pub trait Lint<T: ?Sized>: Send + Sync {
    /// Coarse gate evaluated before every `check`. Must not panic.
    fn applies(&self, _target: &T) -> bool {
        true
    }

    /// Run the check. `Err` is treated as a fault of this lint and recorded
    /// as `Fatal`.
    fn check(&self, target: &T, config: &LintConfig) -> anyhow::Result<Outcome>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reported {
    Status(Status),
    Code(i64),
}

/// What a lint's check reports: a status plus optional detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    reported: Reported,
    details: Option<String>,
}

impl Outcome {
    pub fn new(status: Status, details: Option<String>) -> Self {
        Self {
            reported: Reported::Status(status),
            details,
        }
    }

    /// Report a status by wire code, for lints whose verdict comes from a
    /// numeric table. Codes outside `0..=5` fail closed in the engine.
    pub fn from_code(code: i64, details: Option<String>) -> Self {
        Self {
            reported: Reported::Code(code),
            details,
        }
    }

    pub fn pass() -> Self {
        Self::new(Status::Pass, None)
    }

    pub fn not_applicable() -> Self {
        Self::new(Status::NotApplicable, None)
    }

    pub fn notice(details: impl Into<String>) -> Self {
        Self::new(Status::Notice, Some(details.into()))
    }

    pub fn warn(details: impl Into<String>) -> Self {
        Self::new(Status::Warn, Some(details.into()))
    }

    pub fn error(details: impl Into<String>) -> Self {
        Self::new(Status::Error, Some(details.into()))
    }

    pub fn fatal(details: impl Into<String>) -> Self {
        Self::new(Status::Fatal, Some(details.into()))
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Map onto the lattice.
    pub fn resolve(self) -> Result<(Status, Option<String>), LatticeViolation> {
        let status = match self.reported {
            Reported::Status(status) => status,
            Reported::Code(code) => Status::try_from(code)?,
        };
        Ok((status, self.details))
    }
}

fn always<T: ?Sized>(_: &T) -> bool {
    true
}

/// A lint assembled from closures.
pub struct FnLint<T: ?Sized, A, C> {
    applies: A,
    check: C,
    _target: PhantomData<fn(&T)>,
}

/// Build a lint from a check closure; the gate accepts every object until
/// [`FnLint::applies_when`] narrows it.
pub fn from_fn<T, C>(check: C) -> FnLint<T, fn(&T) -> bool, C>
where
    T: ?Sized,
    C: Fn(&T, &LintConfig) -> anyhow::Result<Outcome> + Send + Sync,
{
    FnLint {
        applies: always::<T> as fn(&T) -> bool,
        check,
        _target: PhantomData,
    }
}

impl<T: ?Sized, A, C> FnLint<T, A, C> {
    pub fn applies_when<P>(self, applies: P) -> FnLint<T, P, C>
    where
        P: Fn(&T) -> bool + Send + Sync,
    {
        FnLint {
            applies,
            check: self.check,
            _target: PhantomData,
        }
    }
}

impl<T, A, C> Lint<T> for FnLint<T, A, C>
where
    T: ?Sized,
    A: Fn(&T) -> bool + Send + Sync,
    C: Fn(&T, &LintConfig) -> anyhow::Result<Outcome> + Send + Sync,
{
    fn applies(&self, target: &T) -> bool {
        (self.applies)(target)
    }

    fn check(&self, target: &T, config: &LintConfig) -> anyhow::Result<Outcome> {
        (self.check)(target, config)
    }
}
