//! Execution engine.
//!
//! Runs every applicable lint of a registry against one object and
//! collects the verdicts into a [`ResultSet`]. A lint that panics, returns
//! an error or reports a status outside the lattice is recorded as `Fatal`
//! and never disturbs the other lints.

use crate::config::ConfigStore;
use crate::lint::{Lint, LintMetadata};
use crate::registry::{RegisteredLint, Registry};
use crate::result::{LintResult, ResultSet};
use crate::status::Status;
use crate::target::{LintTarget, ObjectKind, ObjectModel, Target};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Knobs for one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Run lints on the rayon pool. Output is identical either way.
    pub parallel: bool,
    /// Evaluation time recorded in the result set. Defaults to now.
    pub timestamp: Option<DateTime<Utc>>,
}

impl ExecutionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Something about the evaluation the caller should know, short of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationWarning {
    /// No lint in the registry targets this kind of object, so the result
    /// set is empty.
    EmptyRuleSet { kind: ObjectKind },
}

impl std::fmt::Display for EvaluationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationWarning::EmptyRuleSet { kind } => {
                write!(f, "no lints selected for {} objects", kind)
            }
        }
    }
}

/// Results for one object plus any evaluation warnings.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub results: ResultSet,
    pub warnings: Vec<EvaluationWarning>,
}

impl Evaluation {
    pub fn into_results(self) -> ResultSet {
        self.results
    }
}

pub fn lint_certificate<M: ObjectModel>(
    certificate: &M::Certificate,
    registry: &Registry<M>,
) -> Evaluation {
    lint_with_options(
        Target::Certificate(certificate),
        registry,
        &ExecutionOptions::default(),
    )
}

pub fn lint_revocation_list<M: ObjectModel>(
    crl: &M::RevocationList,
    registry: &Registry<M>,
) -> Evaluation {
    lint_with_options(
        Target::RevocationList(crl),
        registry,
        &ExecutionOptions::default(),
    )
}

pub fn lint_ocsp_response<M: ObjectModel>(
    response: &M::OcspResponse,
    registry: &Registry<M>,
) -> Evaluation {
    lint_with_options(
        Target::OcspResponse(response),
        registry,
        &ExecutionOptions::default(),
    )
}

/// Lint an object of any kind with default options.
pub fn lint<M: ObjectModel>(target: Target<'_, M>, registry: &Registry<M>) -> Evaluation {
    lint_with_options(target, registry, &ExecutionOptions::default())
}

pub fn lint_with_options<M: ObjectModel>(
    target: Target<'_, M>,
    registry: &Registry<M>,
    options: &ExecutionOptions,
) -> Evaluation {
    match target {
        Target::Certificate(object) => {
            run(object, registry, options, RegisteredLint::as_certificate_lint)
        }
        Target::RevocationList(object) => {
            run(object, registry, options, RegisteredLint::as_revocation_list_lint)
        }
        Target::OcspResponse(object) => {
            run(object, registry, options, RegisteredLint::as_ocsp_response_lint)
        }
    }
}

type Select<M, T> = for<'r> fn(&'r RegisteredLint<M>) -> Option<&'r Arc<dyn Lint<T>>>;

fn run<M, T>(
    target: &T,
    registry: &Registry<M>,
    options: &ExecutionOptions,
    select: Select<M, T>,
) -> Evaluation
where
    M: ObjectModel,
    T: LintTarget,
{
    let kind = T::KIND;
    let selected: Vec<(&Arc<LintMetadata>, &Arc<dyn Lint<T>>)> = registry
        .lints_for(kind)
        .filter_map(|registered| select(registered).map(|lint| (registered.metadata(), lint)))
        .collect();

    let span = tracing::debug_span!("lint_object", kind = %kind, lints = selected.len());
    let _guard = span.enter();

    let mut results = ResultSet::new(options.timestamp.unwrap_or_else(Utc::now));
    let mut warnings = Vec::new();
    if selected.is_empty() {
        tracing::warn!(kind = %kind, "No lints selected for object kind");
        warnings.push(EvaluationWarning::EmptyRuleSet { kind });
    }

    let config = registry.configuration();
    let issued_at = target.issued_at();
    let evaluate = |(metadata, lint): &(&Arc<LintMetadata>, &Arc<dyn Lint<T>>)| {
        evaluate_one(lint, metadata, target, config, issued_at)
    };

    let outcomes: Vec<LintResult> = if options.parallel {
        selected.par_iter().map(evaluate).collect()
    } else {
        selected.iter().map(evaluate).collect()
    };

    for ((metadata, _), result) in selected.iter().zip(outcomes) {
        tracing::debug!(lint = %metadata.name, status = %result.status, "Recorded lint result");
        results.record(metadata.name.clone(), result);
    }

    Evaluation { results, warnings }
}

fn evaluate_one<T: LintTarget>(
    lint: &Arc<dyn Lint<T>>,
    metadata: &Arc<LintMetadata>,
    target: &T,
    config: &ConfigStore,
    issued_at: Option<DateTime<Utc>>,
) -> LintResult {
    if !metadata.is_effective_at(issued_at) {
        return LintResult::new(Status::NotApplicable, None, Arc::clone(metadata));
    }

    match catch_unwind(AssertUnwindSafe(|| lint.applies(target))) {
        Ok(true) => {}
        Ok(false) => return LintResult::new(Status::NotApplicable, None, Arc::clone(metadata)),
        Err(payload) => {
            return fault(
                metadata,
                format!("applicability check panicked: {}", panic_message(payload.as_ref())),
            )
        }
    }

    let lint_config = config.resolve_for(metadata);
    // Formatting and dropping the lint's error run lint code too, so only
    // plain data leaves the unwind boundary.
    let checked = catch_unwind(AssertUnwindSafe(|| match lint.check(target, &lint_config) {
        Ok(outcome) => outcome.resolve().map_err(|violation| violation.to_string()),
        Err(err) => Err(format!("{:#}", err)),
    }));
    match checked {
        Ok(Ok((status, details))) => LintResult::new(status, details, Arc::clone(metadata)),
        Ok(Err(reason)) => fault(metadata, reason),
        Err(payload) => fault(
            metadata,
            format!("check panicked: {}", panic_message(payload.as_ref())),
        ),
    }
}

fn fault(metadata: &Arc<LintMetadata>, reason: String) -> LintResult {
    tracing::warn!(lint = %metadata.name, reason = %reason, "Lint fault recorded as fatal");
    LintResult::new(Status::Fatal, Some(reason), Arc::clone(metadata))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
