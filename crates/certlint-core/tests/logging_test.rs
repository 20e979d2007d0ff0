//! Log contract: lint faults and empty rule sets are reported as
//! structured `warn` events carrying the lint name and reason.

mod common;

use certlint_core::{
    from_fn, lint_certificate, lint_ocsp_response, LintConfig, Outcome, RegistryBuilder, Source,
    Status,
};
use common::*;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone)]
struct MockWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl std::io::Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for MockWriter {
    type Writer = MockWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn setup_capture() -> (MockWriter, tracing::subscriber::DefaultGuard) {
    let writer = MockWriter {
        buf: Arc::new(Mutex::new(Vec::new())),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .json()
        .finish();
    (writer, tracing::subscriber::set_default(subscriber))
}

/// Parsed JSON events at `level`.
fn events_at(writer: &MockWriter, level: &str) -> Vec<serde_json::Value> {
    let output = String::from_utf8(writer.buf.lock().unwrap().clone()).unwrap();
    output
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line.trim()).ok())
        .filter(|v| v.get("level").and_then(|l| l.as_str()) == Some(level))
        .collect()
}

#[test]
fn test_fault_emits_warn_with_lint_name() {
    let (writer, _guard) = setup_capture();

    let mut builder = RegistryBuilder::<Fake>::new();
    builder
        .register_certificate_lint(
            metadata("e_always_fails", Source::Community, Status::Error),
            from_fn(|_: &FakeCert, _: &LintConfig| -> anyhow::Result<Outcome> {
                anyhow::bail!("cannot decode subject")
            }),
        )
        .unwrap();
    let registry = builder.build();

    let results = lint_certificate(&FakeCert::default(), &registry).results;
    assert_eq!(results.status_of("e_always_fails"), Some(Status::Fatal));

    let warnings = events_at(&writer, "WARN");
    let fault = warnings
        .iter()
        .find(|e| e["fields"]["lint"] == "e_always_fails")
        .expect("fault should be logged");
    assert!(fault["fields"]["reason"]
        .as_str()
        .unwrap()
        .contains("cannot decode subject"));
}

#[test]
fn test_recorded_results_logged_at_debug() {
    let (writer, _guard) = setup_capture();

    let registry = scenario_registry();
    lint_certificate(&FakeCert::default(), &registry);

    let recorded: Vec<String> = events_at(&writer, "DEBUG")
        .iter()
        .filter_map(|e| e["fields"]["lint"].as_str().map(str::to_string))
        .collect();
    assert_eq!(recorded, vec!["e_policy_oid_format", "n_always_pass"]);
}

#[test]
fn test_empty_rule_set_is_warned() {
    let (writer, _guard) = setup_capture();

    let registry = scenario_registry();
    let eval = lint_ocsp_response(&FakeOcsp, &registry);
    assert_eq!(eval.warnings.len(), 1);

    let warnings = events_at(&writer, "WARN");
    assert!(warnings
        .iter()
        .any(|e| e["fields"]["kind"] == "ocsp_response"));
}
