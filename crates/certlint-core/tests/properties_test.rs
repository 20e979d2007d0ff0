//! Property tests: filter composition, rollup flags and ordering.

mod common;

use certlint_core::{
    from_fn, lint_certificate, FilterOptions, LintConfig, ObjectKind, Outcome, Registry,
    RegistryBuilder, Source, Status,
};
use common::*;
use proptest::prelude::*;

const SOURCES: [Source; 4] = [
    Source::Rfc5280,
    Source::CabfBaselineRequirements,
    Source::EtsiEsi,
    Source::Mozilla,
];

const SEVERITIES: [Status; 4] = [Status::Notice, Status::Warn, Status::Error, Status::Fatal];

/// One certificate lint per plan entry; source, severity and reported
/// status come from the entry.
fn mixed_registry(plan: &[(usize, usize, u8)]) -> Registry<Fake> {
    let mut builder = RegistryBuilder::<Fake>::new();
    for (i, &(source, severity, reported)) in plan.iter().enumerate() {
        let md = metadata(
            &format!("e_generated_{:03}", i),
            SOURCES[source % SOURCES.len()].clone(),
            SEVERITIES[severity % SEVERITIES.len()],
        );
        let code = i64::from(reported % 6);
        builder
            .register_certificate_lint(
                md,
                from_fn(move |_: &FakeCert, _: &LintConfig| Ok(Outcome::from_code(code, None))),
            )
            .unwrap();
    }
    builder
        .register_revocation_list_lint(
            metadata("n_crl_has_entries", Source::Rfc5280, Status::Notice),
            from_fn(crl_has_entries),
        )
        .unwrap();
    builder.build()
}

fn lint_plan() -> impl Strategy<Value = Vec<(usize, usize, u8)>> {
    prop::collection::vec((0usize..4, 0usize..4, 0u8..6), 0..24)
}

/// Name of the `index`th lint in a registry built from a plan of `len`
/// entries; `len` itself names the trailing CRL lint.
fn plan_lint_name(index: usize, len: usize) -> String {
    if index >= len {
        "n_crl_has_entries".to_string()
    } else {
        format!("e_generated_{:03}", index)
    }
}

const NAME_PATTERNS: [&str; 4] = ["^e_", "_00[0-4]$", "crl", "[13579]$"];

/// Filters over a registry built from a plan of `len` entries. Name lists
/// only draw names that registry knows.
fn filter_options(len: usize) -> impl Strategy<Value = FilterOptions> {
    (
        prop::option::of(0usize..4),
        prop::option::of(0usize..4),
        prop::option::of(0usize..4),
        any::<bool>(),
        prop::option::of(prop::collection::vec(0..=len, 0..4)),
        prop::collection::vec(0..=len, 0..3),
        prop::option::of(0usize..NAME_PATTERNS.len()),
    )
        .prop_map(
            move |(include, exclude, min, kind_only, include_names, exclude_names, pattern)| {
                let mut opts = FilterOptions::new();
                if let Some(i) = include {
                    opts = opts.include_source(SOURCES[i].clone());
                }
                if let Some(e) = exclude {
                    opts = opts.exclude_source(SOURCES[e].clone());
                }
                if let Some(m) = min {
                    opts = opts.with_min_severity(SEVERITIES[m]);
                }
                if kind_only {
                    opts = opts.with_kind(ObjectKind::Certificate);
                }
                if let Some(indices) = include_names {
                    opts = opts.include_names(indices.into_iter().map(|i| plan_lint_name(i, len)));
                }
                opts = opts.exclude_names(exclude_names.into_iter().map(|i| plan_lint_name(i, len)));
                if let Some(p) = pattern {
                    opts = opts.with_name_pattern(NAME_PATTERNS[p]);
                }
                opts
            },
        )
}

/// A plan together with two filters valid for its registry.
fn plan_with_filters() -> impl Strategy<Value = (Vec<(usize, usize, u8)>, FilterOptions, FilterOptions)>
{
    lint_plan().prop_flat_map(|plan| {
        let len = plan.len();
        (Just(plan), filter_options(len), filter_options(len))
    })
}

proptest! {
    #[test]
    fn test_filter_composition_is_order_independent((plan, a, b) in plan_with_filters()) {
        let registry = mixed_registry(&plan);
        let ab = registry.filter(&a).unwrap().filter(&b).unwrap();
        let ba = registry.filter(&b).unwrap().filter(&a).unwrap();

        let ab_names: Vec<&str> = ab.names().collect();
        let ba_names: Vec<&str> = ba.names().collect();
        prop_assert_eq!(&ab_names, &ba_names);

        // Both equal the lints accepted by each filter on its own.
        let only_a = registry.filter(&a).unwrap();
        let only_b = registry.filter(&b).unwrap();
        let both: Vec<&str> = registry
            .names()
            .filter(|n| only_a.contains(n) && only_b.contains(n))
            .collect();
        prop_assert_eq!(ab_names, both);
    }

    #[test]
    fn test_rollup_flag_iff_entry_has_status(plan in lint_plan()) {
        let registry = mixed_registry(&plan);
        let results = lint_certificate(&FakeCert::default(), &registry).results;

        let any = |status: Status| results.iter().any(|(_, r)| r.status == status);
        prop_assert_eq!(results.notices_present(), any(Status::Notice));
        prop_assert_eq!(results.warnings_present(), any(Status::Warn));
        prop_assert_eq!(results.errors_present(), any(Status::Error));
        prop_assert_eq!(results.fatals_present(), any(Status::Fatal));

        for status in Status::ALL {
            let expected = results.iter().any(|(_, r)| r.status >= status);
            prop_assert_eq!(results.has_at_least(status), expected);
        }
    }

    #[test]
    fn test_results_iterate_in_name_order(plan in lint_plan()) {
        let registry = mixed_registry(&plan);
        let results = lint_certificate(&FakeCert::default(), &registry).results;
        let names: Vec<&str> = results.iter().map(|(n, _)| n).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        prop_assert_eq!(names, sorted);
        prop_assert_eq!(results.len(), plan.len());
    }
}

#[test]
fn test_unknown_name_in_filter_is_rejected() {
    let registry = scenario_registry();
    let err = registry
        .filter(&FilterOptions::new().exclude_names(["e_policy_oid_fromat"]))
        .unwrap_err();
    assert!(err.to_string().contains("e_policy_oid_fromat"));
}

#[test]
fn test_name_filter_after_narrowing_still_validates_against_root() {
    let registry = scenario_registry();
    let certs_only = registry
        .filter(&FilterOptions::new().with_kind(ObjectKind::Certificate))
        .unwrap();
    // Known to the root registry, filtered out of this view: not a typo.
    let narrowed = certs_only
        .filter(&FilterOptions::new().exclude_names(["n_crl_has_entries"]))
        .unwrap();
    assert_eq!(
        narrowed.names().collect::<Vec<_>>(),
        vec!["e_policy_oid_format", "n_always_pass"]
    );
}

#[test]
fn test_source_list_parsing_drives_filter() {
    let registry = scenario_registry();
    let sources: certlint_core::SourceList = "RFC5280".parse().unwrap();
    let opts = FilterOptions {
        include_sources: sources,
        ..FilterOptions::default()
    };
    let filtered = registry.filter(&opts).unwrap();
    assert_eq!(
        filtered.names().collect::<Vec<_>>(),
        vec!["e_policy_oid_format", "n_crl_has_entries"]
    );
}
