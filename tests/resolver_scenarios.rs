//! Integration coverage for the six concrete scenarios of spec.md §8, plus
//! determinism and the JSON fixture round-trip, exercised entirely through
//! `wharf`'s public API rather than the private test harness in
//! `src/resolver.rs`.

use wharf::provider::fixture::FixtureBuilder;
use wharf::{
    resolve, Binding, CancellationToken, CollectingDelegate, Constraint, Error, NoopDelegate,
    ResolveOptions, Version, VersionSet,
};

fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
}

fn range(lo: &str, hi: &str) -> VersionSet {
    VersionSet::range(v(lo), v(hi))
}

#[test]
fn scenario_1_trivial_chain() {
    let provider = FixtureBuilder::new()
        .version("A", "1.0.0", vec![Constraint::versioned("B", range("1.0.0", "2.0.0"))])
        .version("B", "1.0.0", vec![Constraint::versioned("C", range("1.0.0", "2.0.0"))])
        .version("C", "1.0.0", vec![])
        .build();

    let roots = vec![Constraint::versioned("A", range("1.0.0", "2.0.0"))];
    let mut delegate = NoopDelegate;
    let assignment = resolve(&roots, &provider, &mut delegate, ResolveOptions::default()).unwrap();

    assert_eq!(assignment.binding(&"A".into()), Some(&Binding::Version(v("1.0.0"))));
    assert_eq!(assignment.binding(&"B".into()), Some(&Binding::Version(v("1.0.0"))));
    assert_eq!(assignment.binding(&"C".into()), Some(&Binding::Version(v("1.0.0"))));
}

#[test]
fn scenario_2_conflict_forces_downgrade() {
    let provider = FixtureBuilder::new()
        .version("A", "2.0.0", vec![Constraint::versioned("C", range("1.1.0", "1.1.1"))])
        .version("A", "1.0.0", vec![Constraint::versioned("B", range("1.0.0", "2.0.0"))])
        .version("B", "1.0.0", vec![Constraint::versioned("C", range("1.0.0", "2.0.0"))])
        .version("C", "1.0.0", vec![])
        .build();

    let roots = vec![Constraint::versioned("A", range("1.0.0", "3.0.0"))];
    let mut delegate = CollectingDelegate::default();
    let assignment = resolve(&roots, &provider, &mut delegate, ResolveOptions::default()).unwrap();

    assert_eq!(assignment.binding(&"A".into()), Some(&Binding::Version(v("1.0.0"))));
    assert_eq!(assignment.binding(&"B".into()), Some(&Binding::Version(v("1.0.0"))));
    assert_eq!(assignment.binding(&"C".into()), Some(&Binding::Version(v("1.0.0"))));
}

#[test]
fn scenario_3_unsatisfiable_root_constraints() {
    let provider = FixtureBuilder::new().build();
    let roots = vec![
        Constraint::versioned("A", range("1.0.0", "2.0.0")),
        Constraint::versioned("A", range("3.0.0", "4.0.0")),
    ];
    let mut delegate = NoopDelegate;
    let err = resolve(&roots, &provider, &mut delegate, ResolveOptions::default()).unwrap_err();
    match err {
        Error::UnsatisfiableConstraints { id, requirement } => {
            assert_eq!(id, "A");
            assert!(requirement.is_empty());
        }
        other => panic!("expected UnsatisfiableConstraints, got {other:?}"),
    }
}

#[test]
fn scenario_4_cycle() {
    let provider = FixtureBuilder::new()
        .version("A", "1.0.0", vec![Constraint::versioned("B", range("1.0.0", "2.0.0"))])
        .version("B", "1.0.0", vec![Constraint::versioned("A", range("1.0.0", "2.0.0"))])
        .build();

    let roots = vec![Constraint::versioned("A", range("1.0.0", "2.0.0"))];
    let mut delegate = NoopDelegate;
    let assignment = resolve(&roots, &provider, &mut delegate, ResolveOptions::default()).unwrap();

    assert_eq!(assignment.binding(&"A".into()), Some(&Binding::Version(v("1.0.0"))));
    assert_eq!(assignment.binding(&"B".into()), Some(&Binding::Version(v("1.0.0"))));
    assert_eq!(assignment.len(), 2);
}

#[test]
fn scenario_5_unknown_module() {
    let provider = FixtureBuilder::new().build();
    let roots = vec![Constraint::versioned("A", VersionSet::any())];
    let mut delegate = NoopDelegate;
    let err = resolve(&roots, &provider, &mut delegate, ResolveOptions::default()).unwrap_err();
    assert!(matches!(err, Error::UnknownContainer(id) if id == "A"));
}

#[test]
fn scenario_6_unversioned_pin() {
    let provider = FixtureBuilder::new()
        .unversioned("A", vec![Constraint::versioned("B", range("1.0.0", "2.0.0"))])
        .version("B", "1.5.0", vec![])
        .build();

    let roots = vec![Constraint::unversioned("A")];
    let mut delegate = NoopDelegate;
    let assignment = resolve(&roots, &provider, &mut delegate, ResolveOptions::default()).unwrap();

    assert_eq!(assignment.binding(&"A".into()), Some(&Binding::Unversioned));
    assert_eq!(assignment.binding(&"B".into()), Some(&Binding::Version(v("1.5.0"))));
}

#[test]
fn invalid_input_mixing_versioned_and_unversioned_roots() {
    let provider = FixtureBuilder::new().build();
    let roots = vec![
        Constraint::versioned("A", range("1.0.0", "2.0.0")),
        Constraint::unversioned("A"),
    ];
    let mut delegate = NoopDelegate;
    let err = resolve(&roots, &provider, &mut delegate, ResolveOptions::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn invalid_input_empty_root_version_set() {
    let provider = FixtureBuilder::new().build();
    let roots = vec![Constraint::versioned("A", VersionSet::empty())];
    let mut delegate = NoopDelegate;
    let err = resolve(&roots, &provider, &mut delegate, ResolveOptions::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn determinism_across_runs() {
    let build = || {
        FixtureBuilder::new()
            .version("A", "2.0.0", vec![Constraint::versioned("C", range("1.1.0", "1.1.1"))])
            .version("A", "1.0.0", vec![Constraint::versioned("B", range("1.0.0", "2.0.0"))])
            .version("B", "1.0.0", vec![Constraint::versioned("C", range("1.0.0", "2.0.0"))])
            .version("C", "1.0.0", vec![])
            .build()
    };
    let roots = vec![Constraint::versioned("A", range("1.0.0", "3.0.0"))];

    let mut d1 = CollectingDelegate::default();
    let a1 = resolve(&roots, &build(), &mut d1, ResolveOptions::default()).unwrap();
    let mut d2 = CollectingDelegate::default();
    let a2 = resolve(&roots, &build(), &mut d2, ResolveOptions::default()).unwrap();

    let b1: Vec<_> = a1.bindings().map(|(id, b)| (id.clone(), b.clone())).collect();
    let b2: Vec<_> = a2.bindings().map(|(id, b)| (id.clone(), b.clone())).collect();
    assert_eq!(b1, b2);
    assert_eq!(d1.events, d2.events);
}

#[test]
fn cancellation_aborts_cleanly() {
    let provider = FixtureBuilder::new()
        .version("A", "1.0.0", vec![])
        .build();
    let roots = vec![Constraint::versioned("A", range("1.0.0", "2.0.0"))];
    let mut delegate = NoopDelegate;
    let token = CancellationToken::new();
    token.cancel();
    let options = ResolveOptions {
        cancellation: token,
        ..ResolveOptions::default()
    };
    let err = resolve(&roots, &provider, &mut delegate, options).unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}

#[test]
fn json_fixture_round_trip_matches_result() {
    let json = r#"{
        "name": "trivial-chain",
        "constraints": [ { "identifier": "A", "requirement": ["1.0.0", "2.0.0"] } ],
        "containers": [
            { "identifier": "A", "versions": { "1.0.0": [ { "identifier": "B", "requirement": "any" } ] } },
            { "identifier": "B", "versions": { "1.0.0": [] } }
        ],
        "result": { "A": "1.0.0", "B": "1.0.0" }
    }"#;

    let fixture = wharf::provider::fixture::parse(json).unwrap();
    let mut delegate = NoopDelegate;
    let assignment = resolve(
        &fixture.roots,
        &fixture.provider,
        &mut delegate,
        ResolveOptions::default(),
    )
    .unwrap();

    for (id, expected) in &fixture.expected {
        assert_eq!(assignment.binding(id), Some(expected));
    }
}
