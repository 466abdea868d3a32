//! End-to-end problems loaded from `tests/fixtures`.

use std::path::PathBuf;

use approx::assert_relative_eq;
use wire_core::{
    dsl,
    error::ErrorKind,
    report::{self, OutputFormat},
    circuit::TargetMetric,
    solver::Requirement,
    Metric, Problem, Solution, Solver, SolverConfig, WireError,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load(name: &str) -> Problem {
    dsl::load_file(&fixture(name)).unwrap()
}

fn value(solution: &Solution, node: &str, metric: Metric) -> f64 {
    solution
        .metrics_for(node)
        .and_then(|m| m.get(metric))
        .unwrap_or_else(|| panic!("{node} {metric} unresolved"))
}

#[test]
fn series_string_resolves_every_field() {
    let solution = wire_core::solve(&load("series.wire")).unwrap();

    assert_relative_eq!(value(&solution, "totals", Metric::Resistance), 600.0, max_relative = 1e-12);
    assert_relative_eq!(value(&solution, "totals", Metric::Current), 0.04, max_relative = 1e-12);
    assert_relative_eq!(value(&solution, "totals", Metric::Watts), 0.96, max_relative = 1e-12);
    assert_relative_eq!(value(&solution, "R1", Metric::Voltage), 6.0, max_relative = 1e-12);
    assert_relative_eq!(value(&solution, "R2", Metric::Voltage), 8.0, max_relative = 1e-12);
    assert_relative_eq!(value(&solution, "R3", Metric::Voltage), 10.0, max_relative = 1e-12);
    assert_relative_eq!(solution.target_value().unwrap(), 0.04, max_relative = 1e-12);
    assert!(solution.is_complete());
}

#[test]
fn target_on_totals_is_reported() {
    let problem = load("parallel.wire").with_target(TargetMetric::totals(Metric::Resistance));
    let solution = wire_core::solve(&problem).unwrap();
    assert_eq!(solution.target, Some(TargetMetric::totals(Metric::Resistance)));
    assert_relative_eq!(solution.target_value().unwrap(), 200.0 / 3.0, max_relative = 1e-12);
}

#[test]
fn parallel_pair_splits_current() {
    let solution = wire_core::solve(&load("parallel.wire")).unwrap();

    assert_relative_eq!(value(&solution, "totals", Metric::Resistance), 200.0 / 3.0, max_relative = 1e-12);
    assert_relative_eq!(value(&solution, "R1", Metric::Current), 0.24, max_relative = 1e-12);
    assert_relative_eq!(value(&solution, "R2", Metric::Current), 0.12, max_relative = 1e-12);
    assert_relative_eq!(value(&solution, "totals", Metric::Current), 0.36, max_relative = 1e-12);
    assert!(solution.target.is_none());
}

#[test]
fn measured_current_recovers_withheld_resistor() {
    for name in ["backward.wire", "backward.json"] {
        let solution = wire_core::solve(&load(name)).unwrap();
        assert_relative_eq!(value(&solution, "totals", Metric::Resistance), 600.0, max_relative = 1e-9);
        assert_relative_eq!(value(&solution, "R2", Metric::Resistance), 270.0, max_relative = 1e-9);
        assert_relative_eq!(solution.target_value().unwrap(), 270.0, max_relative = 1e-9);
    }
}

#[test]
fn text_and_json_problems_agree() {
    let text = wire_core::solve(&load("backward.wire")).unwrap();
    let json = wire_core::solve(&load("backward.json")).unwrap();
    assert_eq!(text.components.len(), json.components.len());
    for (a, b) in text.components.iter().zip(&json.components) {
        assert_eq!(a.id, b.id);
        for metric in Metric::ALL {
            assert_relative_eq!(
                a.metrics.get(metric).unwrap(),
                b.metrics.get(metric).unwrap(),
                max_relative = 1e-12
            );
        }
    }
}

#[test]
fn led_drops_fixed_voltage_in_series() {
    let solution = wire_core::solve(&load("led_indicator.wire")).unwrap();

    assert_relative_eq!(value(&solution, "LED1", Metric::Voltage), 2.0, max_relative = 1e-12);
    assert_relative_eq!(value(&solution, "R1", Metric::Voltage), 7.0, max_relative = 1e-12);
    assert_relative_eq!(value(&solution, "R1", Metric::Current), 0.02, max_relative = 1e-12);
    assert_relative_eq!(value(&solution, "LED1", Metric::Watts), 0.04, max_relative = 1e-12);
    // Apparent resistance of the LED at this operating point
    assert_relative_eq!(value(&solution, "LED1", Metric::Resistance), 100.0, max_relative = 1e-12);
    assert_relative_eq!(value(&solution, "totals", Metric::Resistance), 450.0, max_relative = 1e-12);
}

#[test]
fn nested_groups_resolve() {
    let solution = wire_core::solve(&load("mixed.wire")).unwrap();

    assert_relative_eq!(value(&solution, "totals", Metric::Resistance), 8.0, max_relative = 1e-12);
    assert_relative_eq!(value(&solution, "totals", Metric::Current), 1.5, max_relative = 1e-12);
    assert_relative_eq!(value(&solution, "R1", Metric::Voltage), 6.0, max_relative = 1e-12);
    assert_relative_eq!(value(&solution, "R2", Metric::Current), 0.5, max_relative = 1e-12);
    assert_relative_eq!(value(&solution, "R3", Metric::Voltage), 2.0, max_relative = 1e-12);
    assert_relative_eq!(value(&solution, "R4", Metric::Voltage), 4.0, max_relative = 1e-12);
    assert_relative_eq!(value(&solution, "VS", Metric::Watts), 18.0, max_relative = 1e-12);
}

#[test]
fn two_unknown_resistors_stall() {
    let problem = dsl::parse_problem(
        "\
.source VS 12
R1
R2
.tree series(R1, R2)
",
    )
    .unwrap();

    let err = wire_core::solve(&problem).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnderDetermined);
    match err {
        WireError::UnderDetermined { node, metric } => {
            assert_eq!(node, "totals");
            assert_eq!(metric, Metric::Watts);
        }
        other => panic!("expected UnderDetermined, got {other:?}"),
    }
}

#[test]
fn source_and_totals_disagreement_is_a_conflict() {
    // 12 V at 50 mA implies 240 Ω, but the resistors sum to 200 Ω
    let problem = dsl::parse_problem(
        "\
.source VS 12
R1 100
R2 100
.tree series(R1, R2)
.totals i=50m
",
    )
    .unwrap();

    match wire_core::solve(&problem) {
        Err(WireError::ConflictingGivens { first, second, .. }) => {
            assert!((first - second).abs() > 1e-6);
        }
        other => panic!("expected ConflictingGivens, got {other:?}"),
    }
}

#[test]
fn zero_ohm_branch_in_parallel_is_division_by_zero() {
    let problem = dsl::parse_problem(
        "\
.source VS 5
R1 0
R2 10
.tree parallel(R1, R2)
",
    )
    .unwrap();

    let err = wire_core::solve(&problem).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DivisionByZero);
}

#[test]
fn dangling_reference_is_malformed_tree() {
    let problem = dsl::parse_problem(
        "\
.source VS 5
R1 10
.tree series(R1, R9)
",
    )
    .unwrap();

    let err = wire_core::solve(&problem).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedTree);
}

#[test]
fn target_only_leaves_unrelated_fields_unknown() {
    let problem = dsl::parse_problem(
        "\
.source VS 12
R1 6
R2
R3
.tree parallel(R1, series(R2, R3))
.target R1 current
",
    )
    .unwrap();

    let solver = Solver::with_config(SolverConfig::new().with_requirement(Requirement::Target));
    let solution = solver.solve(&problem).unwrap();
    assert_relative_eq!(solution.target_value().unwrap(), 2.0, max_relative = 1e-12);
    assert!(!solution.is_complete());

    let table = report::render(&solution, OutputFormat::Human).unwrap();
    assert!(table.contains("R1 current = 2 A"));
    assert!(table.contains('?'));
}

#[test]
fn json_report_round_trips_through_serde() {
    let solution = wire_core::solve(&load("series.wire")).unwrap();
    let json = report::render(&solution, OutputFormat::Json).unwrap();
    let back: Solution = serde_json::from_str(&json).unwrap();
    assert_eq!(back.components.len(), 3);
    assert_eq!(back.source.id, "VS");
    assert_relative_eq!(back.totals.current.unwrap(), 0.04, max_relative = 1e-12);
}
