use facet_setter_shootout::{
    AccessorError, Args, BenchConfig, ConfigError, Dummy, Event, Strategy, harness, time_action,
    value_for,
};
use facet_testhelpers::test;

fn config(iterations: u64) -> BenchConfig {
    BenchConfig {
        iterations,
        ..BenchConfig::default()
    }
}

#[test]
fn run_reports_each_strategy_in_order() {
    let mut seen = Vec::new();
    let measurements = harness::run(&config(1_000), |event| {
        if let Event::Measured(m) = event {
            seen.push(m.strategy);
        }
    })
    .unwrap();

    assert_eq!(seen, Strategy::ALL);
    let observed: Vec<&str> = measurements.iter().map(|m| m.observed.as_str()).collect();
    assert_eq!(
        observed,
        [
            "value1", "value2", "value3", "value4", "value5", "value6", "value7"
        ]
    );
    assert!(measurements.iter().all(|m| m.iterations == 1_000));
}

#[test]
fn show_expr_only_reports_compiled_strategies() {
    let config = BenchConfig {
        show_expr: true,
        ..config(1)
    };
    let mut compiled = Vec::new();
    harness::run(&config, |event| {
        if let Event::Compiled { strategy, expr } = event {
            assert_eq!(expr.member, "text");
            compiled.push(strategy);
        }
    })
    .unwrap();

    assert_eq!(
        compiled,
        [
            Strategy::CompiledSetter,
            Strategy::CompiledLambda,
            Strategy::CompiledFactory
        ]
    );
}

#[test]
fn missing_property_aborts_the_run() {
    let config = BenchConfig {
        property: "Text".into(),
        strategies: vec![Strategy::CachedReflection, Strategy::CompiledSetter],
        ..config(10)
    };
    let mut measured = 0;
    let err = harness::run(&config, |event| {
        if let Event::Measured(_) = event {
            measured += 1;
        }
    })
    .unwrap_err();

    assert!(matches!(err, AccessorError::NoSuchProperty { .. }), "{err}");
    assert_eq!(measured, 0);
}

#[test]
fn time_action_invokes_exactly_n_times() {
    let mut calls = 0u64;
    let mut action: facet_setter_shootout::Action<'_, String> = Box::new(|value: String| {
        assert_eq!(value, "v");
        calls += 1;
        Ok(())
    });
    time_action(250, &"v".to_string(), &mut action).unwrap();
    drop(action);
    assert_eq!(calls, 250);
}

#[test]
fn time_action_stops_at_first_error() {
    let mut dummy = Dummy::new();
    let mut accessor = Strategy::Reflection.build(&mut dummy, "missing").unwrap();
    let err = time_action(10, &"v".to_string(), &mut accessor.action).unwrap_err();
    assert!(matches!(err, AccessorError::NoSuchProperty { .. }));
}

#[test]
fn values_are_numbered_by_run_position() {
    assert_eq!(value_for(Strategy::HardCoded), "value1");
    assert_eq!(value_for(Strategy::CompiledSetter), "value5");
    assert_eq!(value_for(Strategy::CompiledFactory), "value7");
}

#[test]
fn cli_args_become_config() {
    let args: Args = facet_args::from_slice(&[
        "-n",
        "42",
        "--strategies",
        "dynamic,hard-coded",
        "--show-expr",
    ])
    .unwrap();
    let config = BenchConfig::try_from(args).unwrap();

    assert_eq!(config.iterations, 42);
    assert_eq!(config.strategies, [Strategy::HardCoded, Strategy::Dynamic]);
    assert_eq!(config.property, "text");
    assert!(config.show_expr);
    assert!(!config.summary);
}

#[test]
fn cli_rejects_unknown_strategies() {
    let args: Args = facet_args::from_slice(&["-s", "hard-coded,il-emit"]).unwrap();
    let err = BenchConfig::try_from(args).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownStrategy(_)));
    assert!(err.to_string().contains("`il-emit`"));
}
