//! Timed loops.

use core::hint::black_box;
use core::time::Duration;
use std::time::Instant;

use crate::{AccessorError, Action, BenchConfig, Dummy, SetterExpr, Strategy, peek_property};

/// Outcome of timing one strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    /// The strategy that was timed.
    pub strategy: Strategy,
    /// Invocations performed.
    pub iterations: u64,
    /// Wall-clock time spent in the loop.
    pub elapsed: Duration,
    /// The property's value right after the loop.
    pub observed: String,
}

impl Measurement {
    /// Elapsed time in whole milliseconds.
    pub fn elapsed_millis(&self) -> u128 {
        self.elapsed.as_millis()
    }

    /// Average cost of one invocation.
    pub fn per_call(&self) -> Duration {
        let nanos = self.elapsed.as_nanos() / u128::from(self.iterations.max(1));
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

/// How a run compares to the fastest run of the same shootout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    /// Within half a percent of the fastest run.
    Fastest,
    /// Slower, but by less than 10x.
    Slower,
    /// At least 10x slower.
    MuchSlower,
}

impl Pace {
    /// Buckets a ratio to the fastest run.
    pub fn of(ratio: f64) -> Self {
        if ratio < 1.005 {
            Pace::Fastest
        } else if ratio < 10.0 {
            Pace::Slower
        } else {
            Pace::MuchSlower
        }
    }
}

/// Ratio of each measurement's elapsed time to the fastest one, in input order.
///
/// Times are compared in nanoseconds plus one, so a zero-length fastest run
/// still yields finite ratios and the fastest run is always exactly `1.0`.
pub fn relative_to_fastest(measurements: &[Measurement]) -> Vec<(f64, Pace)> {
    let Some(fastest) = measurements.iter().map(|m| m.elapsed).min() else {
        return Vec::new();
    };
    let fastest = fastest.as_nanos() as f64 + 1.0;
    measurements
        .iter()
        .map(|m| {
            let ratio = (m.elapsed.as_nanos() as f64 + 1.0) / fastest;
            (ratio, Pace::of(ratio))
        })
        .collect()
}

/// Something the harness wants to report while it runs.
#[derive(Debug)]
pub enum Event<'a> {
    /// A compiled accessor was built and is about to be timed.
    Compiled {
        /// Which strategy built it.
        strategy: Strategy,
        /// Its printable form.
        expr: &'a SetterExpr,
    },
    /// A strategy finished.
    Measured(&'a Measurement),
}

/// The value strategy `strategy` writes: `value1` for the first strategy in
/// run order, `value2` for the second, and so on.
pub fn value_for(strategy: Strategy) -> String {
    format!("value{}", strategy.ordinal())
}

/// Invokes `action` `iterations` times with a fresh copy of `value` and
/// returns the time spent. Stops at the first error.
pub fn time_action<V: Clone>(
    iterations: u64,
    value: &V,
    action: &mut Action<'_, V>,
) -> Result<Duration, AccessorError> {
    let start = Instant::now();
    for _ in 0..iterations {
        action(black_box(value.clone()))?;
    }
    Ok(start.elapsed())
}

/// Times a single strategy against `target`.
pub fn measure(
    target: &mut Dummy,
    strategy: Strategy,
    config: &BenchConfig,
    report: &mut impl FnMut(Event<'_>),
) -> Result<Measurement, AccessorError> {
    let value = value_for(strategy);
    tracing::debug!(%strategy, iterations = config.iterations, %value, "building accessor");

    let elapsed = {
        let mut accessor = strategy.build(target, &config.property)?;
        if config.show_expr
            && let Some(expr) = &accessor.expr
        {
            report(Event::Compiled { strategy, expr });
        }
        time_action(config.iterations, &value, &mut accessor.action)?
    };

    let observed = peek_property::<Dummy, String>(target, &config.property)?.clone();
    let measurement = Measurement {
        strategy,
        iterations: config.iterations,
        elapsed,
        observed,
    };
    tracing::info!(
        %strategy,
        elapsed_ms = measurement.elapsed_millis(),
        per_call = ?measurement.per_call(),
        "measured"
    );
    report(Event::Measured(&measurement));
    Ok(measurement)
}

/// Runs every configured strategy, in order, against one shared [`Dummy`].
pub fn run(
    config: &BenchConfig,
    mut report: impl FnMut(Event<'_>),
) -> Result<Vec<Measurement>, AccessorError> {
    let mut target = Dummy::new();
    config
        .strategies
        .iter()
        .map(|&strategy| measure(&mut target, strategy, config, &mut report))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured(strategy: Strategy, elapsed: Duration) -> Measurement {
        Measurement {
            strategy,
            iterations: 1,
            elapsed,
            observed: value_for(strategy),
        }
    }

    #[test]
    fn fastest_run_is_one_x() {
        let runs = [
            measured(Strategy::Reflection, Duration::from_millis(900)),
            measured(Strategy::HardCoded, Duration::from_millis(30)),
            measured(Strategy::CompiledSetter, Duration::from_millis(60)),
        ];
        let ratios = relative_to_fastest(&runs);

        assert_eq!(ratios.len(), 3);
        assert_eq!(ratios[1], (1.0, Pace::Fastest));
        assert!((ratios[2].0 - 2.0).abs() < 1e-3);
        assert_eq!(ratios[2].1, Pace::Slower);
        assert!((ratios[0].0 - 30.0).abs() < 1e-3);
        assert_eq!(ratios[0].1, Pace::MuchSlower);
    }

    #[test]
    fn zero_length_fastest_run_stays_finite() {
        let runs = [
            measured(Strategy::HardCoded, Duration::ZERO),
            measured(Strategy::Dynamic, Duration::from_nanos(41)),
        ];
        let ratios = relative_to_fastest(&runs);

        assert_eq!(ratios[0], (1.0, Pace::Fastest));
        assert!(ratios[1].0.is_finite());
        assert_eq!(ratios[1], (42.0, Pace::MuchSlower));
    }

    #[test]
    fn no_runs_no_ratios() {
        assert!(relative_to_fastest(&[]).is_empty());
    }
}
