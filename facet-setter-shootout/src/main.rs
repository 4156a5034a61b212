//! Times every property-setter strategy and prints the results.

use eyre::{Result, WrapErr, eyre};
use facet_setter_shootout::{
    Args, BenchConfig, Event, Measurement, Pace, harness, logging, relative_to_fastest,
};
use owo_colors::OwoColorize;

fn main() -> Result<()> {
    logging::init();

    let args: Args = facet_args::from_std_args().map_err(|e| eyre!("{e}"))?;
    let config = BenchConfig::try_from(args)?;
    tracing::debug!(?config, "starting shootout");

    let measurements = harness::run(&config, |event| match event {
        Event::Compiled { expr, .. } => println!("{expr}"),
        Event::Measured(m) => {
            println!("{}", m.elapsed_millis());
            println!("{}", m.observed);
        }
    })
    .wrap_err_with(|| format!("setting property `{}`", config.property))?;

    if config.summary {
        print_summary(&measurements);
    }
    Ok(())
}

fn print_summary(measurements: &[Measurement]) {
    println!();
    println!(
        "{} {} {} {}",
        format!("{:<20}", "strategy").bold(),
        format!("{:>10}", "ms").bold(),
        format!("{:>12}", "per call").bold(),
        format!("{:>8}", "ratio").bold()
    );
    for (m, (ratio, pace)) in measurements.iter().zip(relative_to_fastest(measurements)) {
        let cell = format!("{:>8}", format!("{ratio:.2}x"));
        let cell = match pace {
            Pace::Fastest => cell.green().to_string(),
            Pace::Slower => cell.yellow().to_string(),
            Pace::MuchSlower => cell.red().to_string(),
        };
        println!(
            "{} {:>10} {:>12} {}",
            format!("{:<20}", m.strategy.name()).cyan(),
            m.elapsed_millis(),
            format!("{:?}", m.per_call()),
            cell
        );
    }
}
