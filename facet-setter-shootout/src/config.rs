//! Command-line configuration.

use core::fmt;

use facet::Facet;
use facet_args as args;

use crate::strategy::UnknownStrategy;
use crate::{Strategy, TEXT_PROPERTY};

/// Invocations per strategy when `--iterations` isn't given.
pub const DEFAULT_ITERATIONS: u64 = 100_000_000;

/// Command-line arguments, as parsed by `facet-args`.
#[derive(Facet, Debug, Default)]
pub struct Args {
    /// Number of accessor invocations per strategy.
    #[facet(args::named, args::short = 'n')]
    pub iterations: Option<u64>,

    /// Comma-separated strategies to run. They always run in the fixed order.
    #[facet(args::named, args::short = 's')]
    pub strategies: Option<String>,

    /// Name of the property to set.
    #[facet(args::named, args::short = 'p')]
    pub property: Option<String>,

    /// Print each compiled accessor before timing it.
    #[facet(args::named)]
    pub show_expr: bool,

    /// Print a summary table once every strategy has run.
    #[facet(args::named)]
    pub summary: bool,
}

/// Validated benchmark configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Invocations per strategy, at least 1.
    pub iterations: u64,
    /// Strategies to run, in [`Strategy::ALL`] order, without duplicates.
    pub strategies: Vec<Strategy>,
    /// Property every accessor writes.
    pub property: String,
    /// Print compiled accessors before timing them.
    pub show_expr: bool,
    /// Print a summary table at the end.
    pub summary: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            strategies: Strategy::ALL.to_vec(),
            property: TEXT_PROPERTY.into(),
            show_expr: false,
            summary: false,
        }
    }
}

/// Errors turning [`Args`] into a [`BenchConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `--iterations 0`.
    ZeroIterations,
    /// A name in `--strategies` isn't a strategy.
    UnknownStrategy(UnknownStrategy),
    /// `--strategies` named nothing.
    NoStrategies,
    /// `--property ""`.
    EmptyProperty,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroIterations => write!(f, "--iterations must be at least 1"),
            ConfigError::UnknownStrategy(inner) => write!(f, "{inner}"),
            ConfigError::NoStrategies => write!(f, "--strategies must name at least one strategy"),
            ConfigError::EmptyProperty => write!(f, "--property must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<UnknownStrategy> for ConfigError {
    fn from(value: UnknownStrategy) -> Self {
        ConfigError::UnknownStrategy(value)
    }
}

impl TryFrom<Args> for BenchConfig {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let iterations = args.iterations.unwrap_or(DEFAULT_ITERATIONS);
        if iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }

        let strategies = match args.strategies.as_deref() {
            None => Strategy::ALL.to_vec(),
            Some(list) => parse_strategies(list)?,
        };

        let property = args.property.unwrap_or_else(|| TEXT_PROPERTY.into());
        if property.is_empty() {
            return Err(ConfigError::EmptyProperty);
        }

        Ok(Self {
            iterations,
            strategies,
            property,
            show_expr: args.show_expr,
            summary: args.summary,
        })
    }
}

/// Parses a comma-separated strategy list into run order.
pub fn parse_strategies(list: &str) -> Result<Vec<Strategy>, ConfigError> {
    let mut picked = list
        .split(',')
        .filter(|name| !name.trim().is_empty())
        .map(str::parse::<Strategy>)
        .collect::<Result<Vec<_>, _>>()?;
    if picked.is_empty() {
        return Err(ConfigError::NoStrategies);
    }
    picked.sort();
    picked.dedup();
    Ok(picked)
}
