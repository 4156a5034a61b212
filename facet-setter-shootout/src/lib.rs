#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod error;
pub use error::*;

mod dummy;
pub use dummy::*;

pub mod property;
pub use property::{PropertyInfo, peek_property};

pub mod dynamic;
pub use dynamic::{CallSite, Dynamic};

pub mod compile;
pub use compile::{CompiledFactory, CompiledLambda, CompiledSetter, SetterExpr, SetterForm};

pub mod strategy;
pub use strategy::{Accessor, Action, Strategy};

pub mod config;
pub use config::{Args, BenchConfig, ConfigError};

pub mod harness;
pub use harness::{
    Event, Measurement, Pace, measure, relative_to_fastest, run, time_action, value_for,
};

pub mod logging;
