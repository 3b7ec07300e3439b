//! Core of the Entirius template processor.
//!
//! Provides the validation configuration, the greeting, input validation, and
//! shape-dispatched data processing shared by the CLI and library callers.

pub mod clock;
pub mod config;
pub mod error;
pub mod template;
pub mod test_support;

pub use clock::{Clock, FixedClock, PlaceholderClock, SystemClock};
pub use config::{ConfigBuilder, ConfigSummary, LoadError, TemplateConfig};
pub use entirius_proto::{Datum, Kind};
pub use error::TemplateError;
pub use template::{
    greet, greet_value, process, process_value, process_with_clock, validate, validate_value,
    Input, ItemReport, KeyReport, KeyReports, ProcessResult, ProcessedData,
};
