//! Greeting, validation, and shape-dispatched processing.
//!
//! Each operation comes in two forms. The typed form (`greet`, `validate`,
//! `process`) takes Rust values and cannot fail on shape. The `*_value` form
//! takes a [`Datum`] and reports kind mismatches as [`TemplateError`]s.

use crate::clock::{Clock, PlaceholderClock};
use crate::config::{ConfigSummary, TemplateConfig};
use crate::error::{Result, TemplateError};
use entirius_proto::{Datum, Kind};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::ops::Index;

pub const DEFAULT_NAME: &str = "World";

pub fn greet(name: Option<&str>) -> String {
    format!(
        "Hello, {}! Welcome to Entirius.",
        name.unwrap_or(DEFAULT_NAME)
    )
}

/// Like [`greet`], but rejects a provided name that is not text.
pub fn greet_value(name: Option<&Datum>) -> Result<String> {
    match name {
        None => Ok(greet(None)),
        Some(Datum::Text(name)) => Ok(greet(Some(name))),
        Some(other) => Err(TemplateError::InputType {
            what: "Name",
            found: other.kind(),
        }),
    }
}

pub fn validate(value: &str, config: &TemplateConfig) -> bool {
    config.accepts(value)
}

/// Validates a datum, using the default configuration when `config` is `None`.
pub fn validate_value(value: &Datum, config: Option<&TemplateConfig>) -> Result<bool> {
    let Some(value) = value.as_text() else {
        return Err(TemplateError::InputType {
            what: "Value",
            found: value.kind(),
        });
    };
    Ok(match config {
        Some(config) => validate(value, config),
        None => validate(value, &TemplateConfig::default()),
    })
}

/// The shapes `process` accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Text(String),
    Sequence(Vec<String>),
    /// Entries in insertion order; values are carried through untouched.
    Mapping(Vec<(String, Datum)>),
}

impl Input {
    pub fn kind(&self) -> Kind {
        match self {
            Input::Text(_) => Kind::Text,
            Input::Sequence(_) => Kind::Sequence,
            Input::Mapping(_) => Kind::Mapping,
        }
    }
}

impl TryFrom<Datum> for Input {
    type Error = TemplateError;

    fn try_from(data: Datum) -> Result<Self> {
        match data {
            Datum::Text(s) => Ok(Input::Text(s)),
            Datum::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Datum::Text(s) => Ok(s),
                    other => Err(TemplateError::ElementType {
                        index,
                        found: other.kind(),
                    }),
                })
                .collect::<Result<Vec<_>>>()
                .map(Input::Sequence),
            Datum::Map(entries) => entries
                .into_iter()
                .map(|(key, value)| match key {
                    Datum::Text(key) => Ok((key, value)),
                    other => Err(TemplateError::KeyType {
                        found: other.kind(),
                    }),
                })
                .collect::<Result<Vec<_>>>()
                .map(Input::Mapping),
            other => Err(TemplateError::UnsupportedType {
                found: other.kind(),
            }),
        }
    }
}

impl From<&str> for Input {
    fn from(value: &str) -> Self {
        Input::Text(value.to_string())
    }
}

impl From<String> for Input {
    fn from(value: String) -> Self {
        Input::Text(value)
    }
}

impl From<Vec<String>> for Input {
    fn from(value: Vec<String>) -> Self {
        Input::Sequence(value)
    }
}

impl From<Vec<&str>> for Input {
    fn from(value: Vec<&str>) -> Self {
        Input::Sequence(value.into_iter().map(str::to_string).collect())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProcessResult {
    pub input_type: Kind,
    pub processed_at: String,
    pub config_used: ConfigSummary,
    pub valid: bool,
    #[serde(flatten)]
    pub data: ProcessedData,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ProcessedData {
    Text {
        processed_data: String,
        length: usize,
    },
    Sequence {
        processed_data: Vec<ItemReport>,
        total_items: usize,
        valid_items: usize,
    },
    Mapping {
        processed_data: KeyReports,
        total_keys: usize,
        valid_keys: usize,
    },
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub value: String,
    pub valid: bool,
    pub length: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct KeyReport {
    pub original_value: Datum,
    pub key_valid: bool,
    pub value_type: Kind,
}

/// Per-key reports in input order, keyed by the stripped key.
///
/// A later key that strips to the same text replaces the earlier report in
/// place, so the position of the first occurrence is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyReports {
    entries: Vec<(String, KeyReport)>,
}

impl KeyReports {
    pub fn insert(&mut self, key: String, report: KeyReport) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = report,
            None => self.entries.push((key, report)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&KeyReport> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, report)| report)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeyReport)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }
}

impl Index<&str> for KeyReports {
    type Output = KeyReport;

    fn index(&self, key: &str) -> &KeyReport {
        match self.get(key) {
            Some(report) => report,
            None => panic!("no report for key {key:?}"),
        }
    }
}

impl Serialize for KeyReports {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, report) in &self.entries {
            map.serialize_entry(key, report)?;
        }
        map.end()
    }
}

/// Processes `input`, stamping the result with the placeholder timestamp.
pub fn process(input: &Input, config: &TemplateConfig) -> ProcessResult {
    process_with_clock(input, config, &PlaceholderClock)
}

pub fn process_with_clock(
    input: &Input,
    config: &TemplateConfig,
    clock: &dyn Clock,
) -> ProcessResult {
    let (data, valid) = match input {
        Input::Text(value) => {
            let processed = config.prepare(value).to_string();
            let valid = config.accepts(value);
            let length = processed.chars().count();
            (
                ProcessedData::Text {
                    processed_data: processed,
                    length,
                },
                valid,
            )
        }
        Input::Sequence(items) => {
            let reports: Vec<ItemReport> = items
                .iter()
                .map(|item| {
                    let value = config.prepare(item).to_string();
                    ItemReport {
                        length: value.chars().count(),
                        valid: config.accepts(item),
                        value,
                    }
                })
                .collect();
            let valid_items = reports.iter().filter(|r| r.valid).count();
            (
                ProcessedData::Sequence {
                    processed_data: reports,
                    total_items: items.len(),
                    valid_items,
                },
                valid_items == items.len(),
            )
        }
        Input::Mapping(entries) => {
            let mut reports = KeyReports::default();
            let mut valid_keys = 0;
            for (key, value) in entries {
                let key_valid = config.accepts(key);
                if key_valid {
                    valid_keys += 1;
                }
                reports.insert(
                    config.prepare(key).to_string(),
                    KeyReport {
                        original_value: value.clone(),
                        key_valid,
                        value_type: value.kind(),
                    },
                );
            }
            (
                ProcessedData::Mapping {
                    processed_data: reports,
                    total_keys: entries.len(),
                    valid_keys,
                },
                valid_keys == entries.len(),
            )
        }
    };
    tracing::debug!(input_type = %input.kind(), valid, "processed input");
    ProcessResult {
        input_type: input.kind(),
        processed_at: clock.timestamp(),
        config_used: config.summary(),
        valid,
        data,
    }
}

/// Checks the shape of `data` and processes it, using the default
/// configuration when `config` is `None`.
pub fn process_value(data: Datum, config: Option<&TemplateConfig>) -> Result<ProcessResult> {
    let input = Input::try_from(data)?;
    Ok(match config {
        Some(config) => process(&input, config),
        None => process(&input, &TemplateConfig::default()),
    })
}
