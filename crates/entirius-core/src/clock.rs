//! Timestamp sources for process results.
//!
//! `process` stays a pure function by default: it stamps results with
//! [`PlaceholderClock`]. Callers that want real timestamps inject
//! [`SystemClock`] (or their own [`Clock`]) through `process_with_clock`.

use std::time::{SystemTime, UNIX_EPOCH};

pub const TIMESTAMP_PLACEHOLDER: &str = "timestamp_placeholder";

pub trait Clock {
    fn timestamp(&self) -> String;
}

/// Always yields [`TIMESTAMP_PLACEHOLDER`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaceholderClock;

impl Clock for PlaceholderClock {
    fn timestamp(&self) -> String {
        TIMESTAMP_PLACEHOLDER.to_string()
    }
}

/// Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn timestamp(&self) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        millis.to_string()
    }
}

/// Yields the same value every time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedClock(pub String);

impl Clock for FixedClock {
    fn timestamp(&self) -> String {
        self.0.clone()
    }
}
