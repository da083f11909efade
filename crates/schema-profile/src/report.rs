//! The terminal report artifact.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::value::ScalarValue;

/// Profiling report, produced once after the entire input has been
/// consumed.
///
/// The short top-level keys are the on-wire contract: `c` is the counter
/// snapshot, `s` the raw reservoir sample (duplicates allowed), `u` the
/// set-reduction of `s`, and `v` the independently capped unique-example
/// lists.
#[derive(Debug, Serialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub c: BTreeMap<String, u64>,
    pub s: BTreeMap<String, Vec<ScalarValue>>,
    pub u: BTreeMap<String, Vec<ScalarValue>>,
    pub v: BTreeMap<String, Vec<ScalarValue>>,
}

/// Run-level metadata.
#[derive(Debug, Serialize)]
pub struct ReportMeta {
    /// Configured reservoir size.
    pub size: usize,

    /// Generation timestamp.
    pub date: DateTime<Utc>,

    /// Total documents processed (blank lines excluded).
    pub total: u64,

    /// Hex SHA-1 digest over the raw input bytes.
    pub sha1: String,
}

impl Report {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
