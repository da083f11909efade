//! Per-key reservoir sampling (Algorithm R).
//!
//! Each key path gets its own bounded reservoir: a duplicate sample that
//! survives weighted random replacement, and an independently capped list
//! of unique example values. Every value seen at a key has equal
//! probability of surviving into the final sample regardless of stream
//! length.

use std::collections::{BTreeMap, HashMap};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use indigo_config::SamplerCfg;

use crate::value::ScalarValue;

/// Suffix marker appended to truncated strings.
const TRUNCATED_MARKER: &str = "<truncated>";

/// Bounded per-key value sampler.
pub struct ReservoirSampler {
    size: usize,
    max_length: usize,
    occurrences: HashMap<String, u64>,
    samples: HashMap<String, Vec<ScalarValue>>,
    uniques: HashMap<String, Vec<ScalarValue>>,
    rng: StdRng,
}

impl ReservoirSampler {
    pub fn new(cfg: &SamplerCfg) -> Self {
        Self::with_rng(cfg, StdRng::from_os_rng())
    }

    /// Deterministic sampler for tests.
    pub fn with_seed(cfg: &SamplerCfg, seed: u64) -> Self {
        Self::with_rng(cfg, StdRng::seed_from_u64(seed))
    }

    fn with_rng(cfg: &SamplerCfg, rng: StdRng) -> Self {
        Self {
            size: cfg.size,
            max_length: cfg.max_length,
            occurrences: HashMap::new(),
            samples: HashMap::new(),
            uniques: HashMap::new(),
            rng,
        }
    }

    /// Record one scalar occurrence at `key`.
    pub fn add(&mut self, key: &str, value: ScalarValue) {
        let n = {
            let count = self.occurrences.entry(key.to_owned()).or_insert(0);
            *count += 1;
            *count
        };

        let value = self.clamp(value);

        // Unique examples: bounded best-effort, not an exhaustive distinct
        // index. Once the list is full no further inserts happen for the
        // key, present or not.
        if value.is_unique_eligible() {
            let uniq = self.uniques.entry(key.to_owned()).or_default();
            if uniq.len() < self.size && !uniq.contains(&value) {
                uniq.push(value.clone());
            }
        }

        let sample = self.samples.entry(key.to_owned()).or_default();
        if sample.len() < self.size {
            sample.push(value);
        } else {
            // Classic replacement rule. The draw bound is the occurrence
            // count *after* the increment above, so the current value is
            // kept with probability size / n.
            let m = self.rng.random_range(0..n);
            if (m as usize) < self.size {
                sample[m as usize] = value;
            }
        }
    }

    /// Truncate over-long strings before storage or uniqueness tracking.
    /// Bounds memory for pathological large-string fields.
    fn clamp(&self, value: ScalarValue) -> ScalarValue {
        match value {
            ScalarValue::Str(s) => {
                let total = s.chars().count();
                if total <= self.max_length {
                    return ScalarValue::Str(s);
                }
                let head: String = s.chars().take(self.max_length).collect();
                ScalarValue::Str(format!(
                    "{head}{TRUNCATED_MARKER} ({total}) ..."
                ))
            }
            other => other,
        }
    }

    /// 1-based call count for a key so far.
    pub fn occurrences(&self, key: &str) -> u64 {
        self.occurrences.get(key).copied().unwrap_or(0)
    }

    /// The duplicate sample for a key, arrival order within surviving
    /// slots.
    pub fn sample(&self, key: &str) -> Option<&[ScalarValue]> {
        self.samples.get(key).map(|v| v.as_slice())
    }

    /// The unique-example list for a key, first-arrival order.
    pub fn unique_examples(&self, key: &str) -> Option<&[ScalarValue]> {
        self.uniques.get(key).map(|v| v.as_slice())
    }

    /// Ordered snapshot of all duplicate samples.
    pub fn samples_snapshot(&self) -> BTreeMap<String, Vec<ScalarValue>> {
        self.samples
            .iter()
            .map(|(key, values)| (key.clone(), values.clone()))
            .collect()
    }

    /// Ordered snapshot of all unique-example lists.
    pub fn unique_examples_snapshot(
        &self,
    ) -> BTreeMap<String, Vec<ScalarValue>> {
        self.uniques
            .iter()
            .map(|(key, values)| (key.clone(), values.clone()))
            .collect()
    }

    /// Per-key set-reduction of the duplicate sample, first-arrival order.
    ///
    /// Distinct from the unique-example lists, which are populated
    /// independently and may diverge once either cap is reached.
    pub fn unique_storage(&self) -> BTreeMap<String, Vec<ScalarValue>> {
        self.samples
            .iter()
            .map(|(key, values)| {
                let mut seen: Vec<ScalarValue> = Vec::new();
                for value in values {
                    if !seen.contains(value) {
                        seen.push(value.clone());
                    }
                }
                (key.clone(), seen)
            })
            .collect()
    }
}
