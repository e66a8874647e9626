//! Observed system state and its canonical table index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A small set of named numeric observations.
///
/// Used only as a lookup key into the Q-table. Observations are kept
/// sorted by name, so two states with the same pairs encode identically
/// regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State {
    observations: BTreeMap<String, f64>,
}

impl State {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observation, replacing any previous value with that name.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.observations.insert(name.into(), value);
        self
    }

    /// Value of an observation.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.observations.get(name).copied()
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the state has no observations.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Canonical text form: `name=value;` pairs in name order.
    ///
    /// `-0.0` is written as `0` so that equal values always agree.
    pub fn canonical(&self) -> String {
        self.observations
            .iter()
            .map(|(name, &value)| {
                let value = if value == 0.0 { 0.0 } else { value };
                format!("{name}={value};")
            })
            .collect()
    }

    /// Table row for this state in `[0, state_size)`.
    ///
    /// SHA-256 of the canonical form, first 8 bytes as a big-endian
    /// integer, reduced modulo `state_size`. Distinct states may collide;
    /// equal states never map to different rows.
    pub fn index(&self, state_size: usize) -> usize {
        let digest = Sha256::digest(self.canonical().as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        (u64::from_be_bytes(prefix) % state_size.max(1) as u64) as usize
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for State {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            observations: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
