//! Dense state × action value table.
//!
//! Values are stored row-major in one flat vector:
//! `values[state * action_size + action]`. Persistence writes exactly that
//! vector as a JSON array of numbers.

use std::fs;
use std::path::Path;

use crate::error::{PlannerError, Result};

/// Tabular action-value estimates.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    state_size: usize,
    action_size: usize,
    values: Vec<f64>,
}

impl QTable {
    /// Creates a zero-initialized table.
    pub fn zeros(state_size: usize, action_size: usize) -> Self {
        Self {
            state_size,
            action_size,
            values: vec![0.0; state_size * action_size],
        }
    }

    /// Rebuilds a table from flat row-major values.
    pub fn from_flat(state_size: usize, action_size: usize, values: Vec<f64>) -> Result<Self> {
        let expected = state_size * action_size;
        if values.len() != expected {
            return Err(PlannerError::QTableShape {
                expected,
                found: values.len(),
            });
        }
        Ok(Self {
            state_size,
            action_size,
            values,
        })
    }

    /// Number of state rows.
    pub fn state_size(&self) -> usize {
        self.state_size
    }

    /// Number of action columns.
    pub fn action_size(&self) -> usize {
        self.action_size
    }

    /// Flat row-major values.
    pub fn as_flat(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    fn offset(&self, state: usize, action: usize) -> usize {
        assert!(
            state < self.state_size && action < self.action_size,
            "q-table index ({state}, {action}) out of range for {}x{} table",
            self.state_size,
            self.action_size
        );
        state * self.action_size + action
    }

    /// Value of `(state, action)`.
    ///
    /// # Panics
    /// Panics if `state >= state_size` or `action >= action_size`.
    #[inline]
    pub fn get(&self, state: usize, action: usize) -> f64 {
        self.values[self.offset(state, action)]
    }

    /// Sets the value of `(state, action)`.
    ///
    /// # Panics
    /// Panics if `state >= state_size` or `action >= action_size`.
    #[inline]
    pub fn set(&mut self, state: usize, action: usize, value: f64) {
        let idx = self.offset(state, action);
        self.values[idx] = value;
    }

    /// Values of one state row.
    ///
    /// # Panics
    /// Panics if `state >= state_size`.
    pub fn row(&self, state: usize) -> &[f64] {
        assert!(
            state < self.state_size,
            "q-table row {state} out of range for {} rows",
            self.state_size
        );
        let start = state * self.action_size;
        &self.values[start..start + self.action_size]
    }

    /// Action with the highest value in a row. Ties go to the lowest index.
    ///
    /// Panics like [`row`](Self::row).
    pub fn best_action(&self, state: usize) -> usize {
        let mut best_action = 0;
        let mut best_q = f64::NEG_INFINITY;

        for (action, &q) in self.row(state).iter().enumerate() {
            if q > best_q {
                best_q = q;
                best_action = action;
            }
        }

        best_action
    }

    /// Highest value in a row. Panics like [`row`](Self::row).
    pub fn max_value(&self, state: usize) -> f64 {
        self.row(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Writes the flat values to `path` as a JSON array.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string(&self.values)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Reads a table of the given shape from a JSON array at `path`.
    pub fn load(path: impl AsRef<Path>, state_size: usize, action_size: usize) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let values: Vec<f64> = serde_json::from_str(&contents)?;
        Self::from_flat(state_size, action_size, values)
    }
}
