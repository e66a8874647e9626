//! Tabular Q-learning action selector.
//!
//! # Update Rule
//!
//! ```text
//! Q[s,a] ← (1 − α)·Q[s,a] + α·(r + γ·max_a' Q[s',a'])
//! ```
//!
//! One-step updates only: no eligibility traces, no experience replay.
//!
//! # Reference
//! Watkins & Dayan (1992), "Q-learning", Machine Learning 8:279–292

use std::path::Path;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{QTable, State};
use crate::error::{PlannerError, Result};

/// Hyperparameters and table dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Learning rate α ∈ [0, 1].
    pub learning_rate: f64,
    /// Discount factor γ ∈ [0, 1].
    pub discount_factor: f64,
    /// Exploration rate ε ∈ [0, 1].
    pub epsilon: f64,
    /// Number of state rows (> 0).
    pub state_size: usize,
    /// Number of actions (> 0).
    pub action_size: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.95,
            epsilon: 0.1,
            state_size: 1000,
            action_size: 10,
        }
    }
}

impl LearningConfig {
    /// Checks ranges.
    pub fn validate(&self) -> Result<()> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.learning_rate) {
            return Err(PlannerError::InvalidConfig(
                "learning_rate must be in [0, 1]".into(),
            ));
        }
        if !unit.contains(&self.discount_factor) {
            return Err(PlannerError::InvalidConfig(
                "discount_factor must be in [0, 1]".into(),
            ));
        }
        if !unit.contains(&self.epsilon) {
            return Err(PlannerError::InvalidConfig(
                "epsilon must be in [0, 1]".into(),
            ));
        }
        if self.state_size == 0 {
            return Err(PlannerError::InvalidConfig("state_size must be > 0".into()));
        }
        if self.action_size == 0 {
            return Err(PlannerError::InvalidConfig(
                "action_size must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// One observed transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub next_state: State,
    pub reward: f64,
}

/// A training episode: a start state and the transitions that followed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub initial_state: State,
    pub steps: Vec<Step>,
}

/// Summary of a training run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainReport {
    /// Episodes processed.
    pub episodes: usize,
    /// Table updates applied.
    pub total_steps: usize,
    /// Sum of rewards seen.
    pub total_reward: f64,
    /// Mean reward per episode.
    pub avg_reward: f64,
}

/// Q-learning agent owning its table and exploration RNG.
#[derive(Debug, Clone)]
pub struct QLearner {
    config: LearningConfig,
    table: QTable,
    rng: SmallRng,
}

impl QLearner {
    /// Creates a learner with a zeroed table and an OS-seeded RNG.
    pub fn new(config: LearningConfig) -> Result<Self> {
        config.validate()?;
        let table = QTable::zeros(config.state_size, config.action_size);
        Ok(Self {
            config,
            table,
            rng: SmallRng::from_os_rng(),
        })
    }

    /// Reseeds exploration for reproducible training.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// The learner's configuration.
    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    /// The value table.
    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// Mutable value table.
    pub fn table_mut(&mut self) -> &mut QTable {
        &mut self.table
    }

    /// Row index of a state.
    pub fn state_index(&self, state: &State) -> usize {
        state.index(self.config.state_size)
    }

    /// Greedy action for a state.
    pub fn predict(&self, state: &State) -> usize {
        self.table.best_action(self.state_index(state))
    }

    /// ε-greedy action for a state row.
    ///
    /// # Panics
    /// Panics if `state_index >= state_size`. Use [`state_index`](Self::state_index)
    /// to obtain a valid row.
    pub fn choose_action(&mut self, state_index: usize) -> usize {
        if self.rng.random::<f64>() < self.config.epsilon {
            return self.rng.random_range(0..self.config.action_size);
        }
        self.table.best_action(state_index)
    }

    /// Applies one Q-learning update and returns the new value.
    ///
    /// # Panics
    /// Panics if a state is not below `state_size` or `action` is not
    /// below `action_size`.
    pub fn update(&mut self, state: usize, action: usize, reward: f64, next_state: usize) -> f64 {
        let alpha = self.config.learning_rate;
        let gamma = self.config.discount_factor;

        let current_q = self.table.get(state, action);
        let max_next_q = self.table.max_value(next_state);
        let new_q = (1.0 - alpha) * current_q + alpha * (reward + gamma * max_next_q);

        self.table.set(state, action, new_q);
        new_q
    }

    /// Trains on recorded episodes.
    ///
    /// For each step an action is chosen ε-greedily from the current state,
    /// the step's reward and next state are applied through [`update`],
    /// and the current state advances to the next state.
    ///
    /// [`update`]: Self::update
    pub fn train(&mut self, episodes: &[Episode]) -> TrainReport {
        let mut report = TrainReport::default();

        for episode in episodes {
            let mut state = self.state_index(&episode.initial_state);

            for step in &episode.steps {
                let action = self.choose_action(state);
                let next_state = self.state_index(&step.next_state);
                let q = self.update(state, action, step.reward, next_state);
                debug!(state, action, reward = step.reward, q, "q update");

                report.total_steps += 1;
                report.total_reward += step.reward;
                state = next_state;
            }
            report.episodes += 1;
        }

        if report.episodes > 0 {
            report.avg_reward = report.total_reward / report.episodes as f64;
        }
        info!(
            episodes = report.episodes,
            steps = report.total_steps,
            avg_reward = report.avg_reward,
            "training finished"
        );
        report
    }

    /// Persists the table as a flat JSON array.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.table.save(path)
    }

    /// Replaces the table with one read from `path`.
    ///
    /// Fails if the stored table does not match this learner's dimensions.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.table = QTable::load(path, self.config.state_size, self.config.action_size)?;
        Ok(())
    }
}
