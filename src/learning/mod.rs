//! Learned action selection with tabular Q-learning.
//!
//! A [`QLearner`] maps a coarse [`State`] of the department (staff still
//! available, patients waiting, ...) to one of a fixed number of actions.
//! It is trained offline on recorded [`Episode`]s and queried greedily
//! during a simulation run.
//!
//! # State Encoding
//!
//! States hash to a table row through a canonical, order-independent text
//! form (see [`State::index`]). The table has a fixed number of rows, so
//! distinct states may share a row; identical states always share one.

mod learner;
mod q_table;
mod state;

pub use learner::{Episode, LearningConfig, QLearner, Step, TrainReport};
pub use q_table::QTable;
pub use state::State;
