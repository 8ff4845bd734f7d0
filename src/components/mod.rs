//! # Components
//!
//! This module contains the components that are used to build the agent and
//! the training loop.
//!
//! ## Replay Buffer
//!
//! The [`ReplayBuffer`] struct implements a bounded memory of transitions,
//! which is sampled from during experience replay in the
//! [`crate::agents::DQN`] algorithm.
//!
//! ## Exploration
//!
//! The [`EpsilonGreedy`] struct holds the decaying exploration probability of
//! an epsilon-greedy policy.
//!
//! ## Score Window
//!
//! The [`ScoreWindow`] struct keeps the scores of the most recent episodes to
//! decide when a task is solved.

mod epsilon;
mod replay_buffer;
mod score_window;

pub use epsilon::EpsilonGreedy;
pub use replay_buffer::{
    Batch,
    ReplayBuffer,
    Transition,
};
pub use score_window::ScoreWindow;
