pub mod logging;
pub mod util;

pub mod envs;
pub mod components;
pub mod configs;
pub mod agents;
pub mod engines;

pub mod cli;


use {
    serde::{
        Serialize,
        Deserialize,
    },
    std::fmt::Display,
};


/// The execution mode of an agent is either training or testing.
///
/// Only a training agent explores and learns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    Train,
    Test,
}

impl Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::Train => write!(f, "Train"),
            RunMode::Test => write!(f, "Test"),
        }
    }
}
