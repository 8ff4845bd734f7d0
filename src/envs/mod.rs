mod cartpole;
mod scenario;

use {
    anyhow::Result,
    candle_core::{
        Device,
        Tensor,
    },
};

pub use crate::envs::{
    cartpole::{
        CartPoleConfig,
        CartPoleEnv,
        CartPoleObs,
    },
    scenario::Scenario,
};

pub trait TensorConvertible {
    fn from_tensor(value: Tensor) -> candle_core::Result<Self>
    where
        Self: Sized;
    fn to_tensor(
        value: Self,
        device: &Device,
    ) -> candle_core::Result<Tensor>;
}

/// The outcome of a single environment step.
///
/// The episode is over when either `terminated` (the environment reached a
/// terminal state) or `truncated` (the time limit was hit) is set.
#[derive(Debug)]
pub struct Step<O, A> {
    pub observation: O,
    pub action: A,
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
}
impl<O, A> Step<O, A> {
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

pub trait Environment {
    type Config;
    type Action;
    type Observation;

    fn config(&self) -> &Self::Config;
    fn new(config: Self::Config) -> Result<Box<Self>>;
    fn seed(
        &mut self,
        seed: u64,
    );
    fn reset(&mut self) -> Result<Self::Observation>;
    fn step(
        &mut self,
        action: Self::Action,
    ) -> Result<Step<Self::Observation, Self::Action>>;
    fn action_space(&self) -> usize;
    fn observation_space(&self) -> Vec<usize>;
    fn current_observation(&self) -> Self::Observation;
}
