mod dqn;
mod qnetwork;

pub use dqn::{
    argmax,
    correct_q_values,
    td_target,
    DQN,
};
pub use qnetwork::{
    QFunction,
    QNetwork,
};


use {
    crate::{
        components::ReplayBuffer,
        RunMode,
    },
    candle_core::{
        Device,
        Result,
        Tensor,
    },
};


pub trait Algorithm {
    type Config;

    fn config(&self) -> &Self::Config;
    fn from_config(
        device: &Device,
        config: &Self::Config,
        size_state: usize,
        size_action: usize,
    ) -> Result<Box<Self>>;

    fn actions(
        &mut self,
        state: &Tensor,
        mode: RunMode,
    ) -> Result<usize>;

    fn train(&mut self) -> Result<()>;
}

pub trait OffPolicyAlgorithm: Algorithm {
    fn remember(
        &mut self,
        state: &Tensor,
        action: usize,
        reward: f64,
        next_state: &Tensor,
        done: bool,
    );

    fn replay_buffer(&self) -> &ReplayBuffer;
}
