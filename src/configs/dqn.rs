use {
    super::OffPolicyConfig,
    serde::{
        Serialize,
        Deserialize,
    },
};


#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DQN_Config {
    // The learning rate of the Q-network and its time-based decay per update.
    pub learning_rate: f64,
    pub learning_rate_decay: f64,
    // The impact of the q value of the next state on the current state's q value.
    pub gamma: f64,
    // The number of neurons in each hidden layer of the Q-network.
    pub hidden_sizes: Vec<usize>,
    // Exploration probability, its floor, and the decay per training step.
    pub epsilon: f64,
    pub epsilon_min: f64,
    pub epsilon_decay: f64,
    // The capacity of the replay buffer used for sampling training data.
    pub replay_buffer_capacity: usize,
    // The number of transitions replayed per training step.
    pub training_batch_size: usize,
    // Minibatch size and number of passes when fitting the Q-network to a replayed batch.
    pub fit_batch_size: usize,
    pub fit_epochs: usize,
    // Seed for action sampling and replay sampling. Unseeded when None.
    pub seed: Option<u64>,
}
impl Default for DQN_Config {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            learning_rate_decay: 1e-5,
            gamma: 0.9,
            hidden_sizes: vec![512, 256, 256],
            epsilon: 1.0,
            epsilon_min: 0.1,
            epsilon_decay: 0.999,
            replay_buffer_capacity: 128_000,
            training_batch_size: 128,
            fit_batch_size: 32,
            fit_epochs: 1,
            seed: None,
        }
    }
}
impl DQN_Config {
    pub fn cartpole() -> Self {
        Self::default()
    }
}

impl OffPolicyConfig for DQN_Config {
    fn replay_buffer_capacity(&self) -> usize {
        self.replay_buffer_capacity
    }
    fn training_batch_size(&self) -> usize {
        self.training_batch_size
    }
}
