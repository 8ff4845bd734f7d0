mod train;
mod dqn;

pub use train::TrainConfig;
pub use dqn::DQN_Config;


pub trait OffPolicyConfig {
    fn replay_buffer_capacity(&self) -> usize;
    fn training_batch_size(&self) -> usize;
}
