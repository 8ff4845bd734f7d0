use {
    crate::{
        envs::Scenario,
        RunMode,
    },
    serde::{
        Serialize,
        Deserialize,
    },
};


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    // The total number of episodes.
    max_episodes: usize,
    // The number of training iterations after one episode finishes.
    training_iterations: usize,
    // The size of the trailing window of episode scores.
    win_trials: usize,
    // Mean score over the trailing window at which the task counts as solved.
    win_reward: f64,
    // Whether the agent learns and explores.
    run_mode: RunMode,
}
impl Default for TrainConfig {
    fn default() -> Self {
        Self::for_scenario(Scenario::default())
    }
}
impl TrainConfig {
    pub fn new(
        max_episodes: usize,
        training_iterations: usize,
        win_trials: usize,
        win_reward: f64,
        run_mode: RunMode,
    ) -> Self {
        Self {
            max_episodes,
            training_iterations,
            win_trials,
            win_reward,
            run_mode,
        }
    }

    pub fn for_scenario(scenario: Scenario) -> Self {
        Self {
            max_episodes: 3000,
            training_iterations: 1,
            win_trials: 100,
            win_reward: scenario.win_reward(),
            run_mode: RunMode::Train,
        }
    }
}

impl TrainConfig {
    pub fn max_episodes(&self) -> usize {
        self.max_episodes
    }
    pub fn training_iterations(&self) -> usize {
        self.training_iterations
    }
    pub fn win_trials(&self) -> usize {
        self.win_trials
    }
    pub fn win_reward(&self) -> f64 {
        self.win_reward
    }
    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }
}
