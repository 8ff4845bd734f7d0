use {
    crate::{
        agents::{
            Algorithm,
            OffPolicyAlgorithm,
        },
        components::ScoreWindow,
        configs::{
            OffPolicyConfig,
            TrainConfig,
        },
        envs::{
            Environment,
            TensorConvertible,
        },
        RunMode,
    },
    anyhow::Result,
    candle_core::Device,
    tracing::{
        info,
        warn,
    },
};


/// What happened during a call to [`loop_off_policy`].
#[derive(Debug, Clone, Default)]
pub struct TrainingOutcome {
    // Number of steps survived, per episode.
    pub scores: Vec<f64>,
    // Sum of rewards, per episode.
    pub returns: Vec<f64>,
    // Whether the episode ended in a terminal state rather than the time limit.
    pub terminated: Vec<bool>,
    // The episode after which the task counted as solved.
    pub solved_at: Option<usize>,
    // Size of the trailing score window at the end.
    pub window_len: usize,
    // Mean of the trailing score window at the end.
    pub window_mean: f64,
}
impl TrainingOutcome {
    pub fn episodes(&self) -> usize {
        self.scores.len()
    }
}

/// Train a single run on an environment with an off-policy algorithm.
///
/// Each episode runs until the environment reports it is done, recording
/// every transition. The number of steps taken is the episode's score. After
/// an episode, the agent trains if its memory holds at least one batch.
///
/// Training stops early once the mean score over the trailing window reaches
/// the configured threshold, provided at least a full window of episodes has
/// elapsed.
///
/// # Arguments
///
/// * `env` - The environment to train on.
/// * `alg` - The agent to train with.
/// * `config` - The configuration for the training run.
/// * `device` - The device to run on.
pub fn loop_off_policy<Alg, Env, Obs>(
    env: &mut Env,
    alg: &mut Alg,
    config: &TrainConfig,
    device: &Device,
) -> Result<TrainingOutcome>
where
    Env: Environment<Action = usize, Observation = Obs>,
    Alg: Algorithm + OffPolicyAlgorithm,
    Alg::Config: OffPolicyConfig,
    Obs: TensorConvertible,
{
    warn!("action space: {:?}", env.action_space());
    warn!("observation space: {:?}", env.observation_space());

    let batch_size = alg.config().training_batch_size();
    let win_trials = config.win_trials().max(1);
    let mut window = ScoreWindow::new(win_trials);
    let mut outcome = TrainingOutcome::default();

    for episode in 0..config.max_episodes() {
        let mut state = <Obs>::to_tensor(env.reset()?, device)?;
        let mut ticks = 0;
        let mut total_reward = 0.0;
        let mut terminated = false;

        let mut done = false;
        while !done {
            let action = alg.actions(&state, config.run_mode())?;
            let step = env.step(action)?;
            let next_state = <Obs>::to_tensor(step.observation, device)?;

            done = step.terminated || step.truncated;
            terminated = step.terminated;
            alg.remember(&state, action, step.reward, &next_state, done);

            state = next_state;
            total_reward += step.reward;
            ticks += 1;
        }

        info!("episode {episode} lasted {ticks} steps with total reward of {total_reward}");
        window.push(ticks as f64);
        outcome.scores.push(ticks as f64);
        outcome.returns.push(total_reward);
        outcome.terminated.push(terminated);

        let mean_score = window.mean();
        if mean_score >= config.win_reward() && episode >= win_trials {
            warn!("Solved after {episode} episodes");
            outcome.solved_at = Some(episode);
            break;
        }
        if episode % win_trials == 0 {
            warn!("Episode {episode}: Mean survival in the last {win_trials} episodes: {mean_score:.2}");
        }

        if let RunMode::Train = config.run_mode() {
            if alg.replay_buffer().len() >= batch_size {
                for _ in 0..config.training_iterations() {
                    alg.train()?;
                }
            }
        }
    }

    outcome.window_len = window.len();
    outcome.window_mean = window.mean();
    Ok(outcome)
}
