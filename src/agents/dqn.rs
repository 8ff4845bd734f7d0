use {
    super::{
        qnetwork::{
            QFunction,
            QNetwork,
        },
        Algorithm,
        OffPolicyAlgorithm,
    },
    crate::{
        components::{
            EpsilonGreedy,
            ReplayBuffer,
        },
        configs::DQN_Config,
        RunMode,
    },
    candle_core::{
        Device,
        Result,
        Tensor,
    },
    rand::{
        rngs::StdRng,
        Rng,
        SeedableRng,
    },
    tracing::info,
};


/// Index of the largest value, the first one wins on ties.
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate() {
        if value > values[best] {
            best = i;
        }
    }
    best
}

/// The one-step Bellman target for a transition.
pub fn td_target(
    reward: f64,
    done: bool,
    gamma: f64,
    max_next_q: f64,
) -> f64 {
    if done {
        reward
    } else {
        reward + gamma * max_next_q
    }
}

/// Overwrite the estimate of the taken action in each row of `q_values` with
/// its TD target. The other actions keep their current estimate so they do
/// not contribute to the loss.
pub fn correct_q_values(
    q_values: &mut [Vec<f32>],
    next_q_values: &[Vec<f32>],
    actions: &[usize],
    rewards: &[f64],
    dones: &[bool],
    gamma: f64,
) {
    for (i, row) in q_values.iter_mut().enumerate() {
        let max_next_q = next_q_values[i]
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max);
        row[actions[i]] = td_target(rewards[i], dones[i], gamma, max_next_q as f64) as f32;
    }
}


/// A Deep Q-Network agent with experience replay.
///
/// The same approximator provides the current estimates and the next-state
/// values of the Bellman targets, there is no separate target network.
#[allow(clippy::upper_case_acronyms)]
pub struct DQN<Q: QFunction = QNetwork> {
    config: DQN_Config,
    q_network: Q,
    replay_buffer: ReplayBuffer,
    epsilon: EpsilonGreedy,
    gamma: f64,
    batch_size: usize,
    fit_epochs: usize,
    size_action: usize,
    rng: StdRng,
}

impl<Q: QFunction> DQN<Q> {
    pub fn new(
        q_network: Q,
        config: &DQN_Config,
    ) -> Self {
        Self {
            config: config.clone(),
            size_action: q_network.n_actions(),
            q_network,
            replay_buffer: ReplayBuffer::new(config.replay_buffer_capacity),
            epsilon: EpsilonGreedy::new(
                config.epsilon,
                config.epsilon_min,
                config.epsilon_decay,
            ),
            gamma: config.gamma,
            batch_size: config.training_batch_size,
            fit_epochs: config.fit_epochs,
            rng: match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            },
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon.value()
    }

    pub fn set_epsilon(
        &mut self,
        epsilon: f64,
    ) {
        self.epsilon.set_value(epsilon)
    }

    pub fn q_network(&self) -> &Q {
        &self.q_network
    }

    /// Value estimates for a single state.
    pub fn q_values(
        &self,
        state: &Tensor,
    ) -> Result<Vec<f32>> {
        // Candle assumes a batch dimension, so when we don't have one we need
        // to pretend we do by un- and resqueezing the state tensor.
        self.q_network
            .predict(&state.unsqueeze(0)?)?
            .squeeze(0)?
            .to_vec1::<f32>()
    }

    /// Replay a random batch from memory and fit the Q-network to the
    /// corrected estimates, then decay epsilon.
    ///
    /// Does nothing while the memory holds less than one batch.
    pub fn replay(
        &mut self,
        batch_size: usize,
    ) -> Result<()> {
        let batch = match self.replay_buffer.random_batch(&mut self.rng, batch_size)? {
            Some(batch) => batch,
            None => return Ok(()),
        };

        let mut q_values = self.q_network.predict(&batch.states)?.to_vec2::<f32>()?;
        let next_q_values = self.q_network.predict(&batch.next_states)?.to_vec2::<f32>()?;
        correct_q_values(
            &mut q_values,
            &next_q_values,
            &batch.actions,
            &batch.rewards,
            &batch.dones,
            self.gamma,
        );

        let targets = Tensor::from_vec(
            q_values.into_iter().flatten().collect::<Vec<f32>>(),
            (batch.len(), self.size_action),
            batch.states.device(),
        )?;
        let loss = self.q_network.fit(&batch.states, &targets, self.fit_epochs)?;

        self.epsilon.decay();
        info!(
            "Replayed {} transitions, loss {loss:.5}, epsilon {:.4}",
            batch.len(),
            self.epsilon.value(),
        );
        Ok(())
    }
}

impl<Q: QFunction> Algorithm for DQN<Q> {
    type Config = DQN_Config;

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn from_config(
        device: &Device,
        config: &DQN_Config,
        size_state: usize,
        size_action: usize,
    ) -> Result<Box<Self>> {
        let q_network = Q::from_config(device, config, size_state, size_action)?;
        Ok(Box::new(Self::new(q_network, config)))
    }

    fn actions(
        &mut self,
        state: &Tensor,
        mode: RunMode,
    ) -> Result<usize> {
        if let RunMode::Train = mode {
            if self.epsilon.explore(&mut self.rng) {
                return Ok(self.rng.gen_range(0..self.size_action));
            }
        }
        Ok(argmax(&self.q_values(state)?))
    }

    fn train(&mut self) -> Result<()> {
        self.replay(self.batch_size)
    }
}

impl<Q: QFunction> OffPolicyAlgorithm for DQN<Q> {
    fn remember(
        &mut self,
        state: &Tensor,
        action: usize,
        reward: f64,
        next_state: &Tensor,
        done: bool,
    ) {
        info!(
            concat!(
                "\nPushing to replay buffer:",
                "\n{state:?}",
                "\n{action:?}",
                "\n{reward:?}",
                "\n{next_state:?}",
                "\n{done:?}",
            ),
            state = state,
            action = action,
            reward = reward,
            next_state = next_state,
            done = done,
        );
        self.replay_buffer.push(state, action, reward, next_state, done)
    }

    fn replay_buffer(&self) -> &ReplayBuffer {
        &self.replay_buffer
    }
}


#[cfg(test)]
mod tests {
    use {
        super::*,
        candle_core::DType,
    };

    /// Returns the same values for every state and records how often it was fit.
    struct ConstantQ {
        values: Vec<f32>,
        fits: usize,
    }
    impl QFunction for ConstantQ {
        fn from_config(
            _device: &Device,
            _config: &DQN_Config,
            _size_state: usize,
            n_actions: usize,
        ) -> Result<Self> {
            Ok(Self { values: vec![0.0; n_actions], fits: 0 })
        }
        fn n_actions(&self) -> usize {
            self.values.len()
        }
        fn predict(
            &self,
            states: &Tensor,
        ) -> Result<Tensor> {
            let n = states.dim(0)?;
            Tensor::new(self.values.as_slice(), states.device())?
                .unsqueeze(0)?
                .broadcast_as((n, self.values.len()))?
                .contiguous()
        }
        fn fit(
            &mut self,
            _states: &Tensor,
            _targets: &Tensor,
            _epochs: usize,
        ) -> Result<f64> {
            self.fits += 1;
            Ok(0.0)
        }
    }

    fn config() -> DQN_Config {
        DQN_Config {
            training_batch_size: 4,
            replay_buffer_capacity: 16,
            seed: Some(42),
            ..Default::default()
        }
    }

    fn state(v: f32) -> Tensor {
        Tensor::new(&[v, v, v, v], &Device::Cpu).unwrap()
    }

    #[test]
    fn test_argmax_first_occurrence() {
        assert_eq!(argmax(&[1.0, 1.0]), 0);
        assert_eq!(argmax(&[0.0, 2.0, 2.0]), 1);
        assert_eq!(argmax(&[3.0, -1.0, 2.0]), 0);
        assert_eq!(argmax(&[-5.0, -1.0]), 1);
    }

    #[test]
    fn test_td_target_terminal_is_reward() {
        for max_next_q in [-100.0, 0.0, 3.5, 1e6] {
            assert_eq!(td_target(1.0, true, 0.9, max_next_q), 1.0);
        }
    }

    #[test]
    fn test_td_target_non_terminal() {
        assert_eq!(td_target(1.0, false, 0.9, 10.0), 1.0 + 0.9 * 10.0);
        assert_eq!(td_target(0.5, false, 0.5, -2.0), 0.5 - 1.0);
    }

    #[test]
    fn test_correction_only_touches_taken_action() {
        let mut q_values = vec![vec![0.1, 0.2], vec![0.3, 0.4]];
        let next_q_values = vec![vec![1.0, 2.0], vec![5.0, 4.0]];
        correct_q_values(
            &mut q_values,
            &next_q_values,
            &[1, 0],
            &[1.0, 1.0],
            &[false, true],
            0.9,
        );
        assert_eq!(q_values[0], vec![0.1, (1.0 + 0.9 * 2.0) as f32]);
        assert_eq!(q_values[1], vec![1.0, 0.4]);
    }

    #[test]
    fn test_greedy_tie_breaks_to_first_action() {
        let q = ConstantQ { values: vec![0.5, 0.5], fits: 0 };
        let mut agent = DQN::new(q, &config());
        agent.set_epsilon(0.0);
        for i in 0..100 {
            assert_eq!(agent.actions(&state(i as f32), RunMode::Train).unwrap(), 0);
        }
    }

    #[test]
    fn test_test_mode_never_explores() {
        let q = ConstantQ { values: vec![0.0, 1.0], fits: 0 };
        let mut agent = DQN::new(q, &config());
        assert_eq!(agent.epsilon(), 1.0);
        for _ in 0..100 {
            assert_eq!(agent.actions(&state(0.0), RunMode::Test).unwrap(), 1);
        }
    }

    #[test]
    fn test_exploration_covers_all_actions() {
        let q = ConstantQ { values: vec![0.0, 0.0, 1.0], fits: 0 };
        let mut agent = DQN::new(q, &config());
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[agent.actions(&state(0.0), RunMode::Train).unwrap()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_replay_needs_a_full_batch() {
        let q = ConstantQ { values: vec![0.0, 0.0], fits: 0 };
        let mut agent = DQN::new(q, &config());
        for i in 0..3 {
            agent.remember(&state(i as f32), 0, 1.0, &state(i as f32 + 1.0), false);
        }
        agent.replay(4).unwrap();
        assert_eq!(agent.q_network().fits, 0);
        assert_eq!(agent.epsilon(), 1.0);

        agent.remember(&state(3.0), 1, 1.0, &state(4.0), true);
        agent.replay(4).unwrap();
        assert_eq!(agent.q_network().fits, 1);
        assert!((agent.epsilon() - 0.999).abs() < 1e-12);
    }

    /// Fit targets reach the approximator with the taken action corrected.
    #[test]
    fn test_replay_fits_corrected_targets() {
        struct Recording {
            targets: Vec<Vec<f32>>,
            ids: Vec<f32>,
        }
        impl QFunction for Recording {
            fn from_config(
                _device: &Device,
                _config: &DQN_Config,
                _size_state: usize,
                _n_actions: usize,
            ) -> Result<Self> {
                Ok(Self { targets: vec![], ids: vec![] })
            }
            fn n_actions(&self) -> usize {
                2
            }
            fn predict(
                &self,
                states: &Tensor,
            ) -> Result<Tensor> {
                Tensor::ones((states.dim(0)?, 2), DType::F32, states.device())
            }
            fn fit(
                &mut self,
                states: &Tensor,
                targets: &Tensor,
                _epochs: usize,
            ) -> Result<f64> {
                self.targets = targets.to_vec2::<f32>()?;
                self.ids = states.to_vec2::<f32>()?.iter().map(|row| row[0]).collect();
                Ok(0.0)
            }
        }

        let q = Recording { targets: vec![], ids: vec![] };
        let mut agent = DQN::new(q, &config());
        // the state encodes which action was taken and whether it was terminal
        agent.remember(&state(0.0), 0, 1.0, &state(9.0), false);
        agent.remember(&state(1.0), 1, 1.0, &state(9.0), false);
        agent.remember(&state(2.0), 0, 5.0, &state(9.0), true);
        agent.remember(&state(3.0), 1, 5.0, &state(9.0), true);
        agent.replay(4).unwrap();

        let bellman = (1.0 + 0.9 * 1.0) as f32;
        let q = agent.q_network();
        assert_eq!(q.targets.len(), 4);
        for (id, row) in q.ids.iter().zip(q.targets.iter()) {
            let expected = match *id as usize {
                0 => vec![bellman, 1.0],
                1 => vec![1.0, bellman],
                2 => vec![5.0, 1.0],
                _ => vec![1.0, 5.0],
            };
            assert_eq!(row, &expected);
        }
    }
}
