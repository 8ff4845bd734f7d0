use {
    candle_core::{
        Result,
        Tensor,
    },
    rand::{
        seq::index,
        RngCore,
    },
    std::collections::VecDeque,
    unzip_n::unzip_n,
};

unzip_n!(5);

/// A transition in the replay buffer.
///
/// # Fields
///
/// * `state` - The state tensor.
/// * `action` - The index of the action taken in `state`.
/// * `reward` - The reward received for taking `action`.
/// * `next_state` - The state tensor after taking `action`.
/// * `done` - Whether the episode ended with this transition.
#[derive(Clone, Debug)]
pub struct Transition {
    state: Tensor,
    action: usize,
    reward: f64,
    next_state: Tensor,
    done: bool,
}
impl Transition {
    pub fn new(
        state: &Tensor,
        action: usize,
        reward: f64,
        next_state: &Tensor,
        done: bool,
    ) -> Self {
        Self {
            state: state.clone(),
            action,
            reward,
            next_state: next_state.clone(),
            done,
        }
    }

    pub fn state(&self) -> &Tensor {
        &self.state
    }
    pub fn action(&self) -> usize {
        self.action
    }
    pub fn reward(&self) -> f64 {
        self.reward
    }
    pub fn next_state(&self) -> &Tensor {
        &self.next_state
    }
    pub fn done(&self) -> bool {
        self.done
    }
}

/// A batch of transitions, with the states stacked along a new leading
/// batch dimension.
pub struct Batch {
    pub states: Tensor,
    pub actions: Vec<usize>,
    pub rewards: Vec<f64>,
    pub next_states: Tensor,
    pub dones: Vec<bool>,
}
impl Batch {
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// A bounded first-in-first-out memory of transitions.
///
/// The replay buffer is implemented as a simple ring buffer / VecDeque.
///
/// # Fields
///
/// * `buffer` - The buffer of transitions, oldest first.
/// * `capacity` - The capacity of the buffer.
#[derive(Clone)]
pub struct ReplayBuffer {
    buffer: VecDeque<Transition>,
    capacity: usize,
}
impl ReplayBuffer {
    /// Create a new replay buffer with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity.min(1 << 16)),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check if the buffer is full.
    pub fn is_full(&self) -> bool {
        self.buffer.len() == self.capacity
    }

    /// Iterate over the stored transitions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }

    /// Record a transition.
    ///
    /// If the buffer is full, the oldest transition is removed to make room for
    /// the new transition.
    pub fn record(
        &mut self,
        transition: Transition,
    ) {
        if self.capacity == 0 {
            return;
        }
        if self.is_full() {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Push a transition into the buffer, see [`ReplayBuffer::record`].
    pub fn push(
        &mut self,
        state: &Tensor,
        action: usize,
        reward: f64,
        next_state: &Tensor,
        done: bool,
    ) {
        self.record(Transition::new(state, action, reward, next_state, done))
    }

    /// Sample `n` distinct transitions uniformly at random.
    ///
    /// Returns `None` when fewer than `n` transitions are stored.
    pub fn sample(
        &self,
        rng: &mut dyn RngCore,
        n: usize,
    ) -> Option<Vec<&Transition>> {
        if n > self.buffer.len() {
            return None;
        }
        Some(
            index::sample(rng, self.buffer.len(), n)
                .into_iter()
                .map(|i| &self.buffer[i])
                .collect()
        )
    }

    /// Sample a random batch of transitions from the buffer.
    ///
    /// When the size of the buffer is less than the batch size, `None` is returned.
    pub fn random_batch(
        &self,
        rng: &mut dyn RngCore,
        batch_size: usize,
    ) -> Result<Option<Batch>> {
        let transitions = match self.sample(rng, batch_size) {
            Some(transitions) if !transitions.is_empty() => transitions,
            _ => return Ok(None),
        };

        let (states, actions, rewards, next_states, dones) = transitions
            .into_iter()
            .map(|t| (t.state.clone(), t.action, t.reward, t.next_state.clone(), t.done))
            .unzip_n_vec();

        Ok(Some(Batch {
            states: Tensor::stack(&states, 0)?,
            actions,
            rewards,
            next_states: Tensor::stack(&next_states, 0)?,
            dones,
        }))
    }
}
