use {
    crate::configs::DQN_Config,
    candle_core::{
        DType,
        Device,
        Module,
        Result,
        Tensor,
    },
    candle_nn::{
        linear,
        loss,
        sequential::seq,
        Activation,
        AdamW,
        Optimizer,
        ParamsAdamW,
        Sequential,
        VarBuilder,
        VarMap,
    },
    rand::{
        rngs::StdRng,
        seq::SliceRandom,
        SeedableRng,
    },
    tracing::info,
};


/// A function approximator mapping a batch of states to per-action values.
pub trait QFunction {
    fn from_config(
        device: &Device,
        config: &DQN_Config,
        size_state: usize,
        n_actions: usize,
    ) -> Result<Self>
    where
        Self: Sized;

    fn n_actions(&self) -> usize;

    /// Value estimates of shape `[batch, n_actions]` for states of shape
    /// `[batch, size_state]`.
    fn predict(
        &self,
        states: &Tensor,
    ) -> Result<Tensor>;

    /// Fit the estimates for `states` towards `targets` for the given number
    /// of epochs, returning the mean loss of the last epoch.
    fn fit(
        &mut self,
        states: &Tensor,
        targets: &Tensor,
        epochs: usize,
    ) -> Result<f64>;
}


/// A feed-forward Q-network trained with mean squared error and Adam.
///
/// The learning rate follows a time-based decay,
/// `lr / (1 + decay * updates)`, where `updates` counts optimizer steps.
pub struct QNetwork {
    #[allow(dead_code)]
    varmap: VarMap,
    network: Sequential,
    optim: AdamW,
    learning_rate: f64,
    learning_rate_decay: f64,
    updates: usize,
    fit_batch_size: usize,
    n_actions: usize,
    device: Device,
    rng: StdRng,
}

impl QNetwork {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device: &Device,
        size_state: usize,
        hidden_sizes: &[usize],
        n_actions: usize,
        learning_rate: f64,
        learning_rate_decay: f64,
        fit_batch_size: usize,
        seed: Option<u64>,
    ) -> Result<Self> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);

        let mut network = seq();
        let mut in_dim = size_state;
        for (i, &out_dim) in hidden_sizes.iter().enumerate() {
            network = network
                .add(linear(in_dim, out_dim, vb.pp(format!("q-fc{i}")))?)
                .add(Activation::Relu);
            in_dim = out_dim;
        }
        network = network.add(linear(
            in_dim,
            n_actions,
            vb.pp(format!("q-fc{}", hidden_sizes.len())),
        )?);

        let optim = AdamW::new(
            varmap.all_vars(),
            ParamsAdamW {
                lr: learning_rate,
                weight_decay: 0.0,
                ..Default::default()
            },
        )?;

        info!(
            "Built Q-network {size_state} -> {hidden_sizes:?} -> {n_actions} with {} parameter tensors",
            varmap.all_vars().len(),
        );

        Ok(Self {
            varmap,
            network,
            optim,
            learning_rate,
            learning_rate_decay,
            updates: 0,
            fit_batch_size: fit_batch_size.max(1),
            n_actions,
            device: device.clone(),
            rng: match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            },
        })
    }

    pub fn updates(&self) -> usize {
        self.updates
    }

    pub fn current_learning_rate(&self) -> f64 {
        self.learning_rate / (1.0 + self.learning_rate_decay * self.updates as f64)
    }
}

impl QFunction for QNetwork {
    fn from_config(
        device: &Device,
        config: &DQN_Config,
        size_state: usize,
        n_actions: usize,
    ) -> Result<Self> {
        Self::new(
            device,
            size_state,
            &config.hidden_sizes,
            n_actions,
            config.learning_rate,
            config.learning_rate_decay,
            config.fit_batch_size,
            config.seed,
        )
    }

    fn n_actions(&self) -> usize {
        self.n_actions
    }

    fn predict(
        &self,
        states: &Tensor,
    ) -> Result<Tensor> {
        self.network.forward(&states.to_dtype(DType::F32)?)
    }

    fn fit(
        &mut self,
        states: &Tensor,
        targets: &Tensor,
        epochs: usize,
    ) -> Result<f64> {
        let states = states.to_dtype(DType::F32)?;
        let targets = targets.to_dtype(DType::F32)?;
        let n_samples = states.dim(0)?;

        let mut epoch_loss = 0.0;
        for _ in 0..epochs {
            let mut order: Vec<u32> = (0..n_samples as u32).collect();
            order.shuffle(&mut self.rng);

            let mut total_loss = 0.0;
            let mut n_batches = 0;
            for chunk in order.chunks(self.fit_batch_size) {
                let idx = Tensor::new(chunk, &self.device)?;
                let xs = states.index_select(&idx, 0)?;
                let ys = targets.index_select(&idx, 0)?;

                let loss = loss::mse(&self.network.forward(&xs)?, &ys)?;
                self.optim.set_learning_rate(self.current_learning_rate());
                self.optim.backward_step(&loss)?;
                self.updates += 1;

                total_loss += loss.to_scalar::<f32>()? as f64;
                n_batches += 1;
            }
            epoch_loss = if n_batches > 0 { total_loss / n_batches as f64 } else { 0.0 };
        }
        Ok(epoch_loss)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn small_network() -> QNetwork {
        QNetwork::new(&Device::Cpu, 4, &[16, 16], 2, 1e-2, 1e-5, 32, Some(0)).unwrap()
    }

    #[test]
    fn test_predict_shape() {
        let q = small_network();
        let states = Tensor::zeros((5, 4), DType::F32, &Device::Cpu).unwrap();
        assert_eq!(q.predict(&states).unwrap().dims(), &[5, 2]);
    }

    /// One epoch over 128 samples with minibatches of 32 is four updates.
    #[test]
    fn test_fit_counts_minibatch_updates() {
        let mut q = small_network();
        let states = Tensor::randn(0f32, 1.0, (128, 4), &Device::Cpu).unwrap();
        let targets = Tensor::ones((128, 2), DType::F32, &Device::Cpu).unwrap();
        q.fit(&states, &targets, 1).unwrap();
        assert_eq!(q.updates(), 4);
        assert!(q.current_learning_rate() < 1e-2);
    }

    #[test]
    fn test_fit_reduces_loss() {
        let mut q = small_network();
        let states = Tensor::randn(0f32, 1.0, (64, 4), &Device::Cpu).unwrap();
        let targets = Tensor::ones((64, 2), DType::F32, &Device::Cpu).unwrap();
        let first = q.fit(&states, &targets, 1).unwrap();
        let last = q.fit(&states, &targets, 50).unwrap();
        assert!(last < first, "loss went from {first} to {last}");
    }
}
