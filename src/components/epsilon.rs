use {
    rand::{
        Rng,
        RngCore,
    },
};

/// The exploration probability of an epsilon-greedy policy.
///
/// Epsilon decays geometrically towards a floor, once per training step.
#[derive(Debug, Clone, PartialEq)]
pub struct EpsilonGreedy {
    epsilon: f64,
    epsilon_min: f64,
    epsilon_decay: f64,
}
impl EpsilonGreedy {
    pub fn new(
        epsilon: f64,
        epsilon_min: f64,
        epsilon_decay: f64,
    ) -> Self {
        debug_assert!((0.0..=1.0).contains(&epsilon));
        debug_assert!(epsilon_decay > 0.0 && epsilon_decay <= 1.0);
        Self {
            epsilon,
            epsilon_min,
            epsilon_decay,
        }
    }

    pub fn value(&self) -> f64 {
        self.epsilon
    }

    pub fn set_value(
        &mut self,
        epsilon: f64,
    ) {
        self.epsilon = epsilon;
    }

    /// Decay epsilon by one step, never going below the floor.
    pub fn decay(&mut self) {
        if self.epsilon > self.epsilon_min {
            self.epsilon = (self.epsilon * self.epsilon_decay).max(self.epsilon_min);
        }
    }

    /// Whether to take a random action this time.
    pub fn explore(
        &self,
        rng: &mut dyn RngCore,
    ) -> bool {
        self.epsilon > 0.0 && rng.gen::<f64>() < self.epsilon
    }
}


#[cfg(test)]
mod tests {
    use {
        super::*,
        rand::{
            rngs::StdRng,
            SeedableRng,
        },
    };

    #[test]
    fn test_decay_matches_closed_form() {
        let mut epsilon = EpsilonGreedy::new(1.0, 0.1, 0.999);
        for k in 1..=5000 {
            epsilon.decay();
            let expected = (0.999_f64.powi(k)).max(0.1);
            assert!((epsilon.value() - expected).abs() < 1e-9, "step {k}");
        }
        assert_eq!(epsilon.value(), 0.1);
    }

    #[test]
    fn test_decay_below_floor_is_noop() {
        let mut epsilon = EpsilonGreedy::new(0.05, 0.1, 0.5);
        epsilon.decay();
        assert_eq!(epsilon.value(), 0.05);
    }

    #[test]
    fn test_explore_extremes() {
        let mut rng = StdRng::seed_from_u64(3);
        let never = EpsilonGreedy::new(0.0, 0.0, 1.0);
        let always = EpsilonGreedy::new(1.0, 0.1, 0.999);
        for _ in 0..1000 {
            assert!(!never.explore(&mut rng));
            assert!(always.explore(&mut rng));
        }
    }
}
