use {
    super::{
        Environment,
        Step,
        TensorConvertible,
    },
    anyhow::{
        anyhow,
        Result,
    },
    candle_core::{
        Device,
        Tensor,
    },
    rand::{
        rngs::StdRng,
        Rng,
        SeedableRng,
    },
    serde::{
        Serialize,
        Deserialize,
    },
    tracing::{
        info,
        warn,
    },
};


/// Physical constants and episode settings for the [`CartPoleEnv`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartPoleConfig {
    pub gravity: f64,
    pub mass_cart: f64,
    pub mass_pole: f64,
    // Half the length of the pole
    pub length: f64,
    pub force_mag: f64,
    // Seconds between state updates
    pub tau: f64,
    // The episode terminates when the cart leaves [-x_threshold, x_threshold]
    pub x_threshold: f64,
    // ... or the pole angle leaves [-theta_threshold, theta_threshold]
    pub theta_threshold: f64,
    // Maximum number of steps before the episode is truncated
    pub timelimit: usize,
    pub seed: u64,
}
impl Default for CartPoleConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            mass_cart: 1.0,
            mass_pole: 0.1,
            length: 0.5,
            force_mag: 10.0,
            tau: 0.02,
            x_threshold: 2.4,
            theta_threshold: 12.0 * 2.0 * std::f64::consts::PI / 360.0,
            timelimit: 200,
            seed: 0,
        }
    }
}
impl CartPoleConfig {
    pub fn with_timelimit(timelimit: usize) -> Self {
        Self {
            timelimit,
            ..Default::default()
        }
    }
}


/// Cart position and velocity, pole angle and angular velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartPoleObs {
    pub x: f64,
    pub x_dot: f64,
    pub theta: f64,
    pub theta_dot: f64,
}
impl From<[f64; 4]> for CartPoleObs {
    fn from(value: [f64; 4]) -> Self {
        Self {
            x: value[0],
            x_dot: value[1],
            theta: value[2],
            theta_dot: value[3],
        }
    }
}
impl TensorConvertible for CartPoleObs {
    fn from_tensor(value: Tensor) -> candle_core::Result<Self> {
        let values = value.flatten_all()?.to_vec1::<f32>()?;
        if values.len() != 4 {
            candle_core::bail!("expected 4 values for a cart-pole observation, got {}", values.len())
        }
        Ok(Self::from([
            values[0] as f64,
            values[1] as f64,
            values[2] as f64,
            values[3] as f64,
        ]))
    }

    fn to_tensor(
        value: Self,
        device: &Device,
    ) -> candle_core::Result<Tensor> {
        Tensor::new(
            &[
                value.x as f32,
                value.x_dot as f32,
                value.theta as f32,
                value.theta_dot as f32,
            ],
            device,
        )
    }
}


/// The classic cart-pole balancing task.
///
/// A pole is attached by an unactuated joint to a cart moving along a
/// frictionless track. The agent pushes the cart left (action 0) or right
/// (action 1) and receives a reward of 1.0 for every step the pole stays
/// upright. Dynamics are integrated with the explicit Euler method.
pub struct CartPoleEnv {
    config: CartPoleConfig,
    state: CartPoleObs,
    timestep: usize,
    steps_beyond_terminated: Option<usize>,
    rng: StdRng,
}
impl CartPoleEnv {
    fn dynamics(
        &self,
        force: f64,
    ) -> CartPoleObs {
        let c = &self.config;
        let CartPoleObs { x, x_dot, theta, theta_dot } = self.state;

        let total_mass = c.mass_cart + c.mass_pole;
        let polemass_length = c.mass_pole * c.length;
        let (sin_theta, cos_theta) = theta.sin_cos();

        let temp = (force + polemass_length * theta_dot.powi(2) * sin_theta) / total_mass;
        let theta_acc = (c.gravity * sin_theta - cos_theta * temp)
            / (c.length * (4.0 / 3.0 - c.mass_pole * cos_theta.powi(2) / total_mass));
        let x_acc = temp - polemass_length * theta_acc * cos_theta / total_mass;

        CartPoleObs {
            x: x + c.tau * x_dot,
            x_dot: x_dot + c.tau * x_acc,
            theta: theta + c.tau * theta_dot,
            theta_dot: theta_dot + c.tau * theta_acc,
        }
    }

    fn out_of_bounds(&self) -> bool {
        self.state.x.abs() > self.config.x_threshold
            || self.state.theta.abs() > self.config.theta_threshold
    }
}

impl Environment for CartPoleEnv {
    type Config = CartPoleConfig;
    type Action = usize;
    type Observation = CartPoleObs;

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn new(config: Self::Config) -> Result<Box<Self>> {
        let rng = StdRng::seed_from_u64(config.seed);
        let mut env = Self {
            config,
            state: CartPoleObs::from([0.0; 4]),
            timestep: 0,
            steps_beyond_terminated: None,
            rng,
        };
        env.reset()?;
        Ok(Box::new(env))
    }

    fn seed(
        &mut self,
        seed: u64,
    ) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    fn reset(&mut self) -> Result<Self::Observation> {
        let mut sample = || self.rng.gen_range(-0.05..=0.05);
        self.state = CartPoleObs::from([sample(), sample(), sample(), sample()]);
        self.timestep = 0;
        self.steps_beyond_terminated = None;
        Ok(self.state)
    }

    fn step(
        &mut self,
        action: Self::Action,
    ) -> Result<Step<Self::Observation, Self::Action>> {
        let force = match action {
            0 => -self.config.force_mag,
            1 => self.config.force_mag,
            _ => Err(anyhow!("Invalid action {action}, expected 0 (left) or 1 (right)"))?,
        };

        let next_state = self.dynamics(force);
        info!(
            concat!(
                "\nCompute next step:",
                "\nS({:.3}, {:.3}, {:.3}, {:.3}) + A({}) --> S'({:.3}, {:.3}, {:.3}, {:.3})",
            ),
            self.state.x, self.state.x_dot, self.state.theta, self.state.theta_dot,
            action,
            next_state.x, next_state.x_dot, next_state.theta, next_state.theta_dot,
        );
        self.state = next_state;
        self.timestep += 1;

        let terminated = self.out_of_bounds();
        let reward = match (terminated, self.steps_beyond_terminated) {
            (false, _) => 1.0,
            // the pole just fell
            (true, None) => {
                self.steps_beyond_terminated = Some(0);
                1.0
            }
            (true, Some(steps)) => {
                if steps == 0 {
                    warn!(concat!(
                        "Calling step() after the episode has terminated. ",
                        "Call reset() once the step reports it is done.",
                    ));
                }
                self.steps_beyond_terminated = Some(steps + 1);
                0.0
            }
        };

        Ok(Step {
            observation: self.state,
            action,
            reward,
            terminated,
            truncated: !terminated && self.timestep >= self.config.timelimit,
        })
    }

    fn action_space(&self) -> usize {
        2
    }

    fn observation_space(&self) -> Vec<usize> {
        vec![4]
    }

    fn current_observation(&self) -> Self::Observation {
        self.state
    }
}
