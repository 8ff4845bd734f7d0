use {
    super::CartPoleConfig,
    strum::{
        Display,
        EnumIter,
        EnumString,
    },
};

/// The scenarios that can be selected on the command line.
///
/// Each scenario fixes the environment configuration as well as the mean
/// score over the trailing window at which the task counts as solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum Scenario {
    #[strum(serialize = "CartPole-v0")]
    CartPoleV0,
    #[strum(serialize = "CartPole-v1")]
    CartPoleV1,
}
impl Default for Scenario {
    fn default() -> Self {
        Self::CartPoleV0
    }
}
impl Scenario {
    pub fn win_reward(&self) -> f64 {
        match self {
            Self::CartPoleV0 => 195.0,
            Self::CartPoleV1 => 475.0,
        }
    }

    pub fn env_config(&self) -> CartPoleConfig {
        match self {
            Self::CartPoleV0 => CartPoleConfig::with_timelimit(200),
            Self::CartPoleV1 => CartPoleConfig::with_timelimit(500),
        }
    }
}


#[cfg(test)]
mod tests {
    use {
        super::*,
        std::str::FromStr,
        strum::IntoEnumIterator,
    };

    #[test]
    fn test_identifiers_roundtrip() {
        for scenario in Scenario::iter() {
            assert_eq!(Scenario::from_str(&scenario.to_string()).unwrap(), scenario);
        }
        assert_eq!(Scenario::default().to_string(), "CartPole-v0");
    }

    #[test]
    fn test_unknown_identifier() {
        assert!(Scenario::from_str("MountainCar-v0").is_err());
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(Scenario::CartPoleV0.win_reward(), 195.0);
        assert_eq!(Scenario::CartPoleV0.env_config().timelimit, 200);
        assert_eq!(Scenario::CartPoleV1.env_config().timelimit, 500);
    }
}
