use {
    crate::{
        agents::DQN,
        configs::{
            DQN_Config,
            TrainConfig,
        },
        engines::{
            output_dir,
            prepare_output_dir,
            run_experiment_off_policy,
        },
        envs::{
            CartPoleEnv,
            Scenario,
        },
        logging::setup_logging,
        util::read_config,
    },
    anyhow::Result,
    candle_core::Device,
    clap::{
        Parser,
        ValueEnum,
    },
    std::path::PathBuf,
    tracing::{
        warn,
        Level,
    },
};


#[derive(ValueEnum, Debug, Clone)]
pub enum Loglevel {
    Error, // put these only during active debugging and then downgrade later
    Warn,  // main events in the program
    Info,  // all the little details
    None,  // don't log anything
}
impl Loglevel {
    pub fn level(&self) -> Option<Level> {
        match self {
            Loglevel::Error => Some(Level::ERROR),
            Loglevel::Warn => Some(Level::WARN),
            Loglevel::Info => Some(Level::INFO),
            Loglevel::None => None,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Select the environment to run.
    #[arg(default_value_t = Scenario::CartPoleV0)]
    pub env_id: Scenario,

    /// Setup logging
    #[arg(long, value_enum, default_value_t = Loglevel::Warn)]
    pub log: Loglevel,

    /// RON file with the algorithm config to use instead of the defaults.
    #[arg(long)]
    pub alg_config: Option<PathBuf>,

    /// RON file with the training config to use instead of the defaults.
    #[arg(long)]
    pub train_config: Option<PathBuf>,
}

impl Args {
    /// The algorithm and training configs, read from the given files or
    /// defaulted for the selected scenario.
    pub fn configs(&self) -> Result<(DQN_Config, TrainConfig)> {
        let alg_config = match &self.alg_config {
            Some(file) => read_config(file)?,
            None => DQN_Config::cartpole(),
        };
        let train_config = match &self.train_config {
            Some(file) => read_config(file)?,
            None => TrainConfig::for_scenario(self.env_id),
        };
        Ok((alg_config, train_config))
    }
}

/// Set up the output directory and logging, then train a DQN agent on the
/// selected scenario.
pub fn run(args: Args) -> Result<()> {
    let path = output_dir(args.env_id);
    let overwritten = prepare_output_dir(&path)?;
    setup_logging(
        &path.join("debug.log"),
        args.log.level(),
        args.log.level(),
    )?;
    if overwritten {
        warn!("Overwrote previous run data in {}", path.display());
    }

    let (alg_config, train_config) = args.configs()?;

    warn!("Training on {} with output in {}", args.env_id, path.display());
    run_experiment_off_policy::<DQN, CartPoleEnv, _>(
        &path,
        args.env_id.env_config(),
        alg_config,
        train_config,
        &Device::Cpu,
    )?;
    Ok(())
}
