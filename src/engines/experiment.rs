use {
    super::run::{
        loop_off_policy,
        TrainingOutcome,
    },
    crate::{
        agents::{
            Algorithm,
            OffPolicyAlgorithm,
        },
        configs::{
            OffPolicyConfig,
            TrainConfig,
        },
        envs::{
            Environment,
            Scenario,
            TensorConvertible,
        },
        util::write_config,
    },
    anyhow::Result,
    candle_core::Device,
    polars::prelude::{
        DataFrame,
        NamedFrom,
        ParquetWriter,
        Series,
    },
    serde::Serialize,
    std::{
        fs::{
            create_dir_all,
            remove_dir_all,
            File,
        },
        path::{
            Path,
            PathBuf,
        },
    },
    tracing::warn,
};


/// The directory that run artefacts of a scenario are written to.
pub fn output_dir(scenario: Scenario) -> PathBuf {
    std::env::temp_dir().join(format!("dqn-{scenario}"))
}

/// Create `path`, wiping whatever a previous run left there.
///
/// Returns whether previous run data was removed.
pub fn prepare_output_dir(path: &dyn AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    let overwritten = path.try_exists()?;
    if overwritten {
        remove_dir_all(path)?;
    }
    create_dir_all(path)?;
    Ok(overwritten)
}

/// Train an off-policy algorithm once and store the configs and the
/// per-episode statistics in `path`.
///
/// # Arguments
///
/// * `path` - The directory where the collected data will be stored.
/// * `env_config` - The configuration for the environment.
/// * `alg_config` - The configuration for the algorithm.
/// * `train_config` - The configuration for the training run.
/// * `device` - The device to run the experiment on.
pub fn run_experiment_off_policy<Alg, Env, Obs>(
    path: &dyn AsRef<Path>,
    env_config: Env::Config,
    alg_config: Alg::Config,
    train_config: TrainConfig,
    device: &Device,
) -> Result<TrainingOutcome>
where
    Env: Environment<Action = usize, Observation = Obs>,
    Env::Config: Serialize,
    Alg: Algorithm + OffPolicyAlgorithm,
    Alg::Config: OffPolicyConfig + Serialize,
    Obs: TensorConvertible,
{
    let path = path.as_ref();
    create_dir_all(path)?;
    write_config(&alg_config, path.join("config_algorithm.ron"))?;
    write_config(&env_config, path.join("config_environment.ron"))?;
    write_config(&train_config, path.join("config_training.ron"))?;

    // Create the Agent and the Environment

    let mut env = *Env::new(env_config)?;
    let mut alg = *Alg::from_config(
        device,
        &alg_config,
        env.observation_space().iter().product::<usize>(),
        env.action_space(),
    )?;

    // Train the Agent on the Environment

    let outcome = loop_off_policy(
        &mut env,
        &mut alg,
        &train_config,
        device,
    )?;

    if outcome.solved_at.is_none() {
        warn!(
            "Not solved after {} episodes, mean survival in the last {} episodes: {:.2}",
            outcome.episodes(),
            outcome.window_len,
            outcome.window_mean,
        );
    }

    // Write collected data to file

    write_episode_stats(&outcome, path.join("episode_stats.parquet"))?;
    Ok(outcome)
}

fn write_episode_stats(
    outcome: &TrainingOutcome,
    path: PathBuf,
) -> Result<()> {
    let episodes: Vec<u32> = (0..outcome.episodes() as u32).collect();
    let lengths: Vec<u32> = outcome.scores.iter().map(|&s| s as u32).collect();

    let mut df = DataFrame::new(vec![
        Series::new("episode", &episodes),
        Series::new("length", &lengths),
        Series::new("reward", &outcome.returns),
        Series::new("terminated", &outcome.terminated),
    ])?;

    ParquetWriter::new(File::create(path)?).finish(&mut df)?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_output_dir_wipes_previous_run() {
        let path = std::env::temp_dir().join(format!("dqn-prepare-test-{}", std::process::id()));
        let _ = remove_dir_all(&path);

        assert!(!prepare_output_dir(&path).unwrap());
        assert!(path.is_dir());

        let stale = path.join("stale");
        File::create(&stale).unwrap();
        assert!(prepare_output_dir(&path).unwrap());
        assert!(path.is_dir());
        assert!(!stale.exists());

        remove_dir_all(&path).unwrap();
    }

    #[test]
    fn test_output_dir_named_after_scenario() {
        assert!(output_dir(Scenario::CartPoleV1).ends_with("dqn-CartPole-v1"));
    }
}
