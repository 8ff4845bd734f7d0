use {
    anyhow::Result,
    serde::{
        de::DeserializeOwned,
        Serialize,
    },
    std::{
        fs::{
            self,
            File,
        },
        io::Write,
        path::Path,
    },
};


/// Write a config to `path` as pretty-printed RON.
pub fn write_config<C: Serialize>(
    config: &C,
    path: impl AsRef<Path>,
) -> Result<()> {
    File::create(path)?.write_all(
        ron::ser::to_string_pretty(
            config,
            ron::ser::PrettyConfig::default(),
        )?.as_bytes()
    )?;
    Ok(())
}

/// Read a config from a RON file.
pub fn read_config<C: DeserializeOwned>(
    path: impl AsRef<Path>,
) -> Result<C> {
    Ok(ron::from_str(&fs::read_to_string(path)?)?)
}


#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::configs::{
            DQN_Config,
            TrainConfig,
        },
    };

    #[test]
    fn test_config_roundtrip() {
        let dir = std::env::temp_dir().join(format!("dqn-util-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let config = DQN_Config { gamma: 0.5, seed: Some(3), ..Default::default() };
        write_config(&config, dir.join("alg.ron")).unwrap();
        let read: DQN_Config = read_config(dir.join("alg.ron")).unwrap();
        assert_eq!(read.gamma, 0.5);
        assert_eq!(read.seed, Some(3));
        assert_eq!(read.hidden_sizes, vec![512, 256, 256]);

        write_config(&TrainConfig::default(), dir.join("train.ron")).unwrap();
        let read: TrainConfig = read_config(dir.join("train.ron")).unwrap();
        assert_eq!(read.max_episodes(), 3000);
        assert_eq!(read.win_reward(), 195.0);

        fs::remove_dir_all(&dir).unwrap();
    }
}
