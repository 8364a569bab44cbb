use anyhow::{Error, anyhow};
use common::{EpochClock, Endpoints, env::get_env_var};
use metrics::{DelegationConfig, EmissionModel};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

const DEFAULT_PATHS: [&str; 2] = ["stats.toml", "../stats.toml"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub endpoints: Endpoints,
    pub epochs: EpochsConfig,
    pub emissions: EmissionModel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpochsConfig {
    pub genesis_unix: i64,
    pub epoch_length_secs: i64,
    pub migration_epoch: u64,
    pub window: u64,
    pub vehnt_decimals: u8,
}

impl Default for EpochsConfig {
    fn default() -> Self {
        let clock = EpochClock::default();
        let delegation = DelegationConfig::default();
        EpochsConfig {
            genesis_unix: clock.genesis_unix,
            epoch_length_secs: clock.epoch_length_secs,
            migration_epoch: delegation.migration_epoch,
            window: delegation.window,
            vehnt_decimals: delegation.vehnt_decimals,
        }
    }
}

impl EpochsConfig {
    pub fn clock(&self) -> EpochClock {
        EpochClock {
            genesis_unix: self.genesis_unix,
            epoch_length_secs: self.epoch_length_secs,
        }
    }

    pub fn delegation(&self) -> DelegationConfig {
        DelegationConfig {
            migration_epoch: self.migration_epoch,
            window: self.window,
            vehnt_decimals: self.vehnt_decimals,
        }
    }
}

impl StatsConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.epochs.epoch_length_secs <= 0 {
            return Err(anyhow!(
                "error: epoch_length_secs must be positive, got {}",
                self.epochs.epoch_length_secs
            ));
        }
        self.emissions.validate()?;
        Ok(())
    }
}

/// `explicit`, else `STATS_CONFIG`, else `stats.toml` / `../stats.toml`.
/// a named file must exist; the fallback paths may be absent.
pub fn load_config(explicit: Option<&Path>) -> Result<StatsConfig, Error> {
    let named = explicit
        .map(Path::to_path_buf)
        .or_else(|| get_env_var("STATS_CONFIG").ok().map(PathBuf::from));

    let config = match named {
        Some(path) => read_config(&path)?
            .ok_or_else(|| anyhow!("error: config file {} not found", path.display()))?,
        None => {
            let mut found = None;
            for path in DEFAULT_PATHS {
                if let Some(config) = read_config(Path::new(path))? {
                    found = Some(config);
                    break;
                }
            }
            found.unwrap_or_else(|| {
                debug!("no stats config found, using defaults");
                StatsConfig::default()
            })
        }
    };

    config.validate()?;
    Ok(StatsConfig {
        endpoints: config.endpoints.with_env_overrides(),
        ..config
    })
}

fn read_config(path: &Path) -> Result<Option<StatsConfig>, Error> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(anyhow!(
                "error: failed to read stats config {}: {err}",
                path.display()
            ));
        }
    };
    let config = parse_config(&contents)
        .map_err(|err| anyhow!("error: failed to parse stats config {}: {err}", path.display()))?;
    info!(path = %path.display(), "loaded stats config");
    Ok(Some(config))
}

pub fn parse_config(contents: &str) -> Result<StatsConfig, toml::de::Error> {
    toml::from_str::<StatsConfig>(contents)
}
