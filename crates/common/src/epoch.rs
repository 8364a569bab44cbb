use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

pub const EPOCH_LENGTH_SECS: i64 = 24 * 60 * 60;

/// maps unix time to the sub-DAOs program's day-long epochs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpochClock {
    pub genesis_unix: i64,
    pub epoch_length_secs: i64,
}

impl Default for EpochClock {
    fn default() -> Self {
        EpochClock {
            genesis_unix: 0,
            epoch_length_secs: EPOCH_LENGTH_SECS,
        }
    }
}

impl EpochClock {
    pub fn current_epoch(&self, now: i64) -> u64 {
        let elapsed = (now - self.genesis_unix).max(0);
        elapsed.div_euclid(self.epoch_length_secs.max(1)) as u64
    }

    /// unix time at which `epoch` starts
    pub fn epoch_start(&self, epoch: u64) -> i64 {
        self.genesis_unix + epoch as i64 * self.epoch_length_secs
    }

    pub fn secs_to_next_epoch(&self, now: i64) -> i64 {
        self.epoch_start(self.current_epoch(now) + 1) - now
    }

    pub fn next_epoch_in(&self, now: i64) -> TimeDelta {
        TimeDelta::seconds(self.secs_to_next_epoch(now))
    }
}
