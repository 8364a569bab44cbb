use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintState {
    pub address: String,
    pub decimals: Option<u8>,
    pub supply: Option<u64>,
}

/// one finalized (or pending) sub-network epoch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochRecord {
    pub epoch: u64,
    pub rewards_issued_at: Option<i64>,
    pub utility_score: Option<u128>,
    pub vehnt_at_epoch_start: Option<u64>,
    pub dc_burned: Option<u64>,
}

impl EpochRecord {
    /// placeholder for an epoch whose account does not exist yet
    pub fn missing(epoch: u64) -> Self {
        EpochRecord {
            epoch,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryState {
    pub treasury: String,
    pub balance: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceTotals {
    pub total_staked: u128,
    pub positions: u64,
}
