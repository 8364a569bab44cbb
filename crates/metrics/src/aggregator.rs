//! derived statistics of the HNT and sub-network cards.
//!
//! every missing upstream field counts as zero here so that nothing
//! downstream has to deal with absent numbers.
use crate::{emission::EmissionModel, error::MetricsError};
use chrono::{DateTime, NaiveDate, Utc};
use common::{
    EpochClock, EpochRecord, GovernanceTotals, MintState, Network, SubNetwork, TreasuryState,
    constants::HNT_DECIMALS,
};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::Serialize;

/// basis points kept by the integer staking ratio (two decimals of a percent)
const STAKED_SCALE: u128 = 10_000;

/// `staked / supply * 100`, computed on integers to two decimals
pub fn percent_staked(staked: u128, supply: u64) -> f64 {
    if supply == 0 {
        return 0.0;
    }
    let bps = staked.saturating_mul(STAKED_SCALE) / supply as u128;
    bps as f64 / 100.0
}

/// `amount / 10^decimals` as a float
pub fn scaled(amount: u128, decimals: u8) -> f64 {
    i128::try_from(amount)
        .ok()
        .and_then(|v| Decimal::try_from_i128_with_scale(v, decimals as u32).ok())
        .and_then(|d| d.to_f64())
        .unwrap_or_else(|| amount as f64 / 10f64.powi(decimals as i32))
}

/// sub-network tokens per HNT held by the treasury; an empty treasury counts as 1 HNT
pub fn swap_estimate(
    supply: u64,
    supply_decimals: u8,
    treasury_balance: Option<u64>,
    treasury_decimals: u8,
) -> f64 {
    let supply = scaled(supply as u128, supply_decimals);
    let treasury = treasury_balance
        .map(|balance| scaled(balance as u128, treasury_decimals))
        .filter(|balance| *balance > 0.0)
        .unwrap_or(1.0);
    supply / treasury
}

/// current supply plus remaining whole-token emissions, in base units
pub fn max_supply(supply: u64, remaining: u64, decimals: u8) -> Result<u128, MetricsError> {
    10u128
        .checked_pow(decimals as u32)
        .and_then(|scale| (remaining as u128).checked_mul(scale))
        .and_then(|emissions| emissions.checked_add(supply as u128))
        .ok_or(MetricsError::DecimalsOverflow(decimals))
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

/// raw values fetched for the HNT card
#[derive(Debug, Clone)]
pub struct HntSnapshot {
    pub unix_time: i64,
    pub price_usd: Option<f64>,
    pub mint: MintState,
    pub governance: GovernanceTotals,
    /// last completed epoch of any sub-network; all share the epoch clock
    pub epoch: EpochRecord,
    pub latest_emission: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HntStats {
    pub price_usd: f64,
    pub last_epoch_ended: DateTime<Utc>,
    pub current_epoch: u64,
    pub next_epoch_in_secs: i64,
    pub halving_in_secs: Option<i64>,
    pub supply: u64,
    pub decimals: u8,
    pub max_supply: u128,
    pub latest_emission: u64,
    pub percent_staked: f64,
}

pub fn hnt_stats(
    snapshot: &HntSnapshot,
    model: &EmissionModel,
    clock: &EpochClock,
    today: NaiveDate,
) -> Result<HntStats, MetricsError> {
    let now = snapshot.unix_time;
    let decimals = snapshot
        .mint
        .decimals
        .unwrap_or_else(|| Network::Hnt.default_decimals());
    let supply = snapshot.mint.supply.unwrap_or_default();
    let remaining = model.remaining_emissions(Network::Hnt, today);
    let halving_in_secs = model
        .schedule(Network::Hnt)
        .next_boundary_after(today)
        .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc().timestamp() - now);

    Ok(HntStats {
        price_usd: snapshot.price_usd.unwrap_or_default(),
        last_epoch_ended: timestamp(snapshot.epoch.rewards_issued_at.unwrap_or_default()),
        current_epoch: clock.current_epoch(now),
        next_epoch_in_secs: clock.next_epoch_in(now).num_seconds(),
        halving_in_secs,
        supply,
        decimals,
        max_supply: max_supply(supply, remaining, decimals)?,
        latest_emission: snapshot.latest_emission.unwrap_or_default(),
        percent_staked: percent_staked(snapshot.governance.total_staked, supply),
    })
}

/// raw values fetched for one sub-network card
#[derive(Debug, Clone)]
pub struct SubNetworkSnapshot {
    pub network: SubNetwork,
    pub active_devices: Option<u64>,
    pub mint: MintState,
    pub epoch: EpochRecord,
    pub treasury: TreasuryState,
    pub governance: GovernanceTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubNetworkStats {
    pub network: SubNetwork,
    pub utility_score: u128,
    pub active_devices: u64,
    pub vehnt_delegated: u64,
    pub dc_burned: u64,
    pub treasury_balance: u64,
    pub supply: u64,
    pub decimals: u8,
    pub max_supply: u128,
    pub daily_emissions: u64,
    pub swap_estimate: f64,
    pub percent_staked: f64,
}

pub fn sub_network_stats(
    snapshot: &SubNetworkSnapshot,
    model: &EmissionModel,
    today: NaiveDate,
) -> Result<SubNetworkStats, MetricsError> {
    let network = snapshot.network.network();
    let decimals = snapshot
        .mint
        .decimals
        .unwrap_or_else(|| network.default_decimals());
    let supply = snapshot.mint.supply.unwrap_or_default();
    let remaining = model.remaining_emissions(network, today);

    Ok(SubNetworkStats {
        network: snapshot.network,
        utility_score: snapshot.epoch.utility_score.unwrap_or_default(),
        active_devices: snapshot.active_devices.unwrap_or_default(),
        vehnt_delegated: snapshot.epoch.vehnt_at_epoch_start.unwrap_or_default(),
        dc_burned: snapshot.epoch.dc_burned.unwrap_or_default(),
        treasury_balance: snapshot.treasury.balance.unwrap_or_default(),
        supply,
        decimals,
        max_supply: max_supply(supply, remaining, decimals)?,
        daily_emissions: model.latest_daily_emission(network, today),
        swap_estimate: swap_estimate(supply, decimals, snapshot.treasury.balance, HNT_DECIMALS),
        percent_staked: percent_staked(snapshot.governance.total_staked, supply),
    })
}
