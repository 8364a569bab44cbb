pub mod aggregator;
pub mod delegation;
pub mod emission;
pub mod error;
pub mod stat;

pub use aggregator::{
    HntSnapshot, HntStats, SubNetworkSnapshot, SubNetworkStats, hnt_stats, max_supply,
    percent_staked, scaled, sub_network_stats, swap_estimate,
};
pub use delegation::{
    DelegationConfig, DelegationSample, delegation_series, fetch_delegation_history,
    share_percent, window_offsets,
};
pub use emission::{EmissionModel, EmissionSchedule, ScheduleStep};
pub use error::MetricsError;
pub use stat::{Cadence, DerivedStatistic, StatValue};
