pub mod accounts;
pub mod constants;
pub mod env;
pub mod epoch;
pub mod network;
pub mod offchain;
pub mod rpc;
pub mod source;
pub mod types;

pub use epoch::EpochClock;
pub use network::{Network, NetworkInfo, SubNetwork};
pub use source::{DataSource, Endpoints, HttpDataSource, blocking};
pub use types::{EpochRecord, GovernanceTotals, MintState, TreasuryState};
