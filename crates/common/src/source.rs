use crate::{
    accounts::{
        EPOCH_INFO_EPOCH_OFFSET, EPOCH_INFO_SUB_DAO_OFFSET, POSITION, POSITION_AMOUNT_OFFSET,
        POSITION_REGISTRAR_OFFSET, SUB_DAO_EPOCH_INFO, TREASURY_MANAGEMENT,
        TREASURY_SUPPLY_MINT_OFFSET, account_discriminator, decode_clock_unix_timestamp,
        decode_position_amount, decode_sub_dao_epoch_info, decode_treasury_key,
    },
    constants::{
        CLOCK_SYSVAR, COINGECKO_API, DUNE_API, HELIUM_SUB_DAOS_PROGRAM, SOLANA_RPC,
        TREASURY_MANAGEMENT_PROGRAM, VOTER_STAKE_REGISTRY_PROGRAM,
    },
    env::get_env_var,
    epoch::EpochClock,
    network::{Network, SubNetwork},
    offchain::{get_active_devices, get_dune_latest_row_value, get_price_usd},
    rpc::{RpcError, SolanaRpc, memcmp_bytes, memcmp_key},
    types::{EpochRecord, GovernanceTotals, MintState},
};
use anyhow::{Error, anyhow};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// read-only access to every external value the dashboard shows.
///
/// reads are blocking and independent of each other; run them through
/// [`blocking`] to fan them out on the tokio blocking pool.
pub trait DataSource: Send + Sync {
    fn epoch_clock(&self) -> EpochClock;

    fn unix_timestamp(&self) -> Result<i64, Error>;

    fn mint(&self, mint: &str) -> Result<MintState, Error>;

    fn epoch_record(&self, network: SubNetwork, epoch: u64) -> Result<EpochRecord, Error>;

    /// record of the epoch `offset` epochs before the current one
    fn latest_epoch_record(&self, network: SubNetwork, offset: u64) -> Result<EpochRecord, Error> {
        let now = self.unix_timestamp()?;
        let epoch = self.epoch_clock().current_epoch(now).saturating_sub(offset);
        self.epoch_record(network, epoch)
    }

    /// the HNT token account backing a sub-network token
    fn treasury_account(&self, network: SubNetwork) -> Result<String, Error>;

    fn token_balance(&self, account: &str) -> Result<Option<u64>, Error>;

    fn governance_totals(&self, network: Network) -> Result<GovernanceTotals, Error>;

    fn price_usd(&self, coin_id: &str) -> Result<Option<f64>, Error>;

    fn active_devices(&self, network: SubNetwork) -> Result<Option<u64>, Error>;

    /// HNT minted in the last epoch according to the analytics query
    fn latest_hnt_emission(&self) -> Result<Option<u64>, Error>;
}

/// runs one blocking read of `source` on the tokio blocking pool
pub async fn blocking<S, T, F>(source: &Arc<S>, read: F) -> Result<T, Error>
where
    S: DataSource + ?Sized + 'static,
    T: Send + 'static,
    F: FnOnce(&S) -> Result<T, Error> + Send + 'static,
{
    let source = Arc::clone(source);
    tokio::task::spawn_blocking(move || read(source.as_ref())).await?
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub solana_rpc: String,
    pub coingecko: String,
    pub dune: String,
    pub dune_hnt_emissions_query: Option<u64>,
    #[serde(skip_serializing)]
    pub dune_api_key: Option<String>,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            solana_rpc: SOLANA_RPC.to_string(),
            coingecko: COINGECKO_API.to_string(),
            dune: DUNE_API.to_string(),
            dune_hnt_emissions_query: None,
            dune_api_key: None,
        }
    }
}

impl Endpoints {
    /// applies `SOLANA_RPC_URL` and `DUNE_API_KEY` from the env
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = get_env_var("SOLANA_RPC_URL") {
            self.solana_rpc = url;
        }
        if let Ok(key) = get_env_var("DUNE_API_KEY") {
            self.dune_api_key = Some(key);
        }
        self
    }
}

/// [`DataSource`] backed by Solana JSON-RPC and the public HTTP APIs
pub struct HttpDataSource {
    rpc: SolanaRpc,
    endpoints: Endpoints,
    clock: EpochClock,
}

impl HttpDataSource {
    pub fn new(endpoints: Endpoints, clock: EpochClock) -> Self {
        HttpDataSource {
            rpc: SolanaRpc::new(endpoints.solana_rpc.clone()),
            endpoints,
            clock,
        }
    }
}

impl DataSource for HttpDataSource {
    fn epoch_clock(&self) -> EpochClock {
        self.clock
    }

    fn unix_timestamp(&self) -> Result<i64, Error> {
        let data = self
            .rpc
            .account_data(CLOCK_SYSVAR)?
            .ok_or_else(|| RpcError::AccountNotFound(CLOCK_SYSVAR.to_string()))?;
        decode_clock_unix_timestamp(&data)
    }

    fn mint(&self, mint: &str) -> Result<MintState, Error> {
        let (supply, decimals) = self.rpc.token_supply(mint)?;
        Ok(MintState {
            address: mint.to_string(),
            decimals,
            supply,
        })
    }

    fn epoch_record(&self, network: SubNetwork, epoch: u64) -> Result<EpochRecord, Error> {
        let filters = vec![
            memcmp_bytes(0, &account_discriminator(SUB_DAO_EPOCH_INFO)),
            memcmp_bytes(EPOCH_INFO_EPOCH_OFFSET, &epoch.to_le_bytes()),
            memcmp_key(EPOCH_INFO_SUB_DAO_OFFSET, network.sub_dao()),
        ];
        let accounts = self
            .rpc
            .program_accounts(HELIUM_SUB_DAOS_PROGRAM, filters, None)?;
        match accounts.first() {
            Some((_, data)) => decode_sub_dao_epoch_info(data),
            None => {
                debug!(%network, epoch, "no epoch info account");
                Ok(EpochRecord::missing(epoch))
            }
        }
    }

    fn treasury_account(&self, network: SubNetwork) -> Result<String, Error> {
        let filters = vec![
            memcmp_bytes(0, &account_discriminator(TREASURY_MANAGEMENT)),
            memcmp_key(TREASURY_SUPPLY_MINT_OFFSET, network.mint()),
        ];
        let accounts = self
            .rpc
            .program_accounts(TREASURY_MANAGEMENT_PROGRAM, filters, None)?;
        let (_, data) = accounts.first().ok_or(anyhow!(
            "error: no treasury management account found for {network}"
        ))?;
        decode_treasury_key(data)
    }

    fn token_balance(&self, account: &str) -> Result<Option<u64>, Error> {
        self.rpc.token_account_balance(account)
    }

    fn governance_totals(&self, network: Network) -> Result<GovernanceTotals, Error> {
        let filters = vec![
            memcmp_bytes(0, &account_discriminator(POSITION)),
            memcmp_key(POSITION_REGISTRAR_OFFSET, network.registrar()),
        ];
        let positions = self.rpc.program_accounts(
            VOTER_STAKE_REGISTRY_PROGRAM,
            filters,
            Some((POSITION_AMOUNT_OFFSET, 8)),
        )?;

        let totals = sum_positions(&positions);
        debug!(%network, positions = totals.positions, "summed governance positions");
        Ok(totals)
    }

    fn price_usd(&self, coin_id: &str) -> Result<Option<f64>, Error> {
        get_price_usd(&self.endpoints.coingecko, coin_id)
    }

    fn active_devices(&self, network: SubNetwork) -> Result<Option<u64>, Error> {
        match network.info().active_url {
            Some(url) => get_active_devices(url),
            None => Ok(None),
        }
    }

    fn latest_hnt_emission(&self) -> Result<Option<u64>, Error> {
        let (Some(query_id), Some(api_key)) = (
            self.endpoints.dune_hnt_emissions_query,
            self.endpoints.dune_api_key.as_deref(),
        ) else {
            warn!("dune query id or api key not configured, skipping hnt emissions");
            return Ok(None);
        };
        get_dune_latest_row_value(&self.endpoints.dune, query_id, api_key, "hnt_minted")
    }
}

/// sums staked amounts over position slices; slices too short to hold an amount are skipped
fn sum_positions(positions: &[(String, Vec<u8>)]) -> GovernanceTotals {
    let mut totals = GovernanceTotals::default();
    for (pubkey, slice) in positions {
        match decode_position_amount(slice) {
            Ok(amount) => {
                totals.total_staked += amount as u128;
                totals.positions += 1;
            }
            Err(err) => warn!(%pubkey, "skipping position: {err}"),
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        now: i64,
        reads: AtomicUsize,
    }

    impl DataSource for Fixed {
        fn epoch_clock(&self) -> EpochClock {
            EpochClock::default()
        }
        fn unix_timestamp(&self) -> Result<i64, Error> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.now)
        }
        fn mint(&self, mint: &str) -> Result<MintState, Error> {
            Ok(MintState {
                address: mint.to_string(),
                decimals: Some(6),
                supply: Some(10),
            })
        }
        fn epoch_record(&self, _network: SubNetwork, epoch: u64) -> Result<EpochRecord, Error> {
            Ok(EpochRecord::missing(epoch))
        }
        fn treasury_account(&self, _network: SubNetwork) -> Result<String, Error> {
            Err(anyhow!("error: no treasury"))
        }
        fn token_balance(&self, _account: &str) -> Result<Option<u64>, Error> {
            Ok(None)
        }
        fn governance_totals(&self, _network: Network) -> Result<GovernanceTotals, Error> {
            Ok(GovernanceTotals::default())
        }
        fn price_usd(&self, _coin_id: &str) -> Result<Option<f64>, Error> {
            Ok(None)
        }
        fn active_devices(&self, _network: SubNetwork) -> Result<Option<u64>, Error> {
            Ok(None)
        }
        fn latest_hnt_emission(&self) -> Result<Option<u64>, Error> {
            Ok(None)
        }
    }

    #[test]
    fn latest_epoch_record_uses_offset() {
        let source = Fixed {
            now: 19_470 * 86_400 + 5,
            reads: AtomicUsize::new(0),
        };
        let record = source.latest_epoch_record(SubNetwork::Mobile, 1).unwrap();
        assert_eq!(record.epoch, 19_469);
        assert_eq!(source.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn blocking_reads_propagate_errors() {
        let source: Arc<dyn DataSource> = Arc::new(Fixed {
            now: 0,
            reads: AtomicUsize::new(0),
        });
        let mint = blocking(&source, |s| s.mint("abc")).await.unwrap();
        assert_eq!(mint.supply, Some(10));
        let err = blocking(&source, |s| s.treasury_account(SubNetwork::Iot)).await;
        assert!(err.is_err());
    }

    #[test]
    fn short_position_slices_are_skipped() {
        let positions = vec![
            ("a".to_string(), 5u64.to_le_bytes().to_vec()),
            ("b".to_string(), vec![1, 2, 3]),
            ("c".to_string(), 7u64.to_le_bytes().to_vec()),
        ];
        let totals = sum_positions(&positions);
        assert_eq!(totals.total_staked, 12);
        assert_eq!(totals.positions, 2);
        assert_eq!(sum_positions(&[]), GovernanceTotals::default());
    }

    #[test]
    fn endpoints_default_to_public_apis() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.solana_rpc, SOLANA_RPC);
        assert!(endpoints.dune_hnt_emissions_query.is_none());
    }

    #[test]
    #[ignore = "hits mainnet rpc"]
    fn mobile_treasury_test() {
        let source = HttpDataSource::new(Endpoints::default(), EpochClock::default());
        let treasury = source.treasury_account(SubNetwork::Mobile).unwrap();
        let balance = source.token_balance(&treasury).unwrap();
        println!("mobile treasury {treasury}: {balance:?}");
        assert!(balance.is_some());
    }
}
