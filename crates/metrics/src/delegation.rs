use crate::aggregator::scaled;
use anyhow::Error;
use chrono::{DateTime, Utc};
use common::{
    DataSource, EpochClock, EpochRecord, SubNetwork, blocking, constants::VEHNT_DECIMALS,
};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// first epoch with sub-DAO epoch records
pub const MIGRATION_EPOCH: u64 = 19_467;
pub const MAX_WINDOW: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegationConfig {
    pub migration_epoch: u64,
    pub window: u64,
    pub vehnt_decimals: u8,
}

impl Default for DelegationConfig {
    fn default() -> Self {
        DelegationConfig {
            migration_epoch: MIGRATION_EPOCH,
            window: MAX_WINDOW,
            vehnt_decimals: VEHNT_DECIMALS,
        }
    }
}

/// veHNT delegated to MOBILE and IOT at the start of one epoch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelegationSample {
    pub epoch: u64,
    pub date: DateTime<Utc>,
    pub mobile_delegated: f64,
    pub iot_delegated: f64,
    pub percent_iot: f64,
}

/// epoch offsets (1 = last completed epoch) of the trailing window
pub fn window_offsets(current_epoch: u64, migration_epoch: u64, cap: u64) -> Vec<u64> {
    let span = current_epoch.saturating_sub(migration_epoch).min(cap);
    (1..=span)
        .filter(|offset| current_epoch - offset >= migration_epoch)
        .collect()
}

/// `b / (a + b) * 100`, zero when nothing is delegated
pub fn share_percent(a: f64, b: f64) -> f64 {
    let total = a + b;
    if total <= 0.0 {
        return 0.0;
    }
    b / total * 100.0
}

/// reduces most-recent-first (MOBILE, IOT) pairs to an ascending series
pub fn delegation_series(
    pairs: Vec<(EpochRecord, EpochRecord)>,
    clock: &EpochClock,
    vehnt_decimals: u8,
) -> Vec<DelegationSample> {
    pairs
        .into_iter()
        .map(|(mobile, iot)| {
            let mobile_delegated =
                scaled(mobile.vehnt_at_epoch_start.unwrap_or_default() as u128, vehnt_decimals);
            let iot_delegated =
                scaled(iot.vehnt_at_epoch_start.unwrap_or_default() as u128, vehnt_decimals);
            DelegationSample {
                epoch: mobile.epoch,
                date: DateTime::from_timestamp(clock.epoch_start(mobile.epoch), 0)
                    .unwrap_or_default(),
                mobile_delegated,
                iot_delegated,
                percent_iot: share_percent(mobile_delegated, iot_delegated),
            }
        })
        .rev()
        .collect()
}

/// reads both sub-networks' records for every epoch of the window as one batch
pub async fn fetch_delegation_history<S>(
    source: &Arc<S>,
    config: &DelegationConfig,
) -> Result<Vec<DelegationSample>, Error>
where
    S: DataSource + ?Sized + 'static,
{
    let now = blocking(source, |s| s.unix_timestamp()).await?;
    let clock = source.epoch_clock();
    let current = clock.current_epoch(now);
    let offsets = window_offsets(current, config.migration_epoch, config.window);

    let reads = offsets.into_iter().map(|offset| {
        let epoch = current - offset;
        async move {
            tokio::try_join!(
                blocking(source, move |s| s.epoch_record(SubNetwork::Mobile, epoch)),
                blocking(source, move |s| s.epoch_record(SubNetwork::Iot, epoch)),
            )
        }
    });
    let pairs = try_join_all(reads).await?;
    info!(current, epochs = pairs.len(), "fetched delegation window");

    Ok(delegation_series(pairs, &clock, config.vehnt_decimals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use common::{GovernanceTotals, MintState, Network};
    use proptest::prelude::*;
    use std::sync::Mutex;

    struct Epochs {
        now: i64,
        fail_epoch: Option<u64>,
        requested: Mutex<Vec<(SubNetwork, u64)>>,
    }

    impl Epochs {
        fn at_epoch(epoch: u64) -> Self {
            Epochs {
                now: epoch as i64 * 86_400 + 60,
                fail_epoch: None,
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl DataSource for Epochs {
        fn epoch_clock(&self) -> EpochClock {
            EpochClock::default()
        }
        fn unix_timestamp(&self) -> Result<i64, Error> {
            Ok(self.now)
        }
        fn mint(&self, _mint: &str) -> Result<MintState, Error> {
            unimplemented!()
        }
        fn epoch_record(&self, network: SubNetwork, epoch: u64) -> Result<EpochRecord, Error> {
            self.requested.lock().unwrap().push((network, epoch));
            if self.fail_epoch == Some(epoch) {
                return Err(anyhow!("error: rpc unavailable"));
            }
            let vehnt = match network {
                SubNetwork::Mobile => 300_000_000 * epoch,
                SubNetwork::Iot => 100_000_000 * epoch,
            };
            Ok(EpochRecord {
                epoch,
                vehnt_at_epoch_start: Some(vehnt),
                ..Default::default()
            })
        }
        fn treasury_account(&self, _network: SubNetwork) -> Result<String, Error> {
            unimplemented!()
        }
        fn token_balance(&self, _account: &str) -> Result<Option<u64>, Error> {
            unimplemented!()
        }
        fn governance_totals(&self, _network: Network) -> Result<GovernanceTotals, Error> {
            unimplemented!()
        }
        fn price_usd(&self, _coin_id: &str) -> Result<Option<f64>, Error> {
            unimplemented!()
        }
        fn active_devices(&self, _network: SubNetwork) -> Result<Option<u64>, Error> {
            unimplemented!()
        }
        fn latest_hnt_emission(&self) -> Result<Option<u64>, Error> {
            unimplemented!()
        }
    }

    #[test]
    fn window_example() {
        assert_eq!(window_offsets(19_470, MIGRATION_EPOCH, MAX_WINDOW), vec![1, 2, 3]);
        assert_eq!(window_offsets(19_467, MIGRATION_EPOCH, MAX_WINDOW), Vec::<u64>::new());
        assert_eq!(window_offsets(19_400, MIGRATION_EPOCH, MAX_WINDOW), Vec::<u64>::new());
        assert_eq!(window_offsets(20_000, MIGRATION_EPOCH, MAX_WINDOW).len(), 30);
    }

    #[test]
    fn share_guard() {
        assert_eq!(share_percent(0.0, 0.0), 0.0);
        assert_eq!(share_percent(3.0, 1.0), 25.0);
        assert_eq!(share_percent(0.0, 2.0), 100.0);
    }

    #[test]
    fn series_is_ascending() {
        let clock = EpochClock::default();
        let record = |epoch, vehnt| EpochRecord {
            epoch,
            vehnt_at_epoch_start: vehnt,
            ..Default::default()
        };
        let pairs = vec![
            (record(19_469, Some(300_000_000)), record(19_469, Some(100_000_000))),
            (record(19_468, None), record(19_468, None)),
        ];
        let series = delegation_series(pairs, &clock, 8);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].epoch, 19_468);
        assert_eq!(series[0].percent_iot, 0.0);
        assert_eq!(series[1].mobile_delegated, 3.0);
        assert_eq!(series[1].iot_delegated, 1.0);
        assert_eq!(series[1].percent_iot, 25.0);
        assert_eq!(series[1].date.timestamp(), 19_469 * 86_400);
    }

    #[tokio::test]
    async fn fetches_window_as_pairs() {
        let source = Arc::new(Epochs::at_epoch(19_470));
        let series = fetch_delegation_history(&source, &DelegationConfig::default())
            .await
            .unwrap();
        let epochs: Vec<u64> = series.iter().map(|s| s.epoch).collect();
        assert_eq!(epochs, vec![19_467, 19_468, 19_469]);
        for sample in &series {
            assert_eq!(sample.percent_iot, 25.0);
        }

        let mut requested = source.requested.lock().unwrap().clone();
        requested.sort_by_key(|(network, epoch)| (*epoch, *network == SubNetwork::Iot));
        assert_eq!(requested.len(), 6);
        assert!(requested.iter().all(|(_, epoch)| *epoch >= MIGRATION_EPOCH));
    }

    #[tokio::test]
    async fn one_failed_read_fails_the_window() {
        let mut epochs = Epochs::at_epoch(19_480);
        epochs.fail_epoch = Some(19_475);
        let source = Arc::new(epochs);
        let res = fetch_delegation_history(&source, &DelegationConfig::default()).await;
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn nothing_before_migration() {
        let source = Arc::new(Epochs::at_epoch(19_467));
        let series = fetch_delegation_history(&source, &DelegationConfig::default())
            .await
            .unwrap();
        assert!(series.is_empty());
        assert!(source.requested.lock().unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn window_bounds(current in MIGRATION_EPOCH..40_000u64, cap in 0u64..60) {
            let offsets = window_offsets(current, MIGRATION_EPOCH, cap);
            prop_assert!(offsets.len() as u64 <= cap);
            let default_window = window_offsets(current, MIGRATION_EPOCH, MAX_WINDOW);
            prop_assert!(default_window.len() as u64 <= MAX_WINDOW);
            prop_assert!(offsets.len() as u64 <= current - MIGRATION_EPOCH);
            prop_assert!(offsets.iter().all(|o| current - o >= MIGRATION_EPOCH));
        }

        #[test]
        fn share_in_range(a in 0.0f64..1e12, b in 0.0f64..1e12) {
            let pct = share_percent(a, b);
            prop_assert!((0.0..=100.0).contains(&pct));
        }
    }
}
