use anyhow::Error;
use chrono::NaiveDate;
use clap::ValueEnum;
use common::{
    DataSource, Network, SubNetwork, TreasuryState, blocking,
    constants::{HNT_COINGECKO_ID, HNT_DECIMALS, HNT_MINT, UTILITY_SCORE_DECIMALS, VEHNT_DECIMALS},
    network::Icon,
};
use metrics::{
    Cadence, DelegationConfig, DelegationSample, DerivedStatistic, EmissionModel, HntSnapshot,
    HntStats, StatValue, SubNetworkSnapshot, SubNetworkStats, fetch_delegation_history, hnt_stats,
    sub_network_stats,
};
use serde::Serialize;
use std::{fmt, sync::Arc};
use tracing::info;

/// epochs back from the current one to the last completed epoch
const LAST_COMPLETED: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    All,
    Hnt,
    Mobile,
    Iot,
    Delegation,
}

impl Section {
    pub fn expand(self) -> Vec<Section> {
        match self {
            Section::All => vec![
                Section::Hnt,
                Section::Mobile,
                Section::Iot,
                Section::Delegation,
            ],
            section => vec![section],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::All => "all",
            Section::Hnt => "hnt",
            Section::Mobile => "mobile",
            Section::Iot => "iot",
            Section::Delegation => "delegation",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// one network's stats card
#[derive(Debug, Clone, Serialize)]
pub struct StatGroup {
    pub title: String,
    pub link: String,
    pub link_text: String,
    pub icon: Icon,
    pub items: Vec<DerivedStatistic>,
}

impl StatGroup {
    fn new(network: Network, items: Vec<DerivedStatistic>) -> Self {
        let info = network.info();
        StatGroup {
            title: info.title.to_string(),
            link: info.link.to_string(),
            link_text: info.link_text.to_string(),
            icon: info.icon,
            items,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "section", content = "data", rename_all = "snake_case")]
pub enum SectionReport {
    Stats(StatGroup),
    Delegation(Vec<DelegationSample>),
}

pub struct Dashboard {
    source: Arc<dyn DataSource>,
    emissions: EmissionModel,
    delegation: DelegationConfig,
}

impl Dashboard {
    pub fn new(
        source: Arc<dyn DataSource>,
        emissions: EmissionModel,
        delegation: DelegationConfig,
    ) -> Self {
        Dashboard {
            source,
            emissions,
            delegation,
        }
    }

    pub async fn section(&self, section: Section, today: NaiveDate) -> Result<SectionReport, Error> {
        let report = match section {
            Section::Hnt => SectionReport::Stats(self.hnt_section(today).await?),
            Section::Mobile => {
                SectionReport::Stats(self.sub_network_section(SubNetwork::Mobile, today).await?)
            }
            Section::Iot => {
                SectionReport::Stats(self.sub_network_section(SubNetwork::Iot, today).await?)
            }
            Section::Delegation => SectionReport::Delegation(self.delegation_section().await?),
            Section::All => {
                return Err(anyhow::anyhow!("error: `all` is not a single section"));
            }
        };
        info!(%section, "rendered section");
        Ok(report)
    }

    pub async fn hnt_section(&self, today: NaiveDate) -> Result<StatGroup, Error> {
        let source = &self.source;
        let (unix_time, price_usd, mint, governance, epoch, latest_emission) = tokio::try_join!(
            blocking(source, |s| s.unix_timestamp()),
            blocking(source, |s| s.price_usd(HNT_COINGECKO_ID)),
            blocking(source, |s| s.mint(HNT_MINT)),
            blocking(source, |s| s.governance_totals(Network::Hnt)),
            blocking(source, |s| s.latest_epoch_record(SubNetwork::Mobile, LAST_COMPLETED)),
            blocking(source, |s| s.latest_hnt_emission()),
        )?;

        let snapshot = HntSnapshot {
            unix_time,
            price_usd,
            mint,
            governance,
            epoch,
            latest_emission,
        };
        let stats = hnt_stats(&snapshot, &self.emissions, &source.epoch_clock(), today)?;
        Ok(StatGroup::new(Network::Hnt, hnt_items(&stats)))
    }

    pub async fn sub_network_section(
        &self,
        network: SubNetwork,
        today: NaiveDate,
    ) -> Result<StatGroup, Error> {
        let source = &self.source;
        let (active_devices, mint, epoch, treasury, governance) = tokio::try_join!(
            blocking(source, move |s| s.active_devices(network)),
            blocking(source, move |s| s.mint(network.mint())),
            blocking(source, move |s| s.latest_epoch_record(network, LAST_COMPLETED)),
            blocking(source, move |s| s.treasury_account(network)),
            blocking(source, move |s| s.governance_totals(network.network())),
        )?;

        let account = treasury.clone();
        let balance = blocking(source, move |s| s.token_balance(&account)).await?;

        let snapshot = SubNetworkSnapshot {
            network,
            active_devices,
            mint,
            epoch,
            treasury: TreasuryState { treasury, balance },
            governance,
        };
        let stats = sub_network_stats(&snapshot, &self.emissions, today)?;
        Ok(StatGroup::new(network.network(), sub_network_items(&stats)))
    }

    pub async fn delegation_section(&self) -> Result<Vec<DelegationSample>, Error> {
        fetch_delegation_history(&self.source, &self.delegation).await
    }
}

fn hnt_items(stats: &HntStats) -> Vec<DerivedStatistic> {
    let info = Network::Hnt.info();
    vec![
        DerivedStatistic::new("Price (HNT)", StatValue::Usd(stats.price_usd))
            .id("HNT Price")
            .description("Source: Coingecko")
            .cadence(Cadence::Live),
        DerivedStatistic::new(
            "Last Epoch Ended",
            StatValue::Timestamp(stats.last_epoch_ended),
        ),
        DerivedStatistic::new(
            "Current Epoch",
            StatValue::Count(stats.current_epoch as u128),
        ),
        DerivedStatistic::new(
            "Next Epoch In",
            StatValue::Duration {
                secs: stats.next_epoch_in_secs,
            },
        ),
        DerivedStatistic::new(
            "Halvening In",
            StatValue::Duration {
                secs: stats.halving_in_secs.unwrap_or_default(),
            },
        ),
        DerivedStatistic::new(
            "Supply",
            StatValue::Amount {
                base_units: stats.supply as u128,
                decimals: stats.decimals,
            },
        )
        .id("HNT Supply")
        .description("Current supply of HNT.")
        .cadence(Cadence::Live),
        DerivedStatistic::new(
            "Max Supply",
            StatValue::Amount {
                base_units: stats.max_supply,
                decimals: stats.decimals,
            },
        )
        .id("HNT Max Supply")
        .description(format!(
            "Maximum supply of HNT derived by current supply plus remaining emissions. {}",
            info.max_description
        ))
        .cadence(Cadence::Live)
        .approximate(),
        DerivedStatistic::new(
            "Latest Emission",
            StatValue::Count(stats.latest_emission as u128),
        )
        .id("HNT Daily Emissions")
        .description("Amount of HNT emitted last epoch")
        .cadence(Cadence::Daily),
        DerivedStatistic::new("Supply Staked", StatValue::Percent(stats.percent_staked))
            .id("HNT Supply Staked")
            .description("Percent of current HNT which is staked as veHNT on Realms."),
    ]
}

fn sub_network_items(stats: &SubNetworkStats) -> Vec<DerivedStatistic> {
    let info = stats.network.info();
    let title = info.title;
    vec![
        DerivedStatistic::new(
            "Utility Score",
            StatValue::Amount {
                base_units: stats.utility_score,
                decimals: UTILITY_SCORE_DECIMALS,
            },
        )
        .id("Utility Score")
        .description("Utility score for the most recently completed epoch.")
        .cadence(Cadence::Daily),
        DerivedStatistic::new(
            "Active Hotspots",
            StatValue::Count(stats.active_devices as u128),
        )
        .id(format!("Active Hotspots {title}"))
        .description(format!(
            "Hotspots active in past 24h.{}",
            info.active_details
        ))
        .cadence(Cadence::Live),
        DerivedStatistic::new(
            "veHNT delegated",
            StatValue::Amount {
                base_units: stats.vehnt_delegated as u128,
                decimals: VEHNT_DECIMALS,
            },
        )
        .id(format!("{title} veHNT delegated"))
        .description(format!(
            "veHNT delegated to the {title} subDAO at the start of the most recently completed epoch."
        ))
        .cadence(Cadence::Daily),
        DerivedStatistic::new("DC Burned (24h)", StatValue::Count(stats.dc_burned as u128))
            .id(format!("{title} DC Burned (24h)"))
            .description(format!(
                "DC burned for data transfer by the {title} subDAO during the most recently completed epoch."
            ))
            .cadence(Cadence::Daily),
        DerivedStatistic::new(
            "Treasury (HNT)",
            StatValue::Amount {
                base_units: stats.treasury_balance as u128,
                decimals: HNT_DECIMALS,
            },
        )
        .id(format!("{title} Treasury (HNT)"))
        .description(format!("Current funding of {title}'s treasury."))
        .cadence(Cadence::Live),
        DerivedStatistic::new(
            "Supply",
            StatValue::Amount {
                base_units: stats.supply as u128,
                decimals: stats.decimals,
            },
        )
        .id(format!("{title} Supply"))
        .description(format!("Current supply of {title}."))
        .cadence(Cadence::Live),
        DerivedStatistic::new(
            "Max Supply",
            StatValue::Amount {
                base_units: stats.max_supply,
                decimals: stats.decimals,
            },
        )
        .id(format!("{title} Max Supply"))
        .description(format!(
            "Maximum supply of {title} derived by current supply plus remaining emissions. {}",
            info.max_description
        ))
        .cadence(Cadence::Live),
        DerivedStatistic::new(
            "Daily Emissions",
            StatValue::Count(stats.daily_emissions as u128),
        )
        .id(format!("{title} Daily Emissions"))
        .description(format!("Amount of {title} emitted each day."))
        .cadence(Cadence::Constant),
        DerivedStatistic::new(
            "Estimated Swap",
            StatValue::Count(stats.swap_estimate.round().max(0.0) as u128),
        )
        .id(format!("{title} Estimated Swap"))
        .unit(format!("{title}/HNT"))
        .description(format!(
            "Estimated swap rate for {title} to HNT. This is a floor that is guaranteed by the treasury. You may find better swap rates on DEXs."
        ))
        .cadence(Cadence::Daily),
        DerivedStatistic::new("Supply Staked", StatValue::Percent(stats.percent_staked))
            .id(format!("{title} Supply Staked"))
            .description(format!(
                "Percent of current {title} which is staked as ve{title} on Realms."
            )),
    ]
}
