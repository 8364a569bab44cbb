//! scheduled emissions per network.
//!
//! a schedule is a step function of the calendar date: each step sets the
//! annual emission from its start date until the next step, and nothing is
//! emitted from the horizon on. daily emission is the annual amount over 365.
use crate::error::MetricsError;
use chrono::{Months, NaiveDate};
use common::Network;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

pub const DAYS_PER_YEAR: u32 = 365;

const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(d) => d,
        None => panic!("invalid schedule date"),
    }
}

/// day the sub-DAOs program took over emissions
pub const SCHEDULE_START: NaiveDate = date(2023, 4, 18);
pub const HNT_FIRST_HALVING: NaiveDate = date(2023, 8, 1);
pub const SUB_NETWORK_FIRST_HALVING: NaiveDate = date(2025, 8, 1);
pub const SCHEDULE_HORIZON: NaiveDate = date(2073, 8, 1);
pub const HALVING_INTERVAL_YEARS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleStep {
    pub starts: NaiveDate,
    /// whole tokens per year
    pub annual_emission: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionSchedule {
    pub steps: Vec<ScheduleStep>,
    pub horizon: NaiveDate,
}

impl EmissionSchedule {
    /// `base_annual` from `start`, halved at `first_halving` and every
    /// `interval_years` after it until `horizon`
    pub fn halving(
        start: NaiveDate,
        base_annual: u64,
        first_halving: NaiveDate,
        interval_years: u32,
        horizon: NaiveDate,
    ) -> Self {
        let mut steps = vec![ScheduleStep {
            starts: start,
            annual_emission: base_annual,
        }];
        let mut annual = base_annual;
        let mut boundary = Some(first_halving);
        while let Some(starts) = boundary.filter(|d| *d < horizon && annual > 0) {
            annual /= 2;
            steps.push(ScheduleStep {
                starts,
                annual_emission: annual,
            });
            boundary = starts.checked_add_months(Months::new(12 * interval_years.max(1)));
        }
        EmissionSchedule { steps, horizon }
    }

    pub fn validate(&self) -> Result<(), MetricsError> {
        let first = self
            .steps
            .first()
            .ok_or_else(|| MetricsError::InvalidSchedule("no steps".into()))?;
        if self.horizon <= first.starts {
            return Err(MetricsError::InvalidSchedule(format!(
                "horizon {} is not after the first step {}",
                self.horizon, first.starts
            )));
        }
        if let Some(pair) = self.steps.windows(2).find(|w| w[0].starts >= w[1].starts) {
            return Err(MetricsError::InvalidSchedule(format!(
                "step {} does not start after {}",
                pair[1].starts, pair[0].starts
            )));
        }
        Ok(())
    }

    /// annual emission in force on `date`
    fn annual_on(&self, date: NaiveDate) -> u64 {
        if date >= self.horizon {
            return 0;
        }
        let idx = self.steps.partition_point(|s| s.starts <= date);
        match idx {
            0 => 0,
            i => self.steps[i - 1].annual_emission,
        }
    }

    pub fn daily_emission(&self, date: NaiveDate) -> Decimal {
        daily_rate(self.annual_on(date))
    }

    /// daily emission on `date`, rounded to whole tokens
    pub fn latest_daily_emission(&self, date: NaiveDate) -> u64 {
        whole_tokens(self.daily_emission(date))
    }

    /// sum of the daily emissions of every day from `from` (inclusive) to the horizon
    pub fn remaining_emissions_exact(&self, from: NaiveDate) -> Decimal {
        let mut total = Decimal::ZERO;
        for (i, step) in self.steps.iter().enumerate() {
            let step_end = self
                .steps
                .get(i + 1)
                .map(|next| next.starts.min(self.horizon))
                .unwrap_or(self.horizon);
            let start = step.starts.max(from);
            if step_end <= start {
                continue;
            }
            let days = (step_end - start).num_days();
            total += daily_rate(step.annual_emission) * Decimal::from(days);
        }
        total
    }

    pub fn remaining_emissions(&self, from: NaiveDate) -> u64 {
        whole_tokens(self.remaining_emissions_exact(from))
    }

    /// first step boundary strictly after `date`, if the schedule still changes
    pub fn next_boundary_after(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.steps
            .iter()
            .map(|s| s.starts)
            .find(|starts| *starts > date && *starts < self.horizon)
    }
}

fn daily_rate(annual: u64) -> Decimal {
    Decimal::from(annual) / Decimal::from(DAYS_PER_YEAR)
}

fn whole_tokens(amount: Decimal) -> u64 {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(0)
}

/// the emission schedules of every network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionModel {
    pub hnt: EmissionSchedule,
    pub mobile: EmissionSchedule,
    pub iot: EmissionSchedule,
}

impl Default for EmissionModel {
    fn default() -> Self {
        EmissionModel {
            hnt: EmissionSchedule::halving(
                SCHEDULE_START,
                30_000_000,
                HNT_FIRST_HALVING,
                HALVING_INTERVAL_YEARS,
                SCHEDULE_HORIZON,
            ),
            mobile: EmissionSchedule::halving(
                SCHEDULE_START,
                30_000_000_000,
                SUB_NETWORK_FIRST_HALVING,
                HALVING_INTERVAL_YEARS,
                SCHEDULE_HORIZON,
            ),
            iot: EmissionSchedule::halving(
                SCHEDULE_START,
                32_500_000_000,
                SUB_NETWORK_FIRST_HALVING,
                HALVING_INTERVAL_YEARS,
                SCHEDULE_HORIZON,
            ),
        }
    }
}

impl EmissionModel {
    pub fn schedule(&self, network: Network) -> &EmissionSchedule {
        match network {
            Network::Hnt => &self.hnt,
            Network::Mobile => &self.mobile,
            Network::Iot => &self.iot,
        }
    }

    pub fn validate(&self) -> Result<(), MetricsError> {
        for network in Network::ALL {
            self.schedule(network).validate().map_err(|err| match err {
                MetricsError::InvalidSchedule(msg) => {
                    MetricsError::InvalidSchedule(format!("{network}: {msg}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    pub fn remaining_emissions(&self, network: Network, date: NaiveDate) -> u64 {
        self.schedule(network).remaining_emissions(date)
    }

    pub fn latest_daily_emission(&self, network: Network, date: NaiveDate) -> u64 {
        self.schedule(network).latest_daily_emission(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_step() -> EmissionSchedule {
        EmissionSchedule {
            steps: vec![
                ScheduleStep {
                    starts: date(2024, 1, 1),
                    annual_emission: 365_000,
                },
                ScheduleStep {
                    starts: date(2024, 3, 1),
                    annual_emission: 182_500,
                },
            ],
            horizon: date(2024, 4, 1),
        }
    }

    /// reference integration: one day at a time
    fn naive_remaining(schedule: &EmissionSchedule, from: NaiveDate) -> Decimal {
        from.iter_days()
            .take_while(|d| *d < schedule.horizon)
            .map(|d| schedule.daily_emission(d))
            .sum()
    }

    #[test]
    fn boundary_day_uses_new_rate() {
        let s = two_step();
        assert_eq!(s.latest_daily_emission(date(2024, 2, 29)), 1_000);
        assert_eq!(s.latest_daily_emission(date(2024, 3, 1)), 500);
        assert_eq!(s.latest_daily_emission(date(2024, 3, 2)), 500);
    }

    #[test]
    fn outside_schedule_emits_nothing() {
        let s = two_step();
        assert_eq!(s.latest_daily_emission(date(2023, 12, 31)), 0);
        assert_eq!(s.latest_daily_emission(date(2024, 4, 1)), 0);
        assert_eq!(s.remaining_emissions(date(2024, 4, 1)), 0);
        assert_eq!(s.remaining_emissions(date(2030, 1, 1)), 0);
    }

    #[test]
    fn remaining_straddling_boundary() {
        let s = two_step();
        // 2024-02-20..2024-03-01 is 10 days at 1000, 2024-03-01..2024-04-01 is 31 days at 500
        assert_eq!(s.remaining_emissions(date(2024, 2, 20)), 10 * 1_000 + 31 * 500);
        assert_eq!(
            s.remaining_emissions_exact(date(2024, 2, 20)),
            naive_remaining(&s, date(2024, 2, 20))
        );
    }

    #[test]
    fn remaining_before_schedule_start() {
        let s = two_step();
        // days before the first step add nothing
        assert_eq!(s.remaining_emissions(date(2023, 12, 1)), 60 * 1_000 + 31 * 500);
    }

    #[test]
    fn default_model_matches_daily_summation() {
        let model = EmissionModel::default();
        model.validate().unwrap();
        for network in Network::ALL {
            let schedule = model.schedule(network);
            for from in [date(2023, 7, 20), date(2025, 7, 25), date(2031, 1, 1)] {
                let naive = whole_tokens(naive_remaining(schedule, from));
                assert_eq!(schedule.remaining_emissions(from), naive, "{network} from {from}");
            }
        }
    }

    #[test]
    fn default_daily_rates() {
        let model = EmissionModel::default();
        let before = date(2025, 7, 31);
        let after = date(2025, 8, 1);
        assert_eq!(model.latest_daily_emission(Network::Mobile, before), 82_191_781);
        assert_eq!(model.latest_daily_emission(Network::Mobile, after), 41_095_890);
        assert_eq!(model.latest_daily_emission(Network::Iot, before), 89_041_096);
        assert_eq!(model.latest_daily_emission(Network::Hnt, before), 41_096);
        assert_eq!(model.latest_daily_emission(Network::Hnt, after), 20_548);
    }

    #[test]
    fn halving_builder() {
        let s = EmissionSchedule::halving(
            date(2020, 1, 1),
            800,
            date(2021, 1, 1),
            2,
            date(2026, 1, 1),
        );
        let starts: Vec<_> = s.steps.iter().map(|s| (s.starts, s.annual_emission)).collect();
        assert_eq!(
            starts,
            vec![
                (date(2020, 1, 1), 800),
                (date(2021, 1, 1), 400),
                (date(2023, 1, 1), 200),
                (date(2025, 1, 1), 100),
            ]
        );
        s.validate().unwrap();
        assert_eq!(s.next_boundary_after(date(2021, 1, 1)), Some(date(2023, 1, 1)));
        assert_eq!(s.next_boundary_after(date(2025, 6, 1)), None);
    }

    #[test]
    fn invalid_schedules() {
        let mut s = two_step();
        s.steps.swap(0, 1);
        assert!(matches!(s.validate(), Err(MetricsError::InvalidSchedule(_))));

        let mut s = two_step();
        s.horizon = date(2023, 1, 1);
        assert!(s.validate().is_err());

        let s = EmissionSchedule {
            steps: vec![],
            horizon: date(2024, 1, 1),
        };
        assert!(s.validate().is_err());
    }
}
