use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::{
    cli::Output,
    core::{
        appliance::{estimate_appliances, read_appliances},
        flag::TariffFlag,
        month::PeriodKey,
        period::MonthPeriod,
        reading::Reading,
        session::Tracker,
        stats::ConsumptionStats,
    },
    prelude::*,
    quantity::energy::KilowattHours,
    tables::{
        build_appliances_table,
        build_impact_table,
        build_stats_table,
        build_tiers_table,
    },
};

/// Period metadata next to its full statistics.
#[serde_as]
#[derive(Serialize)]
struct PeriodSummary<'a> {
    #[serde_as(as = "DisplayFromStr")]
    period: PeriodKey,

    #[serde(rename = "initialReading")]
    initial_reading: KilowattHours,

    #[serde(rename = "readingDay", skip_serializing_if = "Option::is_none")]
    reading_day: Option<u32>,

    #[serde(rename = "tariffFlag")]
    tariff_flag: TariffFlag,

    readings: &'a [Reading],

    #[serde(flatten)]
    stats: ConsumptionStats,
}

impl<'a> PeriodSummary<'a> {
    const fn new(period: &'a MonthPeriod, stats: ConsumptionStats) -> Self {
        Self {
            period: period.key,
            initial_reading: period.initial_reading,
            reading_day: period.reading_day,
            tariff_flag: period.tariff_flag,
            readings: period.readings.as_slice(),
            stats,
        }
    }
}

pub fn stats(tracker: &Tracker, output: Output) -> Result {
    let period = tracker.session().require_active_period()?;
    let stats = tracker.stats()?;
    output.print(&PeriodSummary::new(period, stats), |summary| {
        build_stats_table(period, &summary.stats)
    })
}

pub fn compare(tracker: &Tracker, output: Output) -> Result {
    let costs = tracker.compare_all_tiers();
    output.print(&costs, |costs| build_tiers_table(costs, tracker.flag()))
}

#[derive(Parser)]
pub struct ImpactArgs {
    /// Target flag.
    #[clap(value_enum)]
    to: TariffFlag,

    /// Base flag, defaults to the period flag.
    #[clap(long, value_enum)]
    from: Option<TariffFlag>,
}

impl ImpactArgs {
    pub fn run(self, tracker: &Tracker, output: Output) -> Result {
        let from = self.from.unwrap_or_else(|| tracker.flag());
        let impact = tracker.tier_impact(from, self.to);
        output.print(&impact, build_impact_table)
    }
}

#[derive(Parser)]
pub struct AppliancesArgs {
    /// TOML file with `[[appliance]]` tables.
    #[clap(long = "appliances-path", default_value = "appliances.toml", env = "APPLIANCES_PATH")]
    path: PathBuf,

    /// Flag to price the consumption at, defaults to the period flag.
    #[clap(long, value_enum)]
    flag: Option<TariffFlag>,
}

impl AppliancesArgs {
    pub fn run(self, tracker: &Tracker, output: Output) -> Result {
        let appliances = read_appliances(&self.path)?;
        let flag = self.flag.unwrap_or_else(|| tracker.flag());
        let report = estimate_appliances(&appliances, tracker.tariff(), flag);
        output.print(&report, build_appliances_table)
    }
}
