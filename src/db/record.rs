use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::{
    core::{
        flag::TariffFlag,
        month::{MonthOfYear, PeriodKey},
        period::{MonthPeriod, validate_reading_day},
        reading::Reading,
        stats::ConsumptionStats,
    },
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours},
};

/// Persisted snapshot of a period together with its derived totals.
#[must_use]
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    #[serde_as(as = "DisplayFromStr")]
    pub month: MonthOfYear,

    pub year: i32,

    #[serde(rename = "initialReading")]
    pub initial_reading: KilowattHours,

    #[serde(rename = "readingDay", default)]
    pub reading_day: Option<u32>,

    #[serde(rename = "totalConsumption", default)]
    pub total_consumption: KilowattHours,

    #[serde(rename = "estimatedCost", default)]
    pub estimated_cost: Cost,

    #[serde(rename = "tariffFlag", default)]
    pub tariff_flag: TariffFlag,

    #[serde(default)]
    pub readings: Vec<Reading>,
}

impl PeriodRecord {
    pub fn new(period: &MonthPeriod, stats: &ConsumptionStats) -> Self {
        Self {
            month: period.key.month,
            year: period.key.year,
            initial_reading: period.initial_reading,
            reading_day: period.reading_day,
            total_consumption: stats.total_consumption,
            estimated_cost: stats.estimated_cost.round_to_cents(),
            tariff_flag: period.tariff_flag,
            readings: period.readings.clone(),
        }
    }

    pub const fn key(&self) -> PeriodKey {
        PeriodKey::new(self.year, self.month)
    }
}

impl TryFrom<PeriodRecord> for MonthPeriod {
    type Error = Error;

    /// Restore the period, the derived totals are dropped and recomputed on demand.
    fn try_from(record: PeriodRecord) -> Result<Self> {
        let key = record.key();
        ensure!(
            record.initial_reading.is_finite() && record.initial_reading >= KilowattHours::ZERO,
            "`{key}` has invalid initial reading {}",
            record.initial_reading,
        );
        validate_reading_day(record.reading_day).with_context(|| format!("invalid `{key}`"))?;
        let mut readings = record.readings;
        readings.sort_by_key(|reading| reading.date);
        Ok(Self {
            key,
            initial_reading: record.initial_reading,
            reading_day: record.reading_day,
            readings,
            tariff_flag: record.tariff_flag,
        })
    }
}
