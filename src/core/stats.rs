use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{
    core::{
        engine::estimate_cost,
        flag::TariffFlag,
        month::PeriodKey,
        reading::Reading,
        tariff::Tariff,
    },
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours},
};

/// Derived from the readings and the tariff, never stored on its own.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct ConsumptionStats {
    #[serde(rename = "totalConsumption")]
    pub total_consumption: KilowattHours,

    /// Average per reading rather than per day.
    #[serde(rename = "averageDailyConsumption")]
    pub average_daily_consumption: KilowattHours,

    #[serde(rename = "monthlyProjection")]
    pub monthly_projection: KilowattHours,

    #[serde(rename = "estimatedCost")]
    pub estimated_cost: Cost,
}

/// Until this day of month the projection relies on the average instead of the elapsed days.
const EARLY_MONTH_LAST_DAY: u32 = 3;

pub fn compute_stats(
    readings: &[Reading],
    initial_reading: KilowattHours,
    tariff: &Tariff,
    flag: TariffFlag,
    today: NaiveDate,
) -> Result<ConsumptionStats> {
    let Some(last_value) = readings.iter().map(|reading| reading.value).max() else {
        return Ok(ConsumptionStats {
            total_consumption: KilowattHours::ZERO,
            average_daily_consumption: KilowattHours::ZERO,
            monthly_projection: KilowattHours::ZERO,
            estimated_cost: tariff.schedule().fees.total(),
        });
    };

    let total_consumption = last_value - initial_reading;

    #[expect(clippy::cast_precision_loss)]
    let average_daily_consumption = total_consumption / readings.len() as f64;

    let days_in_month = f64::from(PeriodKey::containing(today).days_in_month()?);
    let monthly_projection = if today.day() <= EARLY_MONTH_LAST_DAY {
        average_daily_consumption * days_in_month
    } else {
        let projection = total_consumption / f64::from(today.day()) * days_in_month;
        KilowattHours(projection.0.round())
    };

    Ok(ConsumptionStats {
        total_consumption,
        average_daily_consumption,
        monthly_projection,
        estimated_cost: estimate_cost(total_consumption, tariff, flag),
    })
}
