use crate::{
    core::{flag::TariffFlag, month::PeriodKey, reading::Reading},
    prelude::*,
    quantity::energy::KilowattHours,
};

/// Readings of a single billing month.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct MonthPeriod {
    pub key: PeriodKey,

    /// Meter value at the start of the period.
    pub initial_reading: KilowattHours,

    /// Day of month when the meter is nominally read by the utility.
    pub reading_day: Option<u32>,

    /// Sorted by date.
    pub readings: Vec<Reading>,

    pub tariff_flag: TariffFlag,
}

impl MonthPeriod {
    pub fn try_new(
        key: PeriodKey,
        initial_reading: KilowattHours,
        reading_day: Option<u32>,
    ) -> Result<Self> {
        ensure!(
            initial_reading.is_finite() && initial_reading >= KilowattHours::ZERO,
            "initial reading must be a non-negative number, got {initial_reading}",
        );
        validate_reading_day(reading_day)?;
        Ok(Self {
            key,
            initial_reading,
            reading_day,
            readings: Vec::new(),
            tariff_flag: TariffFlag::default(),
        })
    }

    /// Highest recorded meter value, if any.
    pub fn last_value(&self) -> Option<KilowattHours> {
        self.readings.iter().map(|reading| reading.value).max()
    }

    pub fn total_consumption(&self) -> KilowattHours {
        self.last_value().map_or(KilowattHours::ZERO, |value| value - self.initial_reading)
    }
}

pub fn validate_reading_day(reading_day: Option<u32>) -> Result {
    if let Some(day) = reading_day {
        ensure!((1..=31).contains(&day), "reading day must be within 1..=31, got {day}");
    }
    Ok(())
}
