//! Meter reading log of a single period.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    core::{
        month::PeriodKey,
        period::MonthPeriod,
        reading::{Reading, ReadingId},
    },
    prelude::*,
    quantity::energy::KilowattHours,
};

/// Rejected reading, the message is meant to be shown to the user as is.
#[derive(Copy, Clone, Debug, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ReadingError {
    #[display("enter a valid positive number")]
    InvalidNumber,

    #[display("the reading must be greater than the initial reading ({initial_reading})")]
    BelowInitialReading { initial_reading: KilowattHours },

    #[display("the reading must be greater than the last reading ({last_reading})")]
    BelowLastReading { last_reading: KilowattHours },

    #[display("period {key} is not started yet, set its initial reading first")]
    PeriodNotStarted { key: PeriodKey },

    #[display("no reading ID is left after {last_id}, delete that reading first")]
    IdsExhausted { last_id: ReadingId },
}

/// Validation outcome in the shape the presentation layer expects.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    #[serde(rename = "isValid")]
    pub is_valid: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> From<&Result<T, ReadingError>> for ValidationResult {
    fn from(result: &Result<T, ReadingError>) -> Self {
        match result {
            Ok(_) => Self { is_valid: true, message: None },
            Err(error) => Self { is_valid: false, message: Some(error.to_string()) },
        }
    }
}

/// Parse a user-entered meter value, accepting either decimal separator.
pub fn parse_value(text: &str) -> Result<f64, ReadingError> {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(ReadingError::InvalidNumber)
}

/// Validate the new meter value against the period and append it.
///
/// The initial reading is checked before the last reading.
#[instrument(skip_all, fields(period = %period.key, date = %date, value = value))]
pub fn validate_and_add(
    period: &mut MonthPeriod,
    date: NaiveDate,
    value: f64,
    now_millis: i64,
) -> Result<ReadingId, ReadingError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ReadingError::InvalidNumber);
    }
    let value = KilowattHours(value);
    if value <= period.initial_reading {
        return Err(ReadingError::BelowInitialReading { initial_reading: period.initial_reading });
    }
    if let Some(last_reading) = period.last_value()
        && value <= last_reading
    {
        return Err(ReadingError::BelowLastReading { last_reading });
    }

    let id = ReadingId::next(now_millis, &period.readings)
        .ok_or(ReadingError::IdsExhausted { last_id: ReadingId(i64::MAX) })?;
    period.readings.push(Reading {
        id,
        date,
        value,
        consumption: Some(value - period.initial_reading),
    });
    period.readings.sort_by_key(|reading| reading.date);
    debug!(%id, n_readings = period.readings.len(), "added");
    Ok(id)
}

/// Remove the reading, returns whether it has been there.
pub fn delete_reading(period: &mut MonthPeriod, id: ReadingId) -> bool {
    let n_readings = period.readings.len();
    period.readings.retain(|reading| reading.id != id);
    period.readings.len() != n_readings
}

/// Lower bound for the next reading.
pub fn current_reading(period: &MonthPeriod) -> KilowattHours {
    period.last_value().unwrap_or(period.initial_reading)
}

/// Drop the readings, keeping the period metadata.
pub fn reset(period: &mut MonthPeriod) {
    period.readings.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::flag::TariffFlag;

    fn period(initial_reading: f64) -> MonthPeriod {
        MonthPeriod::try_new(
            PeriodKey::containing(date(1)),
            KilowattHours(initial_reading),
            Some(5),
        )
        .unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    #[test]
    fn test_equal_to_initial_reading() {
        let mut period = period(65788.0);
        assert_eq!(
            validate_and_add(&mut period, date(2), 65788.0, 1),
            Err(ReadingError::BelowInitialReading { initial_reading: KilowattHours(65788.0) }),
        );
        assert!(period.readings.is_empty());
    }

    #[test]
    fn test_add_ok() {
        let mut period = period(65788.0);
        let id = validate_and_add(&mut period, date(2), 65900.0, 1).unwrap();
        assert_eq!(period.total_consumption(), KilowattHours(112.0));
        assert_eq!(period.readings[0].id, id);
        assert_eq!(period.readings[0].consumption, Some(KilowattHours(112.0)));
    }

    #[test]
    fn test_invalid_numbers() {
        let mut period = period(100.0);
        for value in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert_eq!(
                validate_and_add(&mut period, date(2), value, 1),
                Err(ReadingError::InvalidNumber),
            );
        }
    }

    #[test]
    fn test_below_last_reading() {
        let mut period = period(100.0);
        validate_and_add(&mut period, date(2), 150.0, 1).unwrap();
        assert_eq!(
            validate_and_add(&mut period, date(3), 150.0, 2),
            Err(ReadingError::BelowLastReading { last_reading: KilowattHours(150.0) }),
        );
    }

    #[test]
    fn test_initial_reading_is_checked_first() {
        let mut period = period(100.0);
        validate_and_add(&mut period, date(2), 150.0, 1).unwrap();
        assert_eq!(
            validate_and_add(&mut period, date(3), 90.0, 2),
            Err(ReadingError::BelowInitialReading { initial_reading: KilowattHours(100.0) }),
        );
    }

    #[test]
    fn test_compares_against_max_regardless_of_date() {
        let mut period = period(100.0);
        validate_and_add(&mut period, date(20), 200.0, 1).unwrap();
        assert_eq!(
            validate_and_add(&mut period, date(10), 150.0, 2),
            Err(ReadingError::BelowLastReading { last_reading: KilowattHours(200.0) }),
        );
    }

    #[test]
    fn test_increasing_sequence_always_succeeds() {
        let mut period = period(1_000.0);
        for (i, value) in [1_000.5, 1_010.0, 1_010.25, 1_100.0, 2_000.0].into_iter().enumerate() {
            let day = u32::try_from(i).unwrap() + 1;
            validate_and_add(&mut period, date(day), value, 1).unwrap();
            assert_eq!(current_reading(&period), KilowattHours(value));
        }
        let ids: Vec<_> = period.readings.iter().map(|reading| reading.id).collect();
        assert_eq!(ids, [ReadingId(1), ReadingId(2), ReadingId(3), ReadingId(4), ReadingId(5)]);
    }

    #[test]
    fn test_sorted_by_date() {
        let mut period = period(100.0);
        validate_and_add(&mut period, date(20), 110.0, 1).unwrap();
        validate_and_add(&mut period, date(5), 120.0, 2).unwrap();
        let dates: Vec<_> = period.readings.iter().map(|reading| reading.date).collect();
        assert_eq!(dates, [date(5), date(20)]);
    }

    #[test]
    fn test_stored_max_id_is_rejected() {
        let mut period = period(100.0);
        period.readings.push(Reading {
            id: ReadingId(i64::MAX),
            date: date(1),
            value: KilowattHours(105.0),
            consumption: None,
        });
        assert_eq!(
            validate_and_add(&mut period, date(2), 110.0, 1_760_000_000_000),
            Err(ReadingError::IdsExhausted { last_id: ReadingId(i64::MAX) }),
        );
        assert_eq!(period.readings.len(), 1);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut period = period(100.0);
        validate_and_add(&mut period, date(2), 110.0, 1).unwrap();
        let before = period.readings.clone();
        assert!(!delete_reading(&mut period, ReadingId(42)));
        assert_eq!(period.readings, before);
    }

    #[test]
    fn test_delete_existing() {
        let mut period = period(100.0);
        let id = validate_and_add(&mut period, date(2), 110.0, 1).unwrap();
        assert!(delete_reading(&mut period, id));
        assert_eq!(current_reading(&period), KilowattHours(100.0));
    }

    #[test]
    fn test_reset_keeps_metadata() {
        let mut period = period(100.0);
        period.tariff_flag = TariffFlag::RedLevel1;
        validate_and_add(&mut period, date(2), 110.0, 1).unwrap();
        reset(&mut period);
        assert!(period.readings.is_empty());
        assert_eq!(period.initial_reading, KilowattHours(100.0));
        assert_eq!(period.reading_day, Some(5));
        assert_eq!(period.tariff_flag, TariffFlag::RedLevel1);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(" 65900,5 "), Ok(65900.5));
        assert_eq!(parse_value("65900.5"), Ok(65900.5));
        assert_eq!(parse_value("abc"), Err(ReadingError::InvalidNumber));
        assert_eq!(parse_value("NaN"), Err(ReadingError::InvalidNumber));
    }

    #[test]
    fn test_validation_result() {
        let result: Result<(), _> = Err(ReadingError::BelowInitialReading {
            initial_reading: KilowattHours(65788.0),
        });
        let validation = ValidationResult::from(&result);
        assert!(!validation.is_valid);
        assert_eq!(
            validation.message.as_deref(),
            Some("the reading must be greater than the initial reading (65788.0 kWh)"),
        );
    }
}
