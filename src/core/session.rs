use std::collections::BTreeMap;

use bon::Builder;
use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::{
    core::{
        engine::{self, TierImpact},
        flag::TariffFlag,
        ledger::{self, ReadingError},
        month::PeriodKey,
        period::{MonthPeriod, validate_reading_day},
        reading::ReadingId,
        stats::{ConsumptionStats, compute_stats},
        tariff::Tariff,
    },
    db::{PeriodRecord, Storage},
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours},
};

/// All loaded periods and the one being edited.
#[must_use]
#[derive(Clone, Debug)]
pub struct Session {
    pub periods: BTreeMap<PeriodKey, MonthPeriod>,
    pub active_key: PeriodKey,
}

impl Session {
    pub const fn new(active_key: PeriodKey) -> Self {
        Self { periods: BTreeMap::new(), active_key }
    }

    pub fn from_records(
        records: impl IntoIterator<Item = PeriodRecord>,
        active_key: PeriodKey,
    ) -> Result<Self> {
        let periods = records
            .into_iter()
            .map(|record| MonthPeriod::try_from(record).map(|period| (period.key, period)))
            .collect::<Result<_>>()?;
        Ok(Self { periods, active_key })
    }

    pub fn active_period(&self) -> Option<&MonthPeriod> {
        self.periods.get(&self.active_key)
    }

    pub fn require_active_period(&self) -> Result<&MonthPeriod, ReadingError> {
        self.active_period().ok_or(ReadingError::PeriodNotStarted { key: self.active_key })
    }

    fn active_period_mut(&mut self) -> Result<&mut MonthPeriod, ReadingError> {
        self.periods
            .get_mut(&self.active_key)
            .ok_or(ReadingError::PeriodNotStarted { key: self.active_key })
    }
}

/// Applies the user actions to the session and mirrors every change to the storage.
#[must_use]
#[derive(Builder)]
pub struct Tracker {
    session: Session,

    tariff: Tariff,

    storage: Box<dyn Storage>,

    #[builder(default = Local::now().naive_local())]
    now: NaiveDateTime,
}

impl Tracker {
    pub const fn session(&self) -> &Session {
        &self.session
    }

    pub const fn tariff(&self) -> &Tariff {
        &self.tariff
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    /// Switch to the period, creating it when it is not known yet.
    #[instrument(skip_all, fields(period = %key))]
    pub fn change_month(
        &mut self,
        key: PeriodKey,
        initial_reading: Option<KilowattHours>,
        reading_day: Option<u32>,
    ) -> Result<&MonthPeriod> {
        validate_reading_day(reading_day)?;
        if let Some(period) = self.session.periods.get_mut(&key) {
            if let Some(initial_reading) = initial_reading
                && initial_reading != period.initial_reading
            {
                warn!(%initial_reading, kept = %period.initial_reading, "period already exists");
            }
            let is_reading_day_changed = reading_day.is_some() && reading_day != period.reading_day;
            if is_reading_day_changed {
                period.reading_day = reading_day;
            }
            self.session.active_key = key;
            if is_reading_day_changed {
                self.sync();
            }
        } else {
            let initial_reading = initial_reading.ok_or(ReadingError::PeriodNotStarted { key })?;
            let period = MonthPeriod::try_new(key, initial_reading, reading_day)?;
            info!(%initial_reading, "starting a new period");
            self.session.periods.insert(key, period);
            self.session.active_key = key;
            self.sync();
        }
        self.session.active_period().context("the active period has just been set")
    }

    pub fn add_reading(&mut self, date: NaiveDate, value: f64) -> Result<ReadingId, ReadingError> {
        let now_millis = self.now.and_utc().timestamp_millis();
        let period = self.session.active_period_mut()?;
        let id = ledger::validate_and_add(period, date, value, now_millis)?;
        self.sync();
        Ok(id)
    }

    /// Deleting an unknown reading leaves the readings intact, the period is still synced.
    pub fn delete_reading(&mut self, id: ReadingId) -> bool {
        let Ok(period) = self.session.active_period_mut() else {
            return false;
        };
        let is_deleted = ledger::delete_reading(period, id);
        if !is_deleted {
            debug!(%id, "nothing to delete");
        }
        self.sync();
        is_deleted
    }

    pub fn change_flag(&mut self, flag: TariffFlag) -> Result<(), ReadingError> {
        self.session.active_period_mut()?.tariff_flag = flag;
        self.sync();
        Ok(())
    }

    pub fn reset_period(&mut self) -> Result<(), ReadingError> {
        ledger::reset(self.session.active_period_mut()?);
        self.sync();
        Ok(())
    }

    /// Lower bound for the next reading.
    pub fn current_reading(&self) -> Option<KilowattHours> {
        self.session.active_period().map(ledger::current_reading)
    }

    pub fn flag(&self) -> TariffFlag {
        self.session.active_period().map(|period| period.tariff_flag).unwrap_or_default()
    }

    pub fn total_consumption(&self) -> KilowattHours {
        self.session.active_period().map_or(KilowattHours::ZERO, MonthPeriod::total_consumption)
    }

    /// Statistics of the active period, an unknown period has no readings.
    pub fn stats(&self) -> Result<ConsumptionStats> {
        match self.session.active_period() {
            Some(period) => self.period_stats(period),
            None => {
                compute_stats(&[], KilowattHours::ZERO, &self.tariff, self.flag(), self.today())
            }
        }
    }

    pub fn compare_all_tiers(&self) -> BTreeMap<TariffFlag, Cost> {
        engine::compare_all_tiers(self.total_consumption(), self.tariff.schedule())
    }

    pub fn tier_impact(&self, from: TariffFlag, to: TariffFlag) -> TierImpact {
        engine::tier_impact(self.total_consumption(), self.tariff.schedule(), from, to)
    }

    fn period_stats(&self, period: &MonthPeriod) -> Result<ConsumptionStats> {
        compute_stats(
            &period.readings,
            period.initial_reading,
            &self.tariff,
            period.tariff_flag,
            self.today(),
        )
    }

    /// Mirror the active period to the storage, failures are only logged.
    fn sync(&self) {
        let Some(period) = self.session.active_period() else {
            return;
        };
        let result = self
            .period_stats(period)
            .and_then(|stats| self.storage.save(&PeriodRecord::new(period, &stats)));
        if let Err(error) = result {
            error!(period = %period.key, "failed to save the period: {error:#}");
        }
    }
}
