use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    db::{PeriodRecord, Storage},
    prelude::*,
};

/// TOML document with all the periods.
#[must_use]
pub struct FileStorage {
    path: PathBuf,
}

#[derive(Default, Serialize, Deserialize)]
struct Document {
    #[serde(default, rename = "period")]
    periods: Vec<PeriodRecord>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<Document> {
        if self.path.is_file() {
            let text = fs::read_to_string(&self.path)
                .with_context(|| format!("failed to read `{}`", self.path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("failed to parse `{}`", self.path.display()))
        } else {
            Ok(Document::default())
        }
    }

    fn write(&self, document: &Document) -> Result {
        fs::write(&self.path, toml::to_string(document)?)
            .with_context(|| format!("failed to write `{}`", self.path.display()))
    }
}

impl Storage for FileStorage {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn load(&self) -> Result<Vec<PeriodRecord>> {
        let periods = self.read()?.periods;
        debug!(n_periods = periods.len(), "loaded");
        Ok(periods)
    }

    #[instrument(skip_all, fields(path = %self.path.display(), period = %record.key()))]
    fn save(&self, record: &PeriodRecord) -> Result {
        let mut document = self.read()?;
        document.periods.retain(|period| period.key() != record.key());
        document.periods.push(record.clone());
        document.periods.sort_by_key(PeriodRecord::key);
        self.write(&document)?;
        debug!("saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use chrono::NaiveDate;

    use super::*;
    use crate::{
        core::{
            flag::TariffFlag,
            month::PeriodKey,
            reading::{Reading, ReadingId},
        },
        quantity::{cost::Cost, energy::KilowattHours},
    };

    fn temporary_path() -> PathBuf {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        env::temp_dir().join(format!("bandeira-{}-{nanos}.toml", std::process::id()))
    }

    fn record(period: &str, initial_reading: f64) -> PeriodRecord {
        let key: PeriodKey = period.parse().unwrap();
        PeriodRecord {
            month: key.month,
            year: key.year,
            initial_reading: KilowattHours(initial_reading),
            reading_day: Some(10),
            total_consumption: KilowattHours(12.5),
            estimated_cost: Cost(51.06),
            tariff_flag: TariffFlag::Yellow,
            readings: vec![Reading {
                id: ReadingId(1_760_000_000_000),
                date: NaiveDate::from_ymd_opt(key.year, key.month.number(), 2).unwrap(),
                value: KilowattHours(initial_reading + 12.5),
                consumption: Some(KilowattHours(12.5)),
            }],
        }
    }

    #[test]
    fn test_missing_file_is_empty() -> Result {
        assert!(FileStorage::new(temporary_path()).load()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> Result {
        let path = temporary_path();
        let storage = FileStorage::new(&path);
        storage.save(&record("2026-10", 100.0))?;
        storage.save(&record("2026-09", 50.0))?;
        storage.save(&record("2026-10", 200.0))?;

        let periods = storage.load()?;
        fs::remove_file(&path)?;

        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0], record("2026-09", 50.0));
        assert_eq!(periods[1], record("2026-10", 200.0));
        Ok(())
    }
}
