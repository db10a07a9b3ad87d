use chrono::NaiveDate;
use clap::Parser;

use crate::{
    cli::{Output, report},
    core::{
        flag::TariffFlag,
        ledger::{ValidationResult, parse_value},
        reading::ReadingId,
        session::Tracker,
    },
    prelude::*,
    quantity::energy::KilowattHours,
    tables::build_readings_table,
};

#[derive(Parser)]
pub struct MonthArgs {
    /// Meter value at the start of the period, required for a new period.
    #[clap(long = "initial-reading")]
    initial_reading: Option<KilowattHours>,

    /// Day of month when the utility reads the meter.
    #[clap(long = "reading-day")]
    reading_day: Option<u32>,
}

impl MonthArgs {
    pub fn run(self, tracker: &mut Tracker, output: Output) -> Result {
        let key = tracker.session().active_key;
        tracker.change_month(key, self.initial_reading, self.reading_day)?;
        report::stats(tracker, output)
    }
}

#[derive(Parser)]
pub struct AddArgs {
    /// Meter value in kilowatt-hours, either decimal separator is accepted.
    value: String,

    /// Reading date, defaults to today.
    #[clap(long)]
    date: Option<NaiveDate>,
}

impl AddArgs {
    pub fn run(self, tracker: &mut Tracker, output: Output) -> Result {
        let date = self.date.unwrap_or_else(|| tracker.today());
        let result = parse_value(&self.value).and_then(|value| tracker.add_reading(date, value));
        if output.json {
            println!("{}", serde_json::to_string_pretty(&ValidationResult::from(&result))?);
        }
        let id = result?;
        info!(%id, %date, "added the reading");
        if !output.json {
            readings(tracker, output)?;
        }
        Ok(())
    }
}

#[derive(Parser)]
pub struct DeleteArgs {
    id: ReadingId,
}

impl DeleteArgs {
    pub fn run(self, tracker: &mut Tracker, output: Output) -> Result {
        if tracker.delete_reading(self.id) {
            info!(id = %self.id, "deleted the reading");
        } else {
            warn!(id = %self.id, "no such reading");
        }
        readings(tracker, output)
    }
}

#[derive(Parser)]
pub struct FlagArgs {
    #[clap(value_enum)]
    flag: TariffFlag,
}

impl FlagArgs {
    pub fn run(self, tracker: &mut Tracker, output: Output) -> Result {
        tracker.change_flag(self.flag)?;
        info!(flag = %self.flag, "changed the flag");
        report::stats(tracker, output)
    }
}

pub fn reset(tracker: &mut Tracker, output: Output) -> Result {
    tracker.reset_period()?;
    info!("cleared the readings");
    report::stats(tracker, output)
}

pub fn readings(tracker: &Tracker, output: Output) -> Result {
    let period = tracker.session().require_active_period()?;
    output.print(&period.readings, |_| build_readings_table(period))
}
