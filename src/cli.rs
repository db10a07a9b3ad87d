mod ledger;
mod report;
mod storage;
mod tariff;

use chrono::Local;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use serde::Serialize;

use crate::{
    cli::{
        ledger::{AddArgs, DeleteArgs, FlagArgs, MonthArgs},
        report::{AppliancesArgs, ImpactArgs},
        storage::StorageArgs,
        tariff::TariffArgs,
    },
    core::{
        month::PeriodKey,
        session::{Session, Tracker},
    },
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    /// Billing period as `YYYY-MM`, defaults to the current month.
    #[clap(long, global = true, env = "PERIOD")]
    period: Option<PeriodKey>,

    /// Print JSON instead of the tables.
    #[clap(long, global = true)]
    json: bool,

    #[clap(flatten)]
    storage: StorageArgs,

    #[clap(flatten)]
    tariff: TariffArgs,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn run(self) -> Result {
        let now = Local::now().naive_local();
        let active_key = self.period.unwrap_or_else(|| PeriodKey::containing(now.date()));
        let tariff = self.tariff.build()?;
        let storage = self.storage.open()?;
        let session = Session::from_records(storage.load()?, active_key)?;
        info!(period = %active_key, n_periods = session.periods.len(), "loaded the session");
        let mut tracker =
            Tracker::builder().session(session).tariff(tariff).storage(storage).now(now).build();
        let output = Output { json: self.json };

        match self.command {
            Command::Month(args) => args.run(&mut tracker, output),
            Command::Add(args) => args.run(&mut tracker, output),
            Command::Delete(args) => args.run(&mut tracker, output),
            Command::Flag(args) => args.run(&mut tracker, output),
            Command::Reset => ledger::reset(&mut tracker, output),
            Command::Readings => ledger::readings(&tracker, output),
            Command::Stats => report::stats(&tracker, output),
            Command::Compare => report::compare(&tracker, output),
            Command::Impact(args) => args.run(&tracker, output),
            Command::Appliances(args) => args.run(&tracker, output),
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Switch to the period, starting it with the initial meter reading if needed.
    Month(MonthArgs),

    /// Record a meter reading.
    Add(AddArgs),

    /// Delete the reading by its ID.
    Delete(DeleteArgs),

    /// Set the tariff flag of the period.
    Flag(FlagArgs),

    /// Delete all the period readings, keeping the initial reading and the flag.
    Reset,

    /// List the period readings.
    Readings,

    /// Show the consumption statistics and the estimated bill.
    Stats,

    /// Compare the bill under each of the tariff flags.
    Compare,

    /// Show how much a flag change would cost.
    Impact(ImpactArgs),

    /// Estimate the monthly consumption of the household appliances.
    Appliances(AppliancesArgs),
}

#[derive(Copy, Clone)]
pub struct Output {
    json: bool,
}

impl Output {
    fn print<T: Serialize>(self, value: &T, build_table: impl FnOnce(&T) -> Table) -> Result {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", build_table(value));
        }
        Ok(())
    }
}
