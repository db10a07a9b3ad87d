use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use chrono::{Datelike, NaiveDate};

use crate::prelude::*;

/// Calendar month number, `1..=12`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MonthOfYear(u32);

impl MonthOfYear {
    const NAMES: [&'static str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];

    pub fn try_new(number: u32) -> Result<Self> {
        ensure!((1..=12).contains(&number), "month must be within 1..=12, got {number}");
        Ok(Self(number))
    }

    pub const fn number(self) -> u32 {
        self.0
    }

    pub const fn name(self) -> &'static str {
        Self::NAMES[(self.0 - 1) as usize]
    }
}

impl Display for MonthOfYear {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MonthOfYear {
    type Err = Error;

    /// Parse a month number, a full English name, or its three-letter abbreviation.
    fn from_str(text: &str) -> Result<Self> {
        let text = text.trim();
        if let Ok(number) = text.parse::<u32>() {
            return Self::try_new(number);
        }
        let lowercase = text.to_lowercase();
        Self::NAMES
            .iter()
            .zip(1..)
            .find(|(name, _)| {
                let name = name.to_lowercase();
                name == lowercase || (lowercase.len() == 3 && name.starts_with(&lowercase))
            })
            .map(|(_, number)| Self(number))
            .with_context(|| format!("unknown month `{text}`"))
    }
}

/// Billing period: one calendar month of a year.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PeriodKey {
    pub year: i32,
    pub month: MonthOfYear,
}

impl PeriodKey {
    pub const fn new(year: i32, month: MonthOfYear) -> Self {
        Self { year, month }
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self { year: date.year(), month: MonthOfYear(date.month()) }
    }

    pub fn first_day(self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.number(), 1)
            .with_context(|| format!("`{self}` is out of the supported date range"))
    }

    pub fn days_in_month(self) -> Result<u32> {
        let first_day = self.first_day()?;
        let next_first_day = if self.month.number() == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month.number() + 1, 1)
        }
        .with_context(|| format!("`{self}` is out of the supported date range"))?;
        let days = next_first_day.signed_duration_since(first_day).num_days();
        u32::try_from(days).context("negative month length")
    }
}

impl Display for PeriodKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month.number())
    }
}

impl FromStr for PeriodKey {
    type Err = Error;

    /// Parse `YYYY-MM`.
    fn from_str(text: &str) -> Result<Self> {
        let (year, month) = text
            .trim()
            .split_once('-')
            .with_context(|| format!("expected `YYYY-MM`, got `{text}`"))?;
        Ok(Self {
            year: year.parse().with_context(|| format!("invalid year in `{text}`"))?,
            month: month.parse()?,
        })
    }
}
