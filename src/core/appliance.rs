use std::{fs, path::Path};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    core::{engine::estimate_cost, flag::TariffFlag, tariff::Tariff},
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours, power::Watts},
};

#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Appliance {
    pub name: String,

    #[serde(rename = "power_watts")]
    pub power: Watts,

    pub hours_per_day: f64,

    #[serde(default = "Appliance::default_days_per_month")]
    pub days_per_month: u32,

    #[serde(default = "Appliance::default_quantity")]
    pub quantity: u32,
}

impl Appliance {
    const fn default_days_per_month() -> u32 {
        30
    }

    const fn default_quantity() -> u32 {
        1
    }

    pub fn validate(&self) -> Result {
        ensure!(
            self.power.is_finite() && self.power >= Watts::ZERO,
            "`{}`: power must be non-negative",
            self.name,
        );
        ensure!(
            (0.0..=24.0).contains(&self.hours_per_day),
            "`{}`: hours per day must be within 0..=24",
            self.name,
        );
        ensure!(self.days_per_month <= 31, "`{}`: days per month must be within 0..=31", self.name);
        Ok(())
    }

    pub fn monthly_consumption(&self) -> KilowattHours {
        self.power.over_hours(self.hours_per_day)
            * f64::from(self.days_per_month)
            * f64::from(self.quantity)
    }
}

#[derive(Deserialize)]
struct ApplianceFile {
    #[serde(default, rename = "appliance")]
    appliances: Vec<Appliance>,
}

/// Read `[[appliance]]` tables from the TOML file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_appliances(path: &Path) -> Result<Vec<Appliance>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read `{}`", path.display()))?;
    let appliances = toml::from_str::<ApplianceFile>(&text)
        .with_context(|| format!("failed to parse `{}`", path.display()))?
        .appliances;
    for appliance in &appliances {
        appliance.validate()?;
    }
    info!(n_appliances = appliances.len(), "loaded");
    Ok(appliances)
}

#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct ApplianceEstimate {
    pub name: String,

    #[serde(rename = "monthlyConsumption")]
    pub monthly_consumption: KilowattHours,

    /// Energy only, without the fixed fees.
    #[serde(rename = "energyCost")]
    pub energy_cost: Cost,

    /// Fraction of the total consumption.
    pub share: f64,
}

#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct ApplianceReport {
    pub flag: TariffFlag,
    pub appliances: Vec<ApplianceEstimate>,

    #[serde(rename = "totalConsumption")]
    pub total_consumption: KilowattHours,

    /// Whole bill, including the fixed fees.
    #[serde(rename = "estimatedCost")]
    pub estimated_cost: Cost,
}

pub fn estimate_appliances(
    appliances: &[Appliance],
    tariff: &Tariff,
    flag: TariffFlag,
) -> ApplianceReport {
    let total_consumption: KilowattHours =
        appliances.iter().map(Appliance::monthly_consumption).sum();
    let price = tariff.schedule().prices.get(flag);
    let estimates = appliances
        .iter()
        .map(|appliance| {
            let monthly_consumption = appliance.monthly_consumption();
            ApplianceEstimate {
                name: appliance.name.clone(),
                monthly_consumption,
                energy_cost: monthly_consumption * price,
                share: if total_consumption > KilowattHours::ZERO {
                    monthly_consumption / total_consumption
                } else {
                    0.0
                },
            }
        })
        .collect_vec();
    ApplianceReport {
        flag,
        appliances: estimates,
        total_consumption,
        estimated_cost: estimate_cost(total_consumption, tariff, flag),
    }
}
