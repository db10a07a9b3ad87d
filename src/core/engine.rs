//! Consumption pricing, all functions are pure.

use std::collections::BTreeMap;

use enumset::EnumSet;
use serde::Serialize;

use crate::{
    core::{
        flag::TariffFlag,
        tariff::{Schedule, Tariff},
    },
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours},
};

/// Linear price of the consumption at the flag's rate plus the fixed fees.
pub fn compute_cost(consumption: KilowattHours, schedule: &Schedule, flag: TariffFlag) -> Cost {
    consumption * schedule.prices.get(flag) + schedule.fees.total()
}

/// Price the consumption with the tariff's own cost function, if any.
///
/// A failing cost function is replaced by [`compute_cost`].
pub fn estimate_cost(consumption: KilowattHours, tariff: &Tariff, flag: TariffFlag) -> Cost {
    match tariff {
        Tariff::Standard(schedule) => compute_cost(consumption, schedule, flag),
        Tariff::Custom(schedule, function) => {
            function.cost(consumption, flag).unwrap_or_else(|error| {
                warn!(%consumption, %flag, "cost function failed, using the linear one: {error:#}");
                compute_cost(consumption, schedule, flag)
            })
        }
    }
}

/// Cost of the same consumption under each of the flags.
pub fn compare_all_tiers(
    consumption: KilowattHours,
    schedule: &Schedule,
) -> BTreeMap<TariffFlag, Cost> {
    EnumSet::<TariffFlag>::all()
        .iter()
        .map(|flag| (flag, compute_cost(consumption, schedule, flag)))
        .collect()
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct TierImpact {
    pub from: TariffFlag,
    pub to: TariffFlag,

    /// `cost(to) − cost(from)`.
    pub difference: Cost,

    /// Difference relative to `cost(from)`, in percent.
    pub percentage: f64,
}

pub fn tier_impact(
    consumption: KilowattHours,
    schedule: &Schedule,
    from: TariffFlag,
    to: TariffFlag,
) -> TierImpact {
    let from_cost = compute_cost(consumption, schedule, from);
    let difference = compute_cost(consumption, schedule, to) - from_cost;
    let percentage = if from_cost == Cost::ZERO { 0.0 } else { difference / from_cost * 100.0 };
    TierImpact { from, to, difference, percentage }
}
