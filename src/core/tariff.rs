use std::fmt::{Debug, Formatter};

use bon::Builder;

use crate::{
    core::flag::TariffFlag,
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours, price::KilowattHourPrice},
};

#[derive(Copy, Clone, Debug, PartialEq, derive_more::Display, derive_more::Error)]
pub enum TariffError {
    #[display("{flag} price must be positive, got {price}")]
    NonPositivePrice { flag: TariffFlag, price: KilowattHourPrice },

    #[display("{name} must be non-negative, got {fee}")]
    NegativeFee { name: &'static str, fee: Cost },
}

/// Per-kilowatt-hour price for every tariff flag.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Builder)]
pub struct TierPrices {
    pub green: KilowattHourPrice,
    pub yellow: KilowattHourPrice,
    pub red_level_1: KilowattHourPrice,
    pub red_level_2: KilowattHourPrice,
}

impl TierPrices {
    /// Base price plus the official surcharges.
    pub const fn official(base: KilowattHourPrice) -> Self {
        Self {
            green: KilowattHourPrice(base.0 + TariffFlag::Green.official_surcharge().0),
            yellow: KilowattHourPrice(base.0 + TariffFlag::Yellow.official_surcharge().0),
            red_level_1: KilowattHourPrice(base.0 + TariffFlag::RedLevel1.official_surcharge().0),
            red_level_2: KilowattHourPrice(base.0 + TariffFlag::RedLevel2.official_surcharge().0),
        }
    }

    pub const fn get(&self, flag: TariffFlag) -> KilowattHourPrice {
        match flag {
            TariffFlag::Green => self.green,
            TariffFlag::Yellow => self.yellow,
            TariffFlag::RedLevel1 => self.red_level_1,
            TariffFlag::RedLevel2 => self.red_level_2,
        }
    }
}

/// Fixed monthly charges, independent of the consumption.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Builder)]
pub struct Fees {
    #[builder(default)]
    pub additional: Cost,

    /// «Contribuição de iluminação pública».
    #[builder(default)]
    pub public_lighting: Cost,
}

impl Fees {
    pub fn total(&self) -> Cost {
        self.additional + self.public_lighting
    }
}

/// Validated prices and fees.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Schedule {
    pub prices: TierPrices,
    pub fees: Fees,
}

impl Schedule {
    pub fn try_new(prices: TierPrices, fees: Fees) -> Result<Self, TariffError> {
        for flag in enumset::EnumSet::<TariffFlag>::all() {
            let price = prices.get(flag);
            if !price.is_finite() || price <= KilowattHourPrice::ZERO {
                return Err(TariffError::NonPositivePrice { flag, price });
            }
        }
        let named_fees =
            [("additional fees", fees.additional), ("public lighting fee", fees.public_lighting)];
        for (name, fee) in named_fees {
            if !fee.is_finite() || fee < Cost::ZERO {
                return Err(TariffError::NegativeFee { name, fee });
            }
        }
        Ok(Self { prices, fees })
    }
}

/// Alternative way to price the consumption.
///
/// Failures are not fatal: the caller falls back to the linear formula.
pub trait CostFunction {
    fn cost(&self, consumption: KilowattHours, flag: TariffFlag) -> Result<Cost>;
}

impl<F> CostFunction for F
where
    F: Fn(KilowattHours, TariffFlag) -> Result<Cost>,
{
    fn cost(&self, consumption: KilowattHours, flag: TariffFlag) -> Result<Cost> {
        self(consumption, flag)
    }
}

pub enum Tariff {
    Standard(Schedule),
    Custom(Schedule, Box<dyn CostFunction>),
}

impl Tariff {
    pub const fn schedule(&self) -> &Schedule {
        match self {
            Self::Standard(schedule) | Self::Custom(schedule, _) => schedule,
        }
    }
}

impl Debug for Tariff {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard(schedule) => f.debug_tuple("Standard").field(schedule).finish(),
            Self::Custom(schedule, _) => f.debug_tuple("Custom").field(schedule).finish(),
        }
    }
}

/// ICMS and PIS/COFINS charged «por dentro»: the taxes are part of their own base.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct TaxInclusive {
    pub schedule: Schedule,

    /// ICMS rate, for example `0.18`.
    pub icms: f64,

    /// Combined PIS and COFINS rate, for example `0.0465`.
    pub pis_cofins: f64,
}

impl CostFunction for TaxInclusive {
    fn cost(&self, consumption: KilowattHours, flag: TariffFlag) -> Result<Cost> {
        let rate = self.icms + self.pis_cofins;
        ensure!((0.0..1.0).contains(&rate), "combined tax rate must be within [0, 1), got {rate}");
        let energy = consumption * self.schedule.prices.get(flag);
        Ok(energy / (1.0 - rate) + self.schedule.fees.total())
    }
}

/// «Tarifa Social de Energia Elétrica»: progressive discounts on the energy portion.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct SocialTariff {
    pub schedule: Schedule,
}

impl SocialTariff {
    /// Upper bracket bound (inclusive) and the discount within the bracket.
    const BRACKETS: [(f64, f64); 4] =
        [(30.0, 0.65), (100.0, 0.40), (220.0, 0.10), (f64::INFINITY, 0.0)];
}

impl CostFunction for SocialTariff {
    fn cost(&self, consumption: KilowattHours, flag: TariffFlag) -> Result<Cost> {
        ensure!(consumption >= KilowattHours::ZERO, "negative consumption: {consumption}");
        let price = self.schedule.prices.get(flag);
        let mut lower_bound = 0.0;
        let mut energy = Cost::ZERO;
        for (upper_bound, discount) in Self::BRACKETS {
            if consumption.0 <= lower_bound {
                break;
            }
            let bracket = KilowattHours(consumption.0.min(upper_bound) - lower_bound);
            energy += bracket * price * (1.0 - discount);
            lower_bound = upper_bound;
        }
        Ok(energy + self.schedule.fees.total())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn schedule() -> Schedule {
        Schedule::try_new(
            TierPrices::official(KilowattHourPrice(0.795)),
            Fees::builder().additional(Cost(41.12)).build(),
        )
        .unwrap()
    }

    #[test]
    fn test_official_prices() {
        let prices = TierPrices::official(KilowattHourPrice(0.795));
        assert_abs_diff_eq!(prices.green.0, 0.795);
        assert_abs_diff_eq!(prices.yellow.0, 0.81385, epsilon = 1e-12);
        assert_abs_diff_eq!(prices.red_level_1.0, 0.83963, epsilon = 1e-12);
        assert_abs_diff_eq!(prices.red_level_2.0, 0.87377, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let prices = TierPrices {
            yellow: KilowattHourPrice(0.0),
            ..TierPrices::official(KilowattHourPrice(0.5))
        };
        assert_eq!(
            Schedule::try_new(prices, Fees::default()),
            Err(TariffError::NonPositivePrice {
                flag: TariffFlag::Yellow,
                price: KilowattHourPrice(0.0),
            }),
        );
    }

    #[test]
    fn test_rejects_negative_fee() {
        let result = Schedule::try_new(
            TierPrices::official(KilowattHourPrice(0.5)),
            Fees::builder().public_lighting(Cost(-1.0)).build(),
        );
        assert!(matches!(
            result,
            Err(TariffError::NegativeFee { name: "public lighting fee", .. })
        ));
    }

    #[test]
    fn test_tax_inclusive() -> Result {
        let function = TaxInclusive { schedule: schedule(), icms: 0.18, pis_cofins: 0.02 };
        let cost = function.cost(KilowattHours(100.0), TariffFlag::Green)?;
        assert_abs_diff_eq!(cost.0, 79.5 / 0.8 + 41.12, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_tax_inclusive_invalid_rate() {
        let function = TaxInclusive { schedule: schedule(), icms: 0.9, pis_cofins: 0.1 };
        assert!(function.cost(KilowattHours(100.0), TariffFlag::Green).is_err());
    }

    #[test]
    fn test_social_tariff() -> Result {
        let function = SocialTariff { schedule: schedule() };
        // 30 × 0.35 + 70 × 0.6 + 50 × 0.9 + 0 = 10.5 + 42 + 45 = 97.5 discounted kWh.
        let cost = function.cost(KilowattHours(150.0), TariffFlag::Green)?;
        assert_abs_diff_eq!(cost.0, 97.5 * 0.795 + 41.12, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_social_tariff_above_brackets() -> Result {
        let function = SocialTariff { schedule: schedule() };
        // 10.5 + 42 + 108 + 80 = 240.5 discounted kWh.
        let cost = function.cost(KilowattHours(300.0), TariffFlag::RedLevel2)?;
        assert_abs_diff_eq!(cost.0, 240.5 * 0.87377 + 41.12, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_closure_is_cost_function() -> Result {
        let function = |consumption: KilowattHours, _: TariffFlag| -> Result<Cost> {
            Ok(Cost(consumption.0 * 2.0))
        };
        assert_eq!(function.cost(KilowattHours(3.0), TariffFlag::Yellow)?, Cost(6.0));
        Ok(())
    }
}
