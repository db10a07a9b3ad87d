use clap::{Parser, ValueEnum};

use crate::{
    core::tariff::{Fees, Schedule, SocialTariff, TaxInclusive, Tariff, TierPrices},
    prelude::*,
    quantity::{cost::Cost, price::KilowattHourPrice},
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CostModel {
    /// Consumption times the flag price plus the fees.
    Linear,

    /// ICMS and PIS/COFINS on top of the energy portion.
    TaxInclusive,

    /// Tarifa Social discounts on the energy portion.
    SocialTariff,
}

#[derive(Parser)]
pub struct TariffArgs {
    /// Green flag price per kilowatt-hour, in reais.
    #[clap(long = "base-price", env = "BASE_PRICE")]
    base_price: KilowattHourPrice,

    /// Fixed monthly fees besides the public lighting.
    #[clap(long = "additional-fees", default_value = "0", env = "ADDITIONAL_FEES")]
    additional_fees: Cost,

    /// Monthly public lighting contribution («CIP»).
    #[clap(long = "public-lighting-fee", default_value = "0", env = "PUBLIC_LIGHTING_FEE")]
    public_lighting_fee: Cost,

    /// Accept custom flag prices instead of the official surcharges.
    #[clap(long = "unlock-surcharges", env = "UNLOCK_SURCHARGES")]
    unlock_surcharges: bool,

    #[clap(long = "yellow-price", env = "YELLOW_PRICE", requires = "unlock_surcharges")]
    yellow_price: Option<KilowattHourPrice>,

    #[clap(long = "red-1-price", env = "RED_1_PRICE", requires = "unlock_surcharges")]
    red_level_1_price: Option<KilowattHourPrice>,

    #[clap(long = "red-2-price", env = "RED_2_PRICE", requires = "unlock_surcharges")]
    red_level_2_price: Option<KilowattHourPrice>,

    #[clap(long = "cost-model", value_enum, default_value = "linear", env = "COST_MODEL")]
    cost_model: CostModel,

    /// ICMS rate for the tax-inclusive cost model.
    #[clap(long = "icms-rate", default_value = "0.18", env = "ICMS_RATE")]
    icms_rate: f64,

    /// Combined PIS and COFINS rate for the tax-inclusive cost model.
    #[clap(long = "pis-cofins-rate", default_value = "0.0465", env = "PIS_COFINS_RATE")]
    pis_cofins_rate: f64,
}

impl TariffArgs {
    fn prices(&self) -> TierPrices {
        let official = TierPrices::official(self.base_price);
        if !self.unlock_surcharges {
            return official;
        }
        TierPrices::builder()
            .green(self.base_price)
            .yellow(self.yellow_price.unwrap_or(official.yellow))
            .red_level_1(self.red_level_1_price.unwrap_or(official.red_level_1))
            .red_level_2(self.red_level_2_price.unwrap_or(official.red_level_2))
            .build()
    }

    fn fees(&self) -> Fees {
        Fees::builder()
            .additional(self.additional_fees)
            .public_lighting(self.public_lighting_fee)
            .build()
    }

    pub fn build(&self) -> Result<Tariff> {
        let schedule = Schedule::try_new(self.prices(), self.fees())?;
        debug!(?schedule, cost_model = ?self.cost_model, "built the tariff");
        let tariff = match self.cost_model {
            CostModel::Linear => Tariff::Standard(schedule),
            CostModel::TaxInclusive => {
                let function = TaxInclusive {
                    schedule,
                    icms: self.icms_rate,
                    pis_cofins: self.pis_cofins_rate,
                };
                Tariff::Custom(schedule, Box::new(function))
            }
            CostModel::SocialTariff => {
                Tariff::Custom(schedule, Box::new(SocialTariff { schedule }))
            }
        };
        Ok(tariff)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{
        core::{engine::estimate_cost, flag::TariffFlag},
        quantity::energy::KilowattHours,
    };

    fn parse(args: &[&str]) -> TariffArgs {
        TariffArgs::parse_from([&["bandeira"][..], args].concat())
    }

    #[test]
    fn test_official_prices() -> Result {
        let tariff = parse(&["--base-price", "0.795", "--additional-fees", "41.12"]).build()?;
        assert!(matches!(tariff, Tariff::Standard(_)));
        assert_abs_diff_eq!(tariff.schedule().prices.red_level_2.0, 0.87377, epsilon = 1e-12);
        assert_eq!(tariff.schedule().fees.total(), Cost(41.12));
        Ok(())
    }

    #[test]
    fn test_locked_surcharges() {
        let result = TariffArgs::try_parse_from([
            "bandeira",
            "--base-price",
            "0.795",
            "--yellow-price",
            "1.0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unlocked_surcharges() -> Result {
        let tariff = parse(&[
            "--base-price",
            "0.795",
            "--unlock-surcharges",
            "--yellow-price",
            "0.9",
        ])
        .build()?;
        let prices = tariff.schedule().prices;
        assert_eq!(prices.yellow, KilowattHourPrice(0.9));
        assert_abs_diff_eq!(prices.red_level_1.0, 0.83963, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_non_positive_price() {
        assert!(parse(&["--base-price", "0"]).build().is_err());
    }

    #[test]
    fn test_tax_inclusive() -> Result {
        let tariff = parse(&[
            "--base-price",
            "0.5",
            "--cost-model",
            "tax-inclusive",
            "--icms-rate",
            "0.2",
            "--pis-cofins-rate",
            "0.05",
        ])
        .build()?;
        let cost = estimate_cost(KilowattHours(75.0), &tariff, TariffFlag::Green);
        assert_abs_diff_eq!(cost.0, 50.0, epsilon = 1e-9);
        Ok(())
    }
}
