use std::fmt::{Display, Formatter};

use comfy_table::Color;
use serde::{Deserialize, Serialize};

use crate::quantity::price::KilowattHourPrice;

/// ANEEL tariff flag («bandeira tarifária»).
///
/// Announced monthly by the regulator depending on the generation costs.
/// Any flag may follow any other one.
#[derive(
    Debug,
    Default,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    enumset::EnumSetType,
)]
#[serde(from = "String")]
pub enum TariffFlag {
    #[default]
    #[serde(rename = "GREEN")]
    #[value(name = "green", alias = "verde")]
    Green,

    #[serde(rename = "YELLOW")]
    #[value(name = "yellow", alias = "amarela")]
    Yellow,

    #[serde(rename = "RED_LEVEL_1")]
    #[value(name = "red-1", alias = "red-level-1", alias = "vermelha-1")]
    RedLevel1,

    #[serde(rename = "RED_LEVEL_2")]
    #[value(name = "red-2", alias = "red-level-2", alias = "vermelha-2")]
    RedLevel2,
}

impl TariffFlag {
    /// Parse the flag name, falling back to [`TariffFlag::Green`] for unknown names.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "yellow" | "amarela" => Self::Yellow,
            "red-level-1" | "red-1" | "red1" | "vermelha-1" | "vermelha-patamar-1" => {
                Self::RedLevel1
            }
            "red-level-2" | "red-2" | "red2" | "vermelha-2" | "vermelha-patamar-2" => {
                Self::RedLevel2
            }
            _ => Self::Green,
        }
    }

    /// Official surcharge on top of the base price.
    pub const fn official_surcharge(self) -> KilowattHourPrice {
        match self {
            Self::Green => KilowattHourPrice(0.0),
            Self::Yellow => KilowattHourPrice(0.01885),
            Self::RedLevel1 => KilowattHourPrice(0.04463),
            Self::RedLevel2 => KilowattHourPrice(0.07877),
        }
    }

    pub const fn color(self) -> Color {
        match self {
            Self::Green => Color::Green,
            Self::Yellow => Color::DarkYellow,
            Self::RedLevel1 => Color::Red,
            Self::RedLevel2 => Color::DarkRed,
        }
    }
}

impl From<String> for TariffFlag {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl Display for TariffFlag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Green => write!(f, "Green"),
            Self::Yellow => write!(f, "Yellow"),
            Self::RedLevel1 => write!(f, "Red 1"),
            Self::RedLevel2 => write!(f, "Red 2"),
        }
    }
}

#[cfg(test)]
mod tests {
    use enumset::EnumSet;

    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(TariffFlag::from_name("RED_LEVEL_1"), TariffFlag::RedLevel1);
        assert_eq!(TariffFlag::from_name("vermelha-2"), TariffFlag::RedLevel2);
        assert_eq!(TariffFlag::from_name("Amarela"), TariffFlag::Yellow);
        assert_eq!(TariffFlag::from_name("purple"), TariffFlag::Green);
    }

    #[test]
    fn test_serde() -> anyhow::Result<()> {
        assert_eq!(serde_json::to_string(&TariffFlag::RedLevel2)?, r#""RED_LEVEL_2""#);
        assert_eq!(serde_json::from_str::<TariffFlag>(r#""YELLOW""#)?, TariffFlag::Yellow);
        assert_eq!(serde_json::from_str::<TariffFlag>(r#""SOMETHING""#)?, TariffFlag::Green);
        Ok(())
    }

    #[test]
    fn test_surcharges_are_increasing() {
        let surcharges: Vec<_> =
            EnumSet::<TariffFlag>::all().iter().map(TariffFlag::official_surcharge).collect();
        assert!(surcharges.is_sorted());
    }
}
