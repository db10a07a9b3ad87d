use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::quantity::energy::KilowattHours;

/// Timestamp-based reading identifier, in milliseconds.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    derive_more::Display,
    derive_more::FromStr,
)]
pub struct ReadingId(pub i64);

impl ReadingId {
    /// Make an identifier that is unique among the existing ones.
    ///
    /// Readings added within the same millisecond get consecutive identifiers.
    /// Returns `None` when an existing identifier is already `i64::MAX`.
    pub fn next<'a>(
        now_millis: i64,
        existing: impl IntoIterator<Item = &'a Reading>,
    ) -> Option<Self> {
        let Some(max_existing) = existing.into_iter().map(|reading| reading.id.0).max() else {
            return Some(Self(now_millis));
        };
        Some(Self(now_millis.max(max_existing.checked_add(1)?)))
    }
}

#[must_use]
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde_as(as = "DisplayFromStr")]
    pub id: ReadingId,

    pub date: NaiveDate,

    pub value: KilowattHours,

    /// Consumption since the period's initial reading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumption: Option<KilowattHours>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(id: i64) -> Reading {
        Reading {
            id: ReadingId(id),
            date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            value: KilowattHours(1.0),
            consumption: None,
        }
    }

    #[test]
    fn test_next_id_uses_timestamp() {
        assert_eq!(ReadingId::next(1_000, &[reading(10)]), Some(ReadingId(1_000)));
        assert_eq!(ReadingId::next(1_000, &Vec::<Reading>::new()), Some(ReadingId(1_000)));
    }

    #[test]
    fn test_next_id_avoids_collision() {
        let existing = [reading(1_000), reading(1_001)];
        assert_eq!(ReadingId::next(1_000, &existing), Some(ReadingId(1_002)));
    }

    #[test]
    fn test_next_id_exhausted() {
        assert_eq!(ReadingId::next(1_760_000_000_000, &[reading(i64::MAX)]), None);
    }

    #[test]
    fn test_serialize_id_as_string() -> anyhow::Result<()> {
        let json = serde_json::to_value(reading(1_760_000_000_000))?;
        assert_eq!(json["id"], "1760000000000");
        assert_eq!(json["date"], "2026-10-01");
        assert!(json.get("consumption").is_none());
        Ok(())
    }
}
