pub mod file;
pub mod record;
pub mod rest;

pub use self::record::PeriodRecord;
use crate::prelude::*;

/// Port to wherever the periods are mirrored.
///
/// The in-memory state is the source of truth, the storage is best-effort.
pub trait Storage {
    /// Load all known periods.
    fn load(&self) -> Result<Vec<PeriodRecord>>;

    /// Insert or replace the period with the same month and year.
    fn save(&self, record: &PeriodRecord) -> Result;
}
