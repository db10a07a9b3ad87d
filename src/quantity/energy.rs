use crate::quantity::{cost::Cost, price::KilowattHourPrice};

quantity!(
    /// Meter values and consumption.
    KilowattHours,
    suffix: "kWh",
    precision: 1
);

implement_mul!(KilowattHours, KilowattHourPrice, Cost);
