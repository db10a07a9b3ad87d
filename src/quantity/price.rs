quantity!(
    /// Reais per kilowatt-hour.
    KilowattHourPrice,
    suffix: "R$/kWh",
    precision: 5
);
