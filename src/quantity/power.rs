use crate::quantity::energy::KilowattHours;

quantity!(Watts, suffix: "W", precision: 0);

impl Watts {
    /// Energy drawn while running for the given number of hours.
    pub fn over_hours(self, hours: f64) -> KilowattHours {
        KilowattHours(self.0 * 0.001 * hours)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_over_hours() {
        assert_abs_diff_eq!(Watts(1500.0).over_hours(2.0).0, 3.0);
    }
}
