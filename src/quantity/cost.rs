quantity!(
    /// Brazilian reais.
    Cost,
    prefix: "R$",
    precision: 2
);

impl Cost {
    pub const ONE_CENT: Self = Self(0.01);

    pub fn round_to_cents(self) -> Self {
        Self((self.0 * 100.0).round() / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_round_to_cents() {
        assert_abs_diff_eq!(Cost(128.497).round_to_cents().0, 128.5);
    }

    #[test]
    fn test_display() {
        assert_eq!(Cost(120.62).to_string(), "R$ 120.62");
        assert_eq!(format!("{:?}", Cost(41.12)), "R$41.12");
    }
}
