use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

quantity!(
    /// GST-exclusive cost in the minor currency unit.
    Cents, suffix: "¢", precision: 2
);

quantity!(
    /// GST-inclusive cost in the major currency unit.
    Dollars, suffix: "NZD", precision: 2
);

impl Cents {
    /// Add the tax and convert to [`Dollars`], rounded to whole cents.
    pub fn with_tax(self, tax_rate: f64) -> Dollars {
        Dollars(self.0 * (1.0 + tax_rate) / 100.0).round_to_cents()
    }
}

impl Dollars {
    /// Round the exact binary value to whole cents, ties to even.
    ///
    /// Non-finite values are returned as is.
    pub fn round_to_cents(self) -> Self {
        Decimal::from_f64_retain(self.0)
            .map(|value| value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
            .and_then(|value| value.to_f64())
            .map_or(self, Self)
    }
}
