use std::ops::Mul;

use crate::quantity::{cost::Cents, energy::KilowattHours};

quantity!(
    /// GST-exclusive energy rate.
    CentsPerKilowattHour, suffix: "¢/kWh", precision: 2
);

quantity!(
    /// GST-exclusive daily fixed charge.
    CentsPerDay, suffix: "¢/day", precision: 2
);

implement_mul!(KilowattHours, CentsPerKilowattHour, Cents);

impl Mul<u32> for CentsPerDay {
    type Output = Cents;

    fn mul(self, n_days: u32) -> Self::Output {
        Cents(self.0 * f64::from(n_days))
    }
}
