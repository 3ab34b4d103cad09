use std::array;

use average::{Estimate, Mean};

use crate::{core::reading::UsageReading, quantity::energy::KilowattHours};

/// Mean hourly usage per hour of the day and day of the week.
#[must_use]
pub struct UsageProfile([[Option<KilowattHours>; 7]; 24]);

impl UsageProfile {
    /// Mean usage at the hour (`0..24`) and weekday (Monday is `0`),
    /// or [`None`] if there were no readings.
    pub fn get(&self, hour: u32, weekday: u32) -> Option<KilowattHours> {
        *self.0.get(hour as usize)?.get(weekday as usize)?
    }
}

impl<'a> FromIterator<&'a UsageReading> for UsageProfile {
    fn from_iter<I: IntoIterator<Item = &'a UsageReading>>(iter: I) -> Self {
        let mut estimates: [[Mean; 7]; 24] = array::from_fn(|_| array::from_fn(|_| Mean::new()));
        for reading in iter {
            estimates[reading.hour as usize][reading.weekday() as usize].add(reading.value.0);
        }
        Self(estimates.map(|row| {
            row.map(|estimate| (!estimate.is_empty()).then(|| KilowattHours(estimate.mean())))
        }))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_mean_per_cell() -> Result {
        let monday = NaiveDate::from_ymd_opt(2024, 6, 10).context("invalid date")?;
        let next_monday = NaiveDate::from_ymd_opt(2024, 6, 17).context("invalid date")?;
        let sunday = NaiveDate::from_ymd_opt(2024, 6, 16).context("invalid date")?;
        let readings = [
            UsageReading::try_new(monday, 7, KilowattHours(1.0))?,
            UsageReading::try_new(next_monday, 7, KilowattHours(2.0))?,
            UsageReading::try_new(sunday, 23, KilowattHours(0.5))?,
        ];
        let profile: UsageProfile = readings.iter().collect();
        assert_abs_diff_eq!(profile.get(7, 0).context("missing cell")?.0, 1.5);
        assert_abs_diff_eq!(profile.get(23, 6).context("missing cell")?.0, 0.5);
        assert!(profile.get(7, 1).is_none());
        assert!(profile.get(24, 0).is_none());
        Ok(())
    }
}
