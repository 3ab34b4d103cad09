use chrono::{Datelike, NaiveDate};

use crate::{prelude::*, quantity::energy::KilowattHours};

/// Metered usage during one hour of one calendar day.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UsageReading {
    pub date: NaiveDate,

    /// Start hour, `0..24`.
    pub hour: u32,

    pub value: KilowattHours,
}

impl UsageReading {
    pub fn try_new(date: NaiveDate, hour: u32, value: KilowattHours) -> Result<Self> {
        ensure!(hour < 24, "hour `{hour}` is out of range");
        ensure!(value.0.is_finite() && value.0 >= 0.0, "invalid usage value `{value:?}`");
        Ok(Self { date, hour, value })
    }

    /// Day of the week, Monday is `0` and Sunday is `6`.
    pub fn weekday(&self) -> u32 {
        self.date.weekday().num_days_from_monday()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday() -> Result {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).context("invalid date")?;
        assert_eq!(UsageReading::try_new(date, 12, KilowattHours(1.0))?.weekday(), 5);
        Ok(())
    }

    #[test]
    fn test_try_new_rejects_invalid() -> Result {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).context("invalid date")?;
        assert!(UsageReading::try_new(date, 24, KilowattHours(1.0)).is_err());
        assert!(UsageReading::try_new(date, 0, KilowattHours(-0.1)).is_err());
        assert!(UsageReading::try_new(date, 0, KilowattHours(f64::NAN)).is_err());
        Ok(())
    }
}
