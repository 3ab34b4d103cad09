use std::{
    fmt::{Display, Formatter},
    ops::{Range, RangeInclusive},
};

use crate::{
    core::{rates::RateKey, reading::UsageReading},
    quantity::rate::{CentsPerDay, CentsPerKilowattHour},
};

/// Contact Energy residential plan.
#[derive(Debug, Hash, PartialOrd, Ord, clap::ValueEnum, enumset::EnumSetType)]
pub enum Plan {
    /// Free weekend daytime power.
    Weekend,

    /// Free power from 21:00 till midnight.
    Night,

    /// Bundled with broadband.
    Broadband,

    /// Cheaper night rate for electric vehicles.
    Charge,

    /// Flat rate.
    Basic,
}

impl Plan {
    pub const fn tariff(self) -> Tariff {
        match self {
            Self::Weekend => WEEKEND,
            Self::Night => NIGHT,
            Self::Broadband => BROADBAND,
            Self::Charge => CHARGE,
            Self::Basic => BASIC,
        }
    }
}

impl Display for Plan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weekend => write!(f, "Good Weekends"),
            Self::Night => write!(f, "Good Nights"),
            Self::Broadband => write!(f, "Broadband bundle"),
            Self::Charge => write!(f, "Good Charge"),
            Self::Basic => write!(f, "Basic"),
        }
    }
}

/// Saturday and Sunday, 9:00–17:00.
const WEEKEND_DAYTIME: Window = Window { weekdays: 5..=6, hours: 9..17 };

/// Every day from 21:00 till midnight, not wrapping into the next day.
const LATE_EVENING: Window = Window { weekdays: 0..=6, hours: 21..24 };

/// Every day, 7:00–21:00.
const DAYTIME: Window = Window { weekdays: 0..=6, hours: 7..21 };

const WEEKEND: Tariff = Tariff {
    components: &[Component {
        period: Period::Outside(WEEKEND_DAYTIME),
        rate: &[RateKey::WeekendPrice],
    }],
    fixed: RateKey::WeekendFixed,
};

const NIGHT: Tariff = Tariff {
    components: &[Component { period: Period::Outside(LATE_EVENING), rate: &[RateKey::NightPrice] }],
    fixed: RateKey::NightFixed,
};

const BROADBAND: Tariff = Tariff {
    components: &[Component {
        period: Period::Always,
        rate: &[RateKey::BroadbandPrice, RateKey::BroadbandLevy],
    }],
    fixed: RateKey::BroadbandFixed,
};

/// Equivalent to charging everything at the night rate plus the day-night difference
/// during the daytime.
const CHARGE: Tariff = Tariff {
    components: &[
        Component { period: Period::Inside(DAYTIME), rate: &[RateKey::ChargeDayPrice] },
        Component { period: Period::Outside(DAYTIME), rate: &[RateKey::ChargeNightPrice] },
    ],
    fixed: RateKey::ChargeFixed,
};

const BASIC: Tariff = Tariff {
    components: &[Component {
        period: Period::Always,
        rate: &[RateKey::BasicPrice, RateKey::BasicLevy],
    }],
    fixed: RateKey::BasicFixed,
};

/// Plan pricing as data: the energy components and the daily charge.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct Tariff {
    pub components: &'static [Component],
    pub fixed: RateKey,
}

/// Energy charged during the period at the sum of the rates.
#[derive(Clone, Debug)]
pub struct Component {
    pub period: Period,
    pub rate: &'static [RateKey],
}

impl Component {
    /// Total rate, or [`None`] if any of the summed rates is unset.
    pub fn rate(&self, get: impl Fn(RateKey) -> Option<f64>) -> Option<CentsPerKilowattHour> {
        self.rate.iter().map(|key| get(*key)).sum::<Option<f64>>().map(CentsPerKilowattHour)
    }
}

impl Tariff {
    pub fn fixed_rate(&self, get: impl Fn(RateKey) -> Option<f64>) -> Option<CentsPerDay> {
        get(self.fixed).map(CentsPerDay)
    }
}

/// When a [`Component`] applies.
#[derive(Clone, Debug)]
pub enum Period {
    Always,
    Inside(Window),
    Outside(Window),
}

impl Period {
    pub fn contains(&self, reading: &UsageReading) -> bool {
        match self {
            Self::Always => true,
            Self::Inside(window) => window.contains(reading),
            Self::Outside(window) => !window.contains(reading),
        }
    }
}

/// Weekdays (Monday is `0`) and half-open hours within a single calendar day.
#[derive(Clone, Debug)]
pub struct Window {
    pub weekdays: RangeInclusive<u32>,
    pub hours: Range<u32>,
}

impl Window {
    pub fn contains(&self, reading: &UsageReading) -> bool {
        self.weekdays.contains(&reading.weekday()) && self.hours.contains(&reading.hour)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{core::rates::RateParameters, prelude::*, quantity::energy::KilowattHours};

    fn reading(year: i32, month: u32, day: u32, hour: u32) -> Result<UsageReading> {
        let date = NaiveDate::from_ymd_opt(year, month, day).context("invalid date")?;
        UsageReading::try_new(date, hour, KilowattHours(1.0))
    }

    #[test]
    fn test_weekend_daytime() -> Result {
        // Saturday:
        assert!(WEEKEND_DAYTIME.contains(&reading(2024, 6, 15, 9)?));
        assert!(WEEKEND_DAYTIME.contains(&reading(2024, 6, 15, 16)?));
        assert!(!WEEKEND_DAYTIME.contains(&reading(2024, 6, 15, 17)?));
        assert!(!WEEKEND_DAYTIME.contains(&reading(2024, 6, 15, 8)?));
        // Sunday:
        assert!(WEEKEND_DAYTIME.contains(&reading(2024, 6, 16, 12)?));
        // Friday:
        assert!(!WEEKEND_DAYTIME.contains(&reading(2024, 6, 14, 12)?));
        Ok(())
    }

    #[test]
    fn test_late_evening() -> Result {
        assert!(!LATE_EVENING.contains(&reading(2024, 6, 11, 20)?));
        assert!(LATE_EVENING.contains(&reading(2024, 6, 11, 21)?));
        assert!(LATE_EVENING.contains(&reading(2024, 6, 11, 23)?));
        assert!(!LATE_EVENING.contains(&reading(2024, 6, 11, 0)?));
        Ok(())
    }

    #[test]
    fn test_charge_periods_are_complementary() -> Result {
        let [day, night] = Plan::Charge.tariff().components else {
            bail!("expected two components");
        };
        for hour in 0..24 {
            let reading = reading(2024, 6, 11, hour)?;
            assert_ne!(day.period.contains(&reading), night.period.contains(&reading));
        }
        Ok(())
    }

    #[test]
    fn test_component_rate() {
        let component = &Plan::Basic.tariff().components[0];
        let rate = component.rate(|key| RateParameters::CONTACT_LOW_USER.get(key));
        assert_eq!(rate, Some(CentsPerKilowattHour(24.4 + 0.16)));
        assert_eq!(component.rate(|key| (key == RateKey::BasicPrice).then_some(24.4)), None);
    }
}
