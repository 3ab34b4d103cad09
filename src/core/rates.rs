use std::{
    fmt::{Display, Formatter},
    fs,
    path::Path,
    str::FromStr,
};

use enumset::EnumSet;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Name of a single rate parameter.
///
/// Prices and levies are GST-exclusive cents per kilowatt-hour,
/// fixed charges are GST-exclusive cents per day.
#[derive(Debug, Hash, PartialOrd, Ord, enumset::EnumSetType)]
pub enum RateKey {
    WeekendPrice,
    WeekendFixed,
    NightPrice,
    NightFixed,
    BroadbandPrice,
    BroadbandFixed,
    BroadbandLevy,
    ChargeDayPrice,
    ChargeNightPrice,
    ChargeFixed,
    BasicPrice,
    BasicFixed,
    BasicLevy,
}

impl RateKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WeekendPrice => "weekend_price",
            Self::WeekendFixed => "weekend_fixed",
            Self::NightPrice => "night_price",
            Self::NightFixed => "night_fixed",
            Self::BroadbandPrice => "broadband_price",
            Self::BroadbandFixed => "broadband_fixed",
            Self::BroadbandLevy => "broadband_levy",
            Self::ChargeDayPrice => "charge_day_price",
            Self::ChargeNightPrice => "charge_night_price",
            Self::ChargeFixed => "charge_fixed",
            Self::BasicPrice => "basic_price",
            Self::BasicFixed => "basic_fixed",
            Self::BasicLevy => "basic_levy",
        }
    }
}

impl Display for RateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RateKey {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        EnumSet::<Self>::all()
            .iter()
            .find(|key| key.as_str() == name)
            .with_context(|| format!("unknown rate `{name}`"))
    }
}

/// Rate parameters of all the plans.
///
/// Any of them may be unset, in which case the plans depending on it cannot be priced.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize, clap::Args)]
#[serde(default, deny_unknown_fields)]
pub struct RateParameters {
    /// Weekend plan energy rate (¢/kWh), free on Saturday and Sunday 9:00–17:00.
    #[clap(long)]
    pub weekend_price: Option<f64>,

    /// Weekend plan daily charge (¢/day).
    #[clap(long)]
    pub weekend_fixed: Option<f64>,

    /// Night plan energy rate (¢/kWh), free from 21:00.
    #[clap(long)]
    pub night_price: Option<f64>,

    /// Night plan daily charge (¢/day).
    #[clap(long)]
    pub night_fixed: Option<f64>,

    /// Broadband bundle energy rate (¢/kWh).
    #[clap(long)]
    pub broadband_price: Option<f64>,

    /// Broadband bundle daily charge (¢/day).
    #[clap(long)]
    pub broadband_fixed: Option<f64>,

    /// Broadband bundle electricity authority levy (¢/kWh).
    #[clap(long)]
    pub broadband_levy: Option<f64>,

    /// EV plan day rate (¢/kWh), 7:00–21:00.
    #[clap(long)]
    pub charge_day_price: Option<f64>,

    /// EV plan night rate (¢/kWh).
    #[clap(long)]
    pub charge_night_price: Option<f64>,

    /// EV plan daily charge (¢/day).
    #[clap(long)]
    pub charge_fixed: Option<f64>,

    /// Basic plan energy rate (¢/kWh).
    #[clap(long)]
    pub basic_price: Option<f64>,

    /// Basic plan daily charge (¢/day).
    #[clap(long)]
    pub basic_fixed: Option<f64>,

    /// Basic plan electricity authority levy (¢/kWh).
    #[clap(long)]
    pub basic_levy: Option<f64>,
}

impl RateParameters {
    /// Contact Energy «low user» rates as of 2024-06-17, GST-exclusive.
    pub const CONTACT_LOW_USER: Self = Self {
        weekend_price: Some(23.4),
        weekend_fixed: Some(90.0),
        night_price: Some(30.2),
        night_fixed: Some(90.0),
        broadband_price: Some(24.4),
        broadband_fixed: Some(90.0),
        broadband_levy: Some(0.16),
        charge_day_price: Some(28.3),
        charge_night_price: Some(14.1),
        charge_fixed: Some(90.0),
        basic_price: Some(24.4),
        basic_fixed: Some(90.0),
        basic_levy: Some(0.16),
    };

    pub const UNSET: Self = Self {
        weekend_price: None,
        weekend_fixed: None,
        night_price: None,
        night_fixed: None,
        broadband_price: None,
        broadband_fixed: None,
        broadband_levy: None,
        charge_day_price: None,
        charge_night_price: None,
        charge_fixed: None,
        basic_price: None,
        basic_fixed: None,
        basic_levy: None,
    };

    fn slot(&self, key: RateKey) -> &Option<f64> {
        match key {
            RateKey::WeekendPrice => &self.weekend_price,
            RateKey::WeekendFixed => &self.weekend_fixed,
            RateKey::NightPrice => &self.night_price,
            RateKey::NightFixed => &self.night_fixed,
            RateKey::BroadbandPrice => &self.broadband_price,
            RateKey::BroadbandFixed => &self.broadband_fixed,
            RateKey::BroadbandLevy => &self.broadband_levy,
            RateKey::ChargeDayPrice => &self.charge_day_price,
            RateKey::ChargeNightPrice => &self.charge_night_price,
            RateKey::ChargeFixed => &self.charge_fixed,
            RateKey::BasicPrice => &self.basic_price,
            RateKey::BasicFixed => &self.basic_fixed,
            RateKey::BasicLevy => &self.basic_levy,
        }
    }

    fn slot_mut(&mut self, key: RateKey) -> &mut Option<f64> {
        match key {
            RateKey::WeekendPrice => &mut self.weekend_price,
            RateKey::WeekendFixed => &mut self.weekend_fixed,
            RateKey::NightPrice => &mut self.night_price,
            RateKey::NightFixed => &mut self.night_fixed,
            RateKey::BroadbandPrice => &mut self.broadband_price,
            RateKey::BroadbandFixed => &mut self.broadband_fixed,
            RateKey::BroadbandLevy => &mut self.broadband_levy,
            RateKey::ChargeDayPrice => &mut self.charge_day_price,
            RateKey::ChargeNightPrice => &mut self.charge_night_price,
            RateKey::ChargeFixed => &mut self.charge_fixed,
            RateKey::BasicPrice => &mut self.basic_price,
            RateKey::BasicFixed => &mut self.basic_fixed,
            RateKey::BasicLevy => &mut self.basic_levy,
        }
    }

    /// Get the value, treating non-finite numbers as unset.
    pub fn get(&self, key: RateKey) -> Option<f64> {
        self.slot(key).filter(|value| value.is_finite())
    }

    pub fn set(&mut self, key: RateKey, value: Option<f64>) {
        *self.slot_mut(key) = value;
    }

    /// Iterate over the set values.
    pub fn iter(&self) -> impl Iterator<Item = (RateKey, f64)> {
        EnumSet::<RateKey>::all().iter().filter_map(|key| Some((key, self.get(key)?)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Fill in the unset values from the defaults.
    ///
    /// Keys missing from both stay unset.
    pub fn resolve(&self, defaults: &Self) -> Self {
        let mut resolved = Self::UNSET;
        for key in EnumSet::<RateKey>::all() {
            resolved.set(key, self.get(key).or_else(|| defaults.get(key)));
        }
        resolved
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from(path: &Path) -> Result<Self> {
        info!("reading the rates…");
        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read `{}`", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("failed to parse `{}`", path.display()))
    }
}

impl FromIterator<(RateKey, f64)> for RateParameters {
    fn from_iter<I: IntoIterator<Item = (RateKey, f64)>>(iter: I) -> Self {
        let mut this = Self::UNSET;
        for (key, value) in iter {
            this.set(key, Some(value));
        }
        this
    }
}
