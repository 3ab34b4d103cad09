use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::{
    core::{date_range::DateRange, rates::RateParameters},
    db::{Db, meters::Meter},
    prelude::*,
};

#[derive(Parser)]
pub struct MeterArgs {
    /// Contact Energy account number.
    #[clap(long = "account", env = "CONTACT_ACCOUNT_NUMBER")]
    pub account_number: String,

    /// Contract ID of the connection.
    #[clap(long = "contract", env = "CONTACT_CONTRACT_ID")]
    pub contract_id: String,
}

impl MeterArgs {
    /// Get the registered meter.
    pub fn get(&self, db: &Db) -> Result<Meter> {
        db.meters().get(&self.account_number, &self.contract_id)
    }

    pub fn get_or_create(&self, db: &Db) -> Result<Meter> {
        db.meters().get_or_create(&self.account_number, &self.contract_id)
    }
}

#[derive(Parser)]
pub struct PeriodArgs {
    /// First date, inclusive.
    #[clap(long)]
    since: NaiveDate,

    /// Last date, inclusive.
    #[clap(long)]
    until: NaiveDate,
}

impl PeriodArgs {
    pub fn range(&self) -> Result<DateRange> {
        DateRange::try_new(self.since, self.until)
    }
}

#[derive(Parser)]
pub struct DefaultRatesArgs {
    /// TOML file with the default rates, replacing the built-in ones.
    ///
    /// Keys which are absent from the file stay unset.
    #[clap(long = "default-rates", env = "DEFAULT_RATES_PATH")]
    path: Option<PathBuf>,
}

impl DefaultRatesArgs {
    pub fn load(&self) -> Result<RateParameters> {
        self.path.as_deref().map_or(Ok(RateParameters::CONTACT_LOW_USER), RateParameters::read_from)
    }
}
