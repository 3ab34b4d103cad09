mod compare;
mod contact;
mod db;
mod fetch;
mod meter;
mod profile;
mod rates;

use clap::{Parser, Subcommand};

use crate::{
    cli::{
        compare::CompareArgs,
        contact::ContactArgs,
        db::DbArgs,
        fetch::FetchArgs,
        meter::{MeterArgs, PeriodArgs},
        profile::ProfileArgs,
        rates::RatesArgs,
    },
    prelude::*,
    tables::{build_accounts_table, build_meters_table},
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch the hourly usage for the dates which are not stored yet.
    #[clap(name = "fetch")]
    Fetch(Box<FetchArgs>),

    /// Log in and list the accounts with their contracts.
    #[clap(name = "accounts")]
    Accounts(ContactArgs),

    /// List the locally known meters.
    #[clap(name = "meters")]
    Meters(DbArgs),

    /// List the dates with no stored usage.
    #[clap(name = "missing")]
    Missing(MissingArgs),

    /// Price the stored usage under each plan.
    #[clap(name = "compare")]
    Compare(Box<CompareArgs>),

    /// Inspect or replace the meter rates.
    #[clap(name = "rates")]
    Rates(Box<RatesArgs>),

    /// Mean hourly usage per hour of the day and day of the week.
    #[clap(name = "profile")]
    Profile(ProfileArgs),
}

impl Command {
    pub async fn run(self) -> Result {
        match self {
            Self::Fetch(args) => args.run().await,
            Self::Accounts(args) => {
                let api = args.log_in().await?;
                println!("{}", build_accounts_table(api.accounts()));
                Ok(())
            }
            Self::Meters(args) => {
                let meters = args.open()?.meters().list()?;
                println!("{}", build_meters_table(&meters));
                Ok(())
            }
            Self::Missing(args) => args.run(),
            Self::Compare(args) => args.run(),
            Self::Rates(args) => args.run(),
            Self::Profile(args) => args.run(),
        }
    }
}

#[derive(Parser)]
pub struct MissingArgs {
    #[clap(flatten)]
    db: DbArgs,

    #[clap(flatten)]
    meter: MeterArgs,

    #[clap(flatten)]
    period: PeriodArgs,
}

impl MissingArgs {
    #[instrument(skip_all)]
    fn run(self) -> Result {
        let db = self.db.open()?;
        let meter = self.meter.get(&db)?;
        let range = self.period.range()?;
        let missing_dates = db.usage().get_missing_dates(&meter, range)?;
        info!(%range, n_missing = missing_dates.len(), total = range.total_days(), "found the missing dates");
        for date in missing_dates {
            println!("{date}");
        }
        Ok(())
    }
}
