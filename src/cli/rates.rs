use clap::{Parser, Subcommand};

use crate::{
    cli::{
        db::DbArgs,
        meter::{DefaultRatesArgs, MeterArgs},
    },
    core::rates::RateParameters,
    prelude::*,
    tables::build_rates_table,
};

#[derive(Parser)]
pub struct RatesArgs {
    #[clap(flatten)]
    db: DbArgs,

    #[clap(flatten)]
    meter: MeterArgs,

    #[command(subcommand)]
    command: RatesCommand,
}

#[derive(Subcommand)]
pub enum RatesCommand {
    /// Show the stored and the effective rates.
    #[clap(name = "show")]
    Show(DefaultRatesArgs),

    /// Replace the stored rates. Omitted rates fall back to the defaults.
    #[clap(name = "set")]
    Set(RateParameters),
}

impl RatesArgs {
    #[instrument(skip_all)]
    pub fn run(self) -> Result {
        let db = self.db.open()?;
        match self.command {
            RatesCommand::Show(default_rates) => {
                let meter = self.meter.get(&db)?;
                let stored = db.rates().get_stored(&meter)?;
                let resolved = stored.resolve(&default_rates.load()?);
                println!("{}", build_rates_table(&stored, &resolved));
            }
            RatesCommand::Set(rates) => {
                let meter = self.meter.get_or_create(&db)?;
                db.rates().set(&meter, &rates)?;
            }
        }
        Ok(())
    }
}
