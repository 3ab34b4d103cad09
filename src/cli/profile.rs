use clap::Parser;

use crate::{
    cli::{
        db::DbArgs,
        meter::{MeterArgs, PeriodArgs},
    },
    core::profile::UsageProfile,
    prelude::*,
    tables::build_profile_table,
};

#[derive(Parser)]
pub struct ProfileArgs {
    #[clap(flatten)]
    db: DbArgs,

    #[clap(flatten)]
    meter: MeterArgs,

    #[clap(flatten)]
    period: PeriodArgs,
}

impl ProfileArgs {
    #[instrument(skip_all)]
    pub fn run(self) -> Result {
        let db = self.db.open()?;
        let meter = self.meter.get(&db)?;
        let range = self.period.range()?;
        let usage = db.usage().get_readings(&meter, range)?;
        info!(%range, n_readings = usage.len(), "building the profile…");
        println!("{}", build_profile_table(&usage.iter().collect::<UsageProfile>()));
        Ok(())
    }
}
