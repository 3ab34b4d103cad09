use clap::Parser;
use enumset::EnumSet;
use itertools::Itertools;

use crate::{
    cli::{
        db::DbArgs,
        meter::{DefaultRatesArgs, MeterArgs, PeriodArgs},
    },
    core::{plan::Plan, pricing::compute_totals_for},
    prelude::*,
    tables::build_plan_table,
};

#[derive(Parser)]
pub struct CompareArgs {
    #[clap(flatten)]
    db: DbArgs,

    #[clap(flatten)]
    meter: MeterArgs,

    #[clap(flatten)]
    period: PeriodArgs,

    #[clap(flatten)]
    default_rates: DefaultRatesArgs,

    /// Plans to compare, all by default.
    #[clap(long = "plans", value_delimiter = ',', num_args = 1..)]
    plans: Vec<Plan>,
}

impl CompareArgs {
    fn plans(&self) -> EnumSet<Plan> {
        if self.plans.is_empty() { EnumSet::all() } else { self.plans.iter().copied().collect() }
    }

    #[instrument(skip_all)]
    pub fn run(self) -> Result {
        let db = self.db.open()?;
        let meter = self.meter.get(&db)?;
        let range = self.period.range()?;

        let n_missing = db.usage().get_missing_dates(&meter, range)?.len();
        if n_missing != 0 {
            warn!(n_missing, "some dates have no usage, only their fixed charges are counted");
        }

        let rates = db.rates().get(&meter, &self.default_rates.load()?)?;
        let usage = db.usage().get_readings(&meter, range)?;
        info!(%range, n_readings = usage.len(), "pricing…");

        let plans = self.plans();
        let totals = compute_totals_for(plans, &usage, &rates, range);
        let skipped = plans.iter().filter(|plan| !totals.contains_key(plan)).join(", ");
        if !skipped.is_empty() {
            warn!(skipped, "some of the rates are not set, skipping the plans");
        }
        println!("{}", build_plan_table(&totals));
        Ok(())
    }
}
