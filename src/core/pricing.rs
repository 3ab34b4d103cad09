use std::collections::BTreeMap;

use enumset::EnumSet;

use crate::{
    core::{date_range::DateRange, plan::Plan, rates::RateParameters, reading::UsageReading},
    quantity::{
        cost::{Cents, Dollars},
        energy::KilowattHours,
    },
};

/// New Zealand Goods and Services Tax.
pub const GST_RATE: f64 = 0.15;

/// GST-inclusive total per plan. Plans which could not be priced are absent.
pub type PlanResult = BTreeMap<Plan, Dollars>;

/// Price the usage under every plan.
///
/// The readings must fall within the date range. Fixed charges accrue for every day
/// of the range, even if there are no readings for some of the days.
pub fn compute_totals(
    usage: &[UsageReading],
    rates: &RateParameters,
    date_range: DateRange,
) -> PlanResult {
    compute_totals_for(EnumSet::all(), usage, rates, date_range)
}

/// Price the usage under the selected plans.
pub fn compute_totals_for(
    plans: EnumSet<Plan>,
    usage: &[UsageReading],
    rates: &RateParameters,
    date_range: DateRange,
) -> PlanResult {
    debug_assert!(usage.iter().all(|reading| date_range.contains(reading.date)));
    plans
        .iter()
        .filter_map(|plan| {
            let total = pre_tax_total(plan, usage, rates, date_range.total_days())?;
            Some((plan, total.with_tax(GST_RATE)))
        })
        .collect()
}

/// GST-exclusive total, or [`None`] if any of the rates the plan depends on is unset.
fn pre_tax_total(
    plan: Plan,
    usage: &[UsageReading],
    rates: &RateParameters,
    total_days: u32,
) -> Option<Cents> {
    let tariff = plan.tariff();
    let mut total = tariff.fixed_rate(|key| rates.get(key))? * total_days;
    for component in tariff.components {
        let rate = component.rate(|key| rates.get(key))?;
        let energy: KilowattHours = usage
            .iter()
            .filter(|reading| component.period.contains(reading))
            .map(|reading| reading.value)
            .sum();
        total += energy * rate;
    }
    Some(total)
}
