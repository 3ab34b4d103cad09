use chrono::{Days, Local, NaiveDate};
use clap::Parser;

use crate::{
    cli::{
        contact::ContactArgs,
        db::DbArgs,
        meter::{MeterArgs, PeriodArgs},
    },
    core::date_range::DateRange,
    fetch::Fetcher,
    prelude::*,
};

/// The usage history is not published sooner.
const PUBLISHING_DELAY: Days = Days::new(3);

#[derive(Parser)]
pub struct FetchArgs {
    #[clap(flatten)]
    db: DbArgs,

    #[clap(flatten)]
    contact: ContactArgs,

    #[clap(flatten)]
    meter: MeterArgs,

    #[clap(flatten)]
    period: PeriodArgs,
}

impl FetchArgs {
    #[instrument(skip_all)]
    pub async fn run(self) -> Result {
        let range = self.period.range()?;
        validate_range(range, Local::now().date_naive())?;

        let db = self.db.open()?;
        let meter = self.meter.get_or_create(&db)?;
        if db.usage().get_missing_dates(&meter, range)?.is_empty() {
            info!(%range, "all the dates are already stored");
            return Ok(());
        }

        let api = self.contact.log_in().await?;
        let summary = Fetcher::builder().source(&api).db(&db).meter(&meter).build().run(range).await?;
        if summary.n_failed != 0 {
            warn!(summary.n_failed, "some dates failed, re-run to retry them");
        }
        Ok(())
    }
}

fn validate_range(range: DateRange, today: NaiveDate) -> Result {
    let earliest = NaiveDate::from_ymd_opt(1996, 1, 1).context("invalid earliest date")?;
    ensure!(range.start() >= earliest, "the start date must not be earlier than {earliest}");
    let latest = today.checked_sub_days(PUBLISHING_DELAY).context("invalid latest date")?;
    ensure!(range.end() <= latest, "the end date must not be later than {latest}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, day).context("invalid date")
    }

    #[test]
    fn test_validate_range_ok() -> Result {
        let range = DateRange::try_new(date(1996, 1, 1)?, date(2024, 6, 14)?)?;
        validate_range(range, date(2024, 6, 17)?)
    }

    #[test]
    fn test_validate_range_too_early() -> Result {
        let range = DateRange::try_new(date(1995, 12, 31)?, date(2024, 6, 1)?)?;
        assert!(validate_range(range, date(2024, 6, 17)?).is_err());
        Ok(())
    }

    #[test]
    fn test_validate_range_too_recent() -> Result {
        let range = DateRange::try_new(date(2024, 6, 1)?, date(2024, 6, 15)?)?;
        assert!(validate_range(range, date(2024, 6, 17)?).is_err());
        Ok(())
    }
}
