use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rand::Rng;
use tokio::time::sleep;

use crate::{
    core::{date_range::DateRange, reading::UsageReading},
    db::{Db, meters::Meter},
    prelude::*,
};

/// Remote source of the hourly usage.
#[async_trait]
pub trait UsageSource: Sync {
    /// Fetch the hourly readings of the single day.
    async fn fetch_day(
        &self,
        account_number: &str,
        contract_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<UsageReading>>;
}

/// Random delay between consecutive requests.
#[derive(Copy, Clone, Debug)]
pub struct Pacing {
    pub min: Duration,
    pub max: Duration,
}

impl Pacing {
    /// Mimic a human clicking through the website.
    pub const HUMAN: Self = Self { min: Duration::from_millis(700), max: Duration::from_millis(1300) };

    #[cfg(test)]
    pub const NONE: Self = Self { min: Duration::ZERO, max: Duration::ZERO };

    fn delay(self) -> Duration {
        if self.max <= self.min {
            self.min
        } else {
            rand::thread_rng().gen_range(self.min..=self.max)
        }
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub n_missing: usize,
    pub n_fetched: usize,
    pub n_failed: usize,
}

/// Fetches the missing days one by one and stores them.
#[derive(bon::Builder)]
pub struct Fetcher<'a, S> {
    source: &'a S,
    db: &'a Db,
    meter: &'a Meter,

    #[builder(default = Pacing::HUMAN)]
    pacing: Pacing,
}

impl<S: UsageSource> Fetcher<'_, S> {
    /// Fetch and store the days which have no readings yet.
    ///
    /// A failing day is skipped and left missing, so that the next run picks it up again.
    #[instrument(skip_all, fields(meter_id = %self.meter.id, range = %range))]
    pub async fn run(&self, range: DateRange) -> Result<FetchSummary> {
        let missing_dates = self.db.usage().get_missing_dates(self.meter, range)?;
        let mut summary = FetchSummary { n_missing: missing_dates.len(), ..FetchSummary::default() };
        info!(n_missing = summary.n_missing, "fetching the missing dates…");

        for (i, date) in missing_dates.into_iter().enumerate() {
            if i != 0 {
                sleep(self.pacing.delay()).await;
            }
            match self.fetch_and_store(date).await {
                Ok(n_readings) => {
                    summary.n_fetched += 1;
                    info!(%date, n_readings, progress = i + 1, total = summary.n_missing, "stored");
                }
                Err(error) => {
                    summary.n_failed += 1;
                    warn!(%date, "skipping the date: {error:#}");
                }
            }
        }

        info!(summary.n_fetched, summary.n_failed, "finished");
        Ok(summary)
    }

    async fn fetch_and_store(&self, date: NaiveDate) -> Result<usize> {
        let readings = self
            .source
            .fetch_day(&self.meter.account_number, &self.meter.contract_id, date)
            .await?;
        ensure!(!readings.is_empty(), "no readings for {date}");
        self.db.usage().append_readings(self.meter, &readings)?;
        Ok(readings.len())
    }
}
