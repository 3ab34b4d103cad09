use std::{
    collections::HashSet,
    fmt::{Display, Formatter},
};

use chrono::NaiveDate;

use crate::prelude::*;

/// Inclusive range of calendar days.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn try_new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        ensure!(start <= end, "the end date {end} is earlier than the start date {start}");
        Ok(Self { start, end })
    }

    pub const fn start(self) -> NaiveDate {
        self.start
    }

    pub const fn end(self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days in the range, regardless of available readings.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn total_days(self) -> u32 {
        ((self.end - self.start).num_days() + 1) as u32
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        (self.start..=self.end).contains(&date)
    }

    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take_while(move |date| *date <= self.end)
    }

    /// Dates in the range that are not present in the set, in ascending order.
    pub fn missing_from(self, present: &HashSet<NaiveDate>) -> Vec<NaiveDate> {
        self.days().filter(|date| !present.contains(date)).collect()
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}…{}", self.start, self.end)
    }
}
