use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use rusqlite::{Connection, params};

use crate::{
    core::{date_range::DateRange, reading::UsageReading},
    db::meters::Meter,
    prelude::*,
    quantity::energy::KilowattHours,
};

/// Formatted reading date, comparable with [`NaiveDate`]'s `Display`.
const DATE_EXPRESSION: &str = "printf('%04d-%02d-%02d', year, month, day)";

/// Append-only hourly usage time series.
pub struct Usage<'a>(pub(super) &'a Connection);

impl Usage<'_> {
    /// Get the readings within the date range, in chronological order.
    #[instrument(skip_all, fields(meter_id = %meter.id, range = %range))]
    pub fn get_readings(&self, meter: &Meter, range: DateRange) -> Result<Vec<UsageReading>> {
        let mut statement = self.0.prepare(&format!(
            "
            SELECT year, month, day, hour, value FROM usage
            WHERE meter_id = ?1 AND {DATE_EXPRESSION} BETWEEN ?2 AND ?3
            ORDER BY year, month, day, hour
            "
        ))?;
        let rows = statement
            .query_map(
                params![i64::from(meter.id), range.start().to_string(), range.end().to_string()],
                |row| {
                    Ok((
                        row.get::<_, i32>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, u32>(2)?,
                        row.get::<_, u32>(3)?,
                        row.get::<_, f64>(4)?,
                    ))
                },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to query the usage")?;
        let readings = rows
            .into_iter()
            .map(|(year, month, day, hour, value)| {
                let date = NaiveDate::from_ymd_opt(year, month, day)
                    .with_context(|| format!("invalid stored date {year}-{month}-{day}"))?;
                UsageReading::try_new(date, hour, KilowattHours(value))
            })
            .collect::<Result<Vec<_>>>()?;
        info!(n_readings = readings.len(), "fetched");
        Ok(readings)
    }

    /// Get the dates within the range, which have no readings at all.
    #[instrument(skip_all, fields(meter_id = %meter.id, range = %range))]
    pub fn get_missing_dates(&self, meter: &Meter, range: DateRange) -> Result<Vec<NaiveDate>> {
        let mut statement = self.0.prepare(&format!(
            "
            SELECT DISTINCT year, month, day FROM usage
            WHERE meter_id = ?1 AND {DATE_EXPRESSION} BETWEEN ?2 AND ?3
            "
        ))?;
        let present = statement
            .query_map(
                params![i64::from(meter.id), range.start().to_string(), range.end().to_string()],
                |row| Ok((row.get::<_, i32>(0)?, row.get::<_, u32>(1)?, row.get::<_, u32>(2)?)),
            )?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to query the dates")?
            .into_iter()
            .filter_map(|(year, month, day)| NaiveDate::from_ymd_opt(year, month, day))
            .collect::<HashSet<_>>();
        let missing = range.missing_from(&present);
        info!(n_present = present.len(), n_missing = missing.len(), "checked");
        Ok(missing)
    }

    /// Store the readings in a single transaction.
    ///
    /// A reading for an already stored hour fails the whole batch.
    #[instrument(skip_all, fields(meter_id = %meter.id, n_readings = readings.len()))]
    pub fn append_readings(&self, meter: &Meter, readings: &[UsageReading]) -> Result {
        let transaction = self.0.unchecked_transaction()?;
        {
            let mut statement = transaction.prepare_cached(
                "
                INSERT INTO usage (meter_id, year, month, day, hour, value)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ",
            )?;
            for reading in readings {
                statement
                    .execute(params![
                        i64::from(meter.id),
                        reading.date.year(),
                        reading.date.month(),
                        reading.date.day(),
                        reading.hour,
                        reading.value.0,
                    ])
                    .with_context(|| {
                        format!("failed to store the reading for {} {}:00", reading.date, reading.hour)
                    })?;
            }
        }
        transaction.commit().context("failed to commit the readings")?;
        debug!("stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;

    fn date(day: u32) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 6, day).context("invalid date")
    }

    fn day_of_readings(date: NaiveDate) -> Result<Vec<UsageReading>> {
        (0..24).map(|hour| UsageReading::try_new(date, hour, KilowattHours(0.5))).collect()
    }

    #[test]
    fn test_missing_dates_on_empty_store() -> Result {
        let db = Db::open_in_memory()?;
        let meter = db.meters().get_or_create("500001", "900001")?;
        let range = DateRange::try_new(date(1)?, date(3)?)?;
        assert_eq!(db.usage().get_missing_dates(&meter, range)?, vec![date(1)?, date(2)?, date(3)?]);
        Ok(())
    }

    #[test]
    fn test_missing_dates_are_idempotent() -> Result {
        let db = Db::open_in_memory()?;
        let meter = db.meters().get_or_create("500001", "900001")?;
        let range = DateRange::try_new(date(1)?, date(5)?)?;

        let first = db.usage().get_missing_dates(&meter, range)?;
        let second = db.usage().get_missing_dates(&meter, range)?;
        assert_eq!(first, second);

        db.usage().append_readings(&meter, &day_of_readings(date(2)?)?)?;
        db.usage().append_readings(&meter, &day_of_readings(date(4)?)?)?;
        assert_eq!(db.usage().get_missing_dates(&meter, range)?, vec![date(1)?, date(3)?, date(5)?]);
        Ok(())
    }

    #[test]
    fn test_partial_day_is_not_missing() -> Result {
        let db = Db::open_in_memory()?;
        let meter = db.meters().get_or_create("500001", "900001")?;
        let range = DateRange::try_new(date(1)?, date(1)?)?;
        db.usage().append_readings(&meter, &[UsageReading::try_new(date(1)?, 5, KilowattHours(1.0))?])?;
        assert!(db.usage().get_missing_dates(&meter, range)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_dates_are_per_meter() -> Result {
        let db = Db::open_in_memory()?;
        let meter = db.meters().get_or_create("500001", "900001")?;
        let other = db.meters().get_or_create("500001", "900002")?;
        let range = DateRange::try_new(date(1)?, date(1)?)?;
        db.usage().append_readings(&other, &day_of_readings(date(1)?)?)?;
        assert_eq!(db.usage().get_missing_dates(&meter, range)?, vec![date(1)?]);
        Ok(())
    }

    #[test]
    fn test_get_readings_within_range() -> Result {
        let db = Db::open_in_memory()?;
        let meter = db.meters().get_or_create("500001", "900001")?;
        for day in 1..=3 {
            db.usage().append_readings(&meter, &day_of_readings(date(day)?)?)?;
        }
        let readings = db.usage().get_readings(&meter, DateRange::try_new(date(2)?, date(3)?)?)?;
        assert_eq!(readings.len(), 48);
        assert_eq!(readings[0].date, date(2)?);
        assert_eq!(readings[0].hour, 0);
        assert_eq!(readings[47].date, date(3)?);
        assert_eq!(readings[47].hour, 23);
        Ok(())
    }

    #[test]
    fn test_duplicate_reading_rejected() -> Result {
        let db = Db::open_in_memory()?;
        let meter = db.meters().get_or_create("500001", "900001")?;
        let readings = day_of_readings(date(1)?)?;
        db.usage().append_readings(&meter, &readings)?;
        assert!(db.usage().append_readings(&meter, &readings[..1]).is_err());
        let range = DateRange::try_new(date(1)?, date(1)?)?;
        assert_eq!(db.usage().get_readings(&meter, range)?.len(), 24);
        Ok(())
    }
}
