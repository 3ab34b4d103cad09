use rusqlite::{Connection, params};

use crate::{
    core::rates::{RateKey, RateParameters},
    db::meters::Meter,
    prelude::*,
};

/// Per-meter rate overrides.
pub struct Rates<'a>(pub(super) &'a Connection);

impl Rates<'_> {
    /// Get the stored overrides only, without the defaults.
    #[instrument(skip_all, fields(meter_id = %meter.id))]
    pub fn get_stored(&self, meter: &Meter) -> Result<RateParameters> {
        let mut statement = self.0.prepare("SELECT name, value FROM rates WHERE meter_id = ?1")?;
        let rows = statement
            .query_map(params![i64::from(meter.id)], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to query the rates")?;
        Ok(rows
            .into_iter()
            .filter_map(|(name, value)| match name.parse::<RateKey>() {
                Ok(key) => Some((key, value)),
                Err(error) => {
                    warn!("skipping the stored rate: {error:#}");
                    None
                }
            })
            .collect())
    }

    /// Get the stored overrides merged with the defaults.
    pub fn get(&self, meter: &Meter, defaults: &RateParameters) -> Result<RateParameters> {
        let stored = self.get_stored(meter)?;
        if stored.is_empty() {
            warn!(meter_id = %meter.id, "the rates are not configured, applying the defaults");
        }
        Ok(stored.resolve(defaults))
    }

    /// Replace all the stored overrides. Unset values are not stored.
    #[instrument(skip_all, fields(meter_id = %meter.id))]
    pub fn set(&self, meter: &Meter, rates: &RateParameters) -> Result {
        let transaction = self.0.unchecked_transaction()?;
        transaction
            .execute("DELETE FROM rates WHERE meter_id = ?1", params![i64::from(meter.id)])
            .context("failed to delete the old rates")?;
        {
            let mut statement = transaction
                .prepare_cached("INSERT INTO rates (meter_id, name, value) VALUES (?1, ?2, ?3)")?;
            for (key, value) in rates.iter() {
                statement
                    .execute(params![i64::from(meter.id), key.as_str(), value])
                    .with_context(|| format!("failed to store `{key}`"))?;
            }
        }
        transaction.commit().context("failed to commit the rates")?;
        info!(n_rates = rates.iter().count(), "saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;

    #[test]
    fn test_unconfigured_meter_gets_defaults() -> Result {
        let db = Db::open_in_memory()?;
        let meter = db.meters().get_or_create("500001", "900001")?;
        assert!(db.rates().get_stored(&meter)?.is_empty());
        assert_eq!(
            db.rates().get(&meter, &RateParameters::CONTACT_LOW_USER)?,
            RateParameters::CONTACT_LOW_USER,
        );
        Ok(())
    }

    #[test]
    fn test_set_replaces_overrides() -> Result {
        let db = Db::open_in_memory()?;
        let meter = db.meters().get_or_create("500001", "900001")?;

        let first = RateParameters { basic_price: Some(30.0), night_price: Some(25.0), ..RateParameters::UNSET };
        db.rates().set(&meter, &first)?;
        assert_eq!(db.rates().get_stored(&meter)?, first);

        let second = RateParameters { basic_price: Some(31.0), ..RateParameters::UNSET };
        db.rates().set(&meter, &second)?;
        assert_eq!(db.rates().get_stored(&meter)?, second);

        let resolved = db.rates().get(&meter, &RateParameters::CONTACT_LOW_USER)?;
        assert_eq!(resolved.basic_price, Some(31.0));
        assert_eq!(resolved.night_price, Some(30.2));
        Ok(())
    }

    #[test]
    fn test_rates_are_per_meter() -> Result {
        let db = Db::open_in_memory()?;
        let meter = db.meters().get_or_create("500001", "900001")?;
        let other = db.meters().get_or_create("500001", "900002")?;
        db.rates().set(&meter, &RateParameters { basic_price: Some(30.0), ..RateParameters::UNSET })?;
        assert!(db.rates().get_stored(&other)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_unset_and_nan_are_not_stored() -> Result {
        let db = Db::open_in_memory()?;
        let meter = db.meters().get_or_create("500001", "900001")?;
        let rates = RateParameters {
            basic_price: Some(30.0),
            basic_levy: Some(f64::NAN),
            ..RateParameters::UNSET
        };
        db.rates().set(&meter, &rates)?;
        assert_eq!(
            db.rates().get_stored(&meter)?,
            RateParameters { basic_price: Some(30.0), ..RateParameters::UNSET },
        );
        Ok(())
    }
}
