use derive_more::{Display, From, Into};
use rusqlite::{Connection, OptionalExtension, params};

use crate::prelude::*;

/// Local meter identifier.
#[derive(Copy, Clone, Debug, Display, Eq, From, Into, PartialEq)]
pub struct MeterId(i64);

/// Billable electricity connection.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Meter {
    pub id: MeterId,
    pub account_number: String,
    pub contract_id: String,
}

pub struct Meters<'a>(pub(super) &'a Connection);

impl Meters<'_> {
    /// Get the meter, registering it if it is not known yet.
    #[instrument(skip_all, fields(account_number = account_number, contract_id = contract_id))]
    pub fn get_or_create(&self, account_number: &str, contract_id: &str) -> Result<Meter> {
        let n_inserted = self
            .0
            .execute(
                "INSERT OR IGNORE INTO meters (account_number, contract_id) VALUES (?1, ?2)",
                params![account_number, contract_id],
            )
            .context("failed to register the meter")?;
        if n_inserted != 0 {
            info!("registered a new meter");
        }
        self.find(account_number, contract_id)?
            .context("the meter has disappeared right after registering")
    }

    pub fn find(&self, account_number: &str, contract_id: &str) -> Result<Option<Meter>> {
        self.0
            .query_row(
                "SELECT id FROM meters WHERE account_number = ?1 AND contract_id = ?2",
                params![account_number, contract_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()
            .context("failed to look up the meter")
            .map(|id| {
                id.map(|id| Meter {
                    id: MeterId(id),
                    account_number: account_number.to_owned(),
                    contract_id: contract_id.to_owned(),
                })
            })
    }

    /// Get a known meter, failing if it has never been registered.
    pub fn get(&self, account_number: &str, contract_id: &str) -> Result<Meter> {
        self.find(account_number, contract_id)?.with_context(|| {
            format!(
                "meter `{account_number}/{contract_id}` is unknown, fetch its usage first",
            )
        })
    }

    pub fn list(&self) -> Result<Vec<Meter>> {
        let mut statement = self
            .0
            .prepare("SELECT id, account_number, contract_id FROM meters ORDER BY id")?;
        let meters = statement
            .query_map([], |row| {
                Ok(Meter {
                    id: MeterId(row.get(0)?),
                    account_number: row.get(1)?,
                    contract_id: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to list the meters")?;
        Ok(meters)
    }
}
