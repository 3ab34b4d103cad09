pub mod meters;
pub mod rates;
pub mod usage;

use std::path::Path;

use rusqlite::Connection;

use crate::{
    db::{meters::Meters, rates::Rates, usage::Usage},
    prelude::*,
};

/// Local `SQLite` storage of meters, their usage, and rate overrides.
#[must_use]
pub struct Db(Connection);

impl Db {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        info!("opening the database…");
        let connection = Connection::open(path)
            .with_context(|| format!("failed to open `{}`", path.display()))?;
        Self::initialize(connection)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(connection: Connection) -> Result<Self> {
        connection
            .execute_batch(
                "
                PRAGMA foreign_keys = ON;

                CREATE TABLE IF NOT EXISTS meters (
                    id             INTEGER PRIMARY KEY AUTOINCREMENT,
                    account_number TEXT NOT NULL,
                    contract_id    TEXT NOT NULL,
                    UNIQUE (account_number, contract_id)
                );

                CREATE TABLE IF NOT EXISTS usage (
                    meter_id INTEGER NOT NULL REFERENCES meters (id),
                    year     INTEGER NOT NULL,
                    month    INTEGER NOT NULL,
                    day      INTEGER NOT NULL,
                    hour     INTEGER NOT NULL,
                    value    REAL NOT NULL,
                    PRIMARY KEY (meter_id, year, month, day, hour)
                );

                CREATE TABLE IF NOT EXISTS rates (
                    meter_id INTEGER NOT NULL REFERENCES meters (id),
                    name     TEXT NOT NULL,
                    value    REAL NOT NULL,
                    PRIMARY KEY (meter_id, name)
                );
                ",
            )
            .context("failed to initialize the schema")?;
        Ok(Self(connection))
    }

    pub const fn meters(&self) -> Meters<'_> {
        Meters(&self.0)
    }

    pub const fn usage(&self) -> Usage<'_> {
        Usage(&self.0)
    }

    pub const fn rates(&self) -> Rates<'_> {
        Rates(&self.0)
    }
}
