use std::path::PathBuf;

use clap::Parser;

use crate::{db::Db, prelude::*};

#[derive(Parser)]
pub struct DbArgs {
    /// `SQLite` database file, created if it does not exist.
    #[clap(long = "db-path", env = "DB_PATH", default_value = "contact_energy.db")]
    path: PathBuf,
}

impl DbArgs {
    pub fn open(&self) -> Result<Db> {
        Db::open(&self.path)
    }
}
