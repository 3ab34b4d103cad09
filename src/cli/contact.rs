use clap::Parser;

use crate::{api::contact::Api, prelude::*};

#[derive(Parser)]
pub struct ContactArgs {
    #[clap(long, env = "CONTACT_USERNAME")]
    username: String,

    #[clap(long, env = "CONTACT_PASSWORD", hide_env_values = true)]
    password: String,

    /// Public API key of the Contact Energy website.
    #[clap(long = "api-key", env = "CONTACT_API_KEY", hide_env_values = true)]
    api_key: String,
}

impl ContactArgs {
    pub async fn log_in(&self) -> Result<Api> {
        Api::log_in(&self.api_key, &self.username, &self.password).await
    }
}
