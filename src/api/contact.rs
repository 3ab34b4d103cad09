mod models;

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{
    Client,
    Response,
    header::{HeaderMap, HeaderValue},
};

pub use self::models::Accounts;
use self::models::{AccountsResponse, LoginRequest, LoginResponse, UsageResponse};
use crate::{core::reading::UsageReading, fetch::UsageSource, prelude::*};

const BASE_URL: &str = "https://api.contact-digital-prod.net";

/// Authenticated Contact Energy session.
pub struct Api {
    client: Client,
    token: String,
    csrf_token: String,
    accounts: Accounts,
}

impl Api {
    /// Log in and discover the accounts.
    ///
    /// Credentials are not stored anywhere, a failure here is final for the session.
    #[instrument(skip_all, fields(username = username))]
    pub async fn log_in(api_key: &str, username: &str, password: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.append("x-api-key", HeaderValue::from_str(api_key).context("invalid API key")?);
        let client = Client::builder()
            .user_agent("kea")
            .timeout(Duration::from_secs(15))
            .default_headers(headers)
            .build()?;

        info!("logging in…");
        let response = client
            .post(format!("{BASE_URL}/login/v2"))
            .json(&LoginRequest { username, password })
            .send()
            .await
            .context("failed to call the login endpoint")?;
        let token = ensure_success(response, "log in")?
            .json::<LoginResponse>()
            .await
            .context("failed to deserialize the login response")?
            .token
            .filter(|token| !token.is_empty())
            .context("failed to log in: the response contains no session token")?;

        info!("discovering the accounts…");
        let response = client
            .get(format!("{BASE_URL}/accounts/v2"))
            .query(&[("ba", "")])
            .header("session", &token)
            .send()
            .await
            .context("failed to call the accounts endpoint")?;
        let response = ensure_success(response, "discover the accounts")?
            .json::<AccountsResponse>()
            .await
            .context("failed to deserialize the accounts response")?;
        let csrf_token = response
            .csrf_token
            .filter(|token| !token.is_empty())
            .context("the accounts response contains no CSRF token")?;
        let accounts = Accounts::from(response.accounts);
        info!(n_accounts = accounts.0.len(), "logged in");

        Ok(Self { client, token, csrf_token, accounts })
    }

    pub const fn accounts(&self) -> &Accounts {
        &self.accounts
    }
}

fn ensure_success(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    ensure!(status.is_success(), "failed to {action}: {status}");
    Ok(response)
}

#[async_trait]
impl UsageSource for Api {
    #[instrument(skip_all, fields(account_number = account_number, contract_id = contract_id, date = %date))]
    async fn fetch_day(
        &self,
        account_number: &str,
        contract_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<UsageReading>> {
        debug!("fetching…");
        let date_string = date.to_string();
        let response = self
            .client
            .post(format!("{BASE_URL}/usage/v2/{contract_id}"))
            .query(&[
                ("ba", account_number),
                ("interval", "hourly"),
                ("from", date_string.as_str()),
                ("to", date_string.as_str()),
            ])
            .header("session", &self.token)
            .header("x-csrf-token", &self.csrf_token)
            .send()
            .await
            .context("failed to call the usage endpoint")?;
        let (readings, others): (Vec<_>, Vec<_>) =
            ensure_success(response, "fetch the usage (has the session expired?)")?
            .json::<UsageResponse>()
            .await
            .context("failed to deserialize the usage response")?
            .into_iter()
            .map(UsageReading::try_from)
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .partition(|reading| reading.date == date);
        if !others.is_empty() {
            warn!(n_readings = others.len(), "dropping readings outside of the requested date");
        }
        Ok(readings)
    }
}
