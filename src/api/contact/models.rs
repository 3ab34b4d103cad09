use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, VecSkipError, serde_as};

use crate::{core::reading::UsageReading, prelude::*, quantity::energy::KilowattHours};

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize)]
pub struct LoginResponse {
    pub token: Option<String>,
}

#[derive(Deserialize)]
pub struct AccountsResponse {
    #[serde(rename = "xcsrfToken")]
    pub csrf_token: Option<String>,

    #[serde(rename = "accountsSummary", default)]
    pub accounts: Vec<AccountSummary>,
}

#[derive(Deserialize)]
pub struct AccountSummary {
    pub id: Option<String>,

    #[serde(default)]
    pub contracts: Vec<Contract>,
}

#[derive(Deserialize)]
pub struct Contract {
    #[serde(rename = "contractId")]
    pub id: String,
}

/// Account number to its contract IDs.
#[must_use]
#[derive(Clone, Debug, Default, derive_more::IntoIterator)]
pub struct Accounts(#[into_iterator(owned, ref)] pub BTreeMap<String, Vec<String>>);

impl From<Vec<AccountSummary>> for Accounts {
    /// Accounts without an ID are skipped.
    fn from(summaries: Vec<AccountSummary>) -> Self {
        Self(
            summaries
                .into_iter()
                .filter_map(|summary| {
                    let contract_ids = summary.contracts.into_iter().map(|contract| contract.id).collect();
                    Some((summary.id.filter(|id| !id.is_empty())?, contract_ids))
                })
                .collect(),
        )
    }
}

/// Hourly usage of a single day, malformed items are skipped.
#[must_use]
#[serde_as]
#[derive(Deserialize, derive_more::IntoIterator)]
pub struct UsageResponse(#[serde_as(as = "VecSkipError<_>")] pub Vec<HourlyUsage>);

#[serde_as]
#[derive(Deserialize)]
pub struct HourlyUsage {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub year: i32,

    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub month: u32,

    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub day: u32,

    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub hour: u32,

    /// Kilowatt-hours, the API tends to send them as strings.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub value: f64,
}

impl TryFrom<HourlyUsage> for UsageReading {
    type Error = Error;

    fn try_from(usage: HourlyUsage) -> Result<Self> {
        let date = NaiveDate::from_ymd_opt(usage.year, usage.month, usage.day).with_context(|| {
            format!("invalid date {}-{}-{}", usage.year, usage.month, usage.day)
        })?;
        Self::try_new(date, usage.hour, KilowattHours(usage.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_accounts_ok() -> Result {
        // language=JSON
        const RESPONSE: &str = r#"
            {
                "xcsrfToken": "csrf",
                "accountsSummary": [
                    {
                        "id": "500001",
                        "contracts": [{ "contractId": "900001" }, { "contractId": "900002" }]
                    },
                    { "nickname": "no ID", "contracts": [{ "contractId": "900003" }] },
                    { "id": "500002" }
                ]
            }
        "#;
        let response = serde_json::from_str::<AccountsResponse>(RESPONSE)?;
        assert_eq!(response.csrf_token.as_deref(), Some("csrf"));
        let accounts = Accounts::from(response.accounts);
        assert_eq!(accounts.0.len(), 2);
        assert_eq!(accounts.0["500001"], vec!["900001", "900002"]);
        assert!(accounts.0["500002"].is_empty());
        Ok(())
    }

    #[test]
    fn test_deserialize_usage_ok() -> Result {
        // language=JSON
        const RESPONSE: &str = r#"
            [
                { "year": 2024, "month": 6, "day": 11, "hour": 0, "value": "0.512" },
                { "year": "2024", "month": "6", "day": "11", "hour": "1", "value": 0.25 },
                { "year": 2024, "month": 6, "day": 11, "hour": 2, "value": "n/a" },
                { "year": 2024, "month": 6, "day": 11 }
            ]
        "#;
        let usage = serde_json::from_str::<UsageResponse>(RESPONSE)?;
        let readings = usage.into_iter().map(UsageReading::try_from).collect::<Result<Vec<_>>>()?;
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].hour, 0);
        assert_eq!(readings[0].value, KilowattHours(0.512));
        assert_eq!(readings[1].hour, 1);
        assert_eq!(readings[1].value, KilowattHours(0.25));
        Ok(())
    }

    #[test]
    fn test_invalid_hour_rejected() {
        let usage = HourlyUsage { year: 2024, month: 6, day: 11, hour: 24, value: 1.0 };
        assert!(UsageReading::try_from(usage).is_err());
    }
}
