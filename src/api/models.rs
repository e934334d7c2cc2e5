//! Request and response bodies exchanged with the finance API.

use serde::{Deserialize, Deserializer, Serialize};
use time::Date;

use crate::transaction::parse_date;

#[derive(Debug, Serialize)]
pub(super) struct LogInRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthResponse {
    pub token: String,
}

/// One page of results from a paginated endpoint.
///
/// `number` is the 0-based index of the page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct Page<T> {
    /// The items on this page.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: Vec<T>,
    /// How many pages there are in total.
    #[serde(default)]
    pub total_pages: u64,
    /// How many items there are across all pages.
    #[serde(default)]
    pub total_elements: u64,
    /// The 0-based index of this page.
    #[serde(default)]
    pub number: u64,
    /// The maximum number of items on a page.
    #[serde(default)]
    pub size: u64,
}

/// The body of the finance API's health check.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HealthStatus {
    /// Whether the service considers itself healthy.
    #[serde(default)]
    pub success: bool,
    /// A human readable status message.
    #[serde(default)]
    pub message: Option<String>,
}

pub(super) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The description and date range that narrow down which transactions are fetched.
///
/// Deserializes from the query string of the dashboard and transactions
/// pages. Blank or invalid values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionFilter {
    /// Only include transactions whose description contains this text.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
    /// Only include transactions on or after this date.
    #[serde(default, deserialize_with = "date_or_none")]
    pub start_date: Option<Date>,
    /// Only include transactions on or before this date.
    #[serde(default, deserialize_with = "date_or_none")]
    pub end_date: Option<Date>,
}

impl TransactionFilter {
    /// Whether no filter is set.
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.start_date.is_none() && self.end_date.is_none()
    }

    /// The filter as query parameters for the finance API.
    pub fn to_api_query(&self) -> Vec<(&'static str, String)> {
        self.to_query(["description", "startDate", "endDate"])
    }

    /// The filter as query parameters for links between pages of this app.
    pub fn to_view_query(&self) -> Vec<(&'static str, String)> {
        self.to_query(["description", "start_date", "end_date"])
    }

    fn to_query(&self, names: [&'static str; 3]) -> Vec<(&'static str, String)> {
        let [description, start_date, end_date] = names;
        let mut query = Vec::new();

        if let Some(value) = &self.description {
            query.push((description, value.clone()));
        }
        if let Some(value) = self.start_date {
            query.push((start_date, value.to_string()));
        }
        if let Some(value) = self.end_date {
            query.push((end_date, value.to_string()));
        }

        query
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;

    Ok(value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty()))
}

fn date_or_none<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;

    Ok(value.as_deref().and_then(parse_date))
}
