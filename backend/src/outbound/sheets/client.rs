//! Reqwest-backed adapter for the Google Sheets values API.
//!
//! This adapter owns transport details only: URL construction, bearer
//! authentication, HTTP error mapping, and decoding value ranges into rows of
//! cell text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::token::TokenProvider;
use crate::domain::ports::{RemoteStoreError, SpreadsheetClient};

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How much response body text to keep in status errors.
const ERROR_BODY_LIMIT: usize = 512;

#[derive(Debug, Deserialize)]
struct ValueRangeDto {
    values: Option<Vec<Vec<Value>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendResponseDto {
    updates: Option<UpdatesDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatesDto {
    updated_rows: Option<u32>,
}

/// Spreadsheet client speaking to the hosted Sheets v4 values endpoints.
pub struct GoogleSheetsClient {
    http: Client,
    base_url: String,
    tokens: TokenProvider,
}

impl GoogleSheetsClient {
    /// Build a client with the hosted endpoint and a bounded request timeout.
    ///
    /// # Errors
    /// Returns an error when the underlying HTTP client cannot be
    /// constructed.
    pub fn new(tokens: TokenProvider) -> Result<Self, RemoteStoreError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(map_transport_error)?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_owned(),
            tokens,
        })
    }

    /// Build a client against an alternative base URL.
    pub fn with_base_url(tokens: TokenProvider, base_url: impl Into<String>) -> Result<Self, RemoteStoreError> {
        let mut client = Self::new(tokens)?;
        client.base_url = base_url.into();
        Ok(client)
    }

    fn values_url(&self, sheet_id: &str, range: &str, suffix: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{sheet_id}/values/{range}{suffix}",
            self.base_url
        )
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RemoteStoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let mut body = response.text().await.unwrap_or_default();
        body.truncate(ERROR_BODY_LIMIT);
        Err(RemoteStoreError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl SpreadsheetClient for GoogleSheetsClient {
    async fn read(
        &self,
        sheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, RemoteStoreError> {
        let bearer = self.tokens.bearer().await?;
        let response = self
            .http
            .get(self.values_url(sheet_id, range, ""))
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(map_transport_error)?;
        let response = Self::check_status(response).await?;
        let decoded: ValueRangeDto = response
            .json()
            .await
            .map_err(|err| RemoteStoreError::Decode(err.to_string()))?;
        Ok(decoded
            .values
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn append(
        &self,
        sheet_id: &str,
        range: &str,
        row: Vec<String>,
    ) -> Result<u32, RemoteStoreError> {
        let bearer = self.tokens.bearer().await?;
        let response = self
            .http
            .post(self.values_url(sheet_id, range, ":append"))
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(bearer)
            .json(&json!({ "values": [row] }))
            .send()
            .await
            .map_err(map_transport_error)?;
        let response = Self::check_status(response).await?;
        let decoded: AppendResponseDto = response
            .json()
            .await
            .map_err(|err| RemoteStoreError::Decode(err.to_string()))?;
        Ok(decoded
            .updates
            .and_then(|updates| updates.updated_rows)
            .unwrap_or(0))
    }

    async fn update(
        &self,
        sheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<(), RemoteStoreError> {
        let bearer = self.tokens.bearer().await?;
        let response = self
            .http
            .put(self.values_url(sheet_id, range, ""))
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(bearer)
            .json(&json!({ "values": rows }))
            .send()
            .await
            .map_err(map_transport_error)?;
        Self::check_status(response).await?;
        Ok(())
    }
}

fn map_transport_error(err: reqwest::Error) -> RemoteStoreError {
    RemoteStoreError::Transport(err.to_string())
}

/// Render a JSON cell as text. The values API usually returns strings, but
/// unformatted reads may yield numbers or booleans.
fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(json!("90"), "90")]
    #[case(json!(90), "90")]
    #[case(json!(true), "true")]
    #[case(json!(null), "")]
    fn cells_round_trip_as_strings(#[case] cell: Value, #[case] expected: &str) {
        assert_eq!(cell_to_string(cell), expected);
    }

    #[test]
    fn value_range_without_values_decodes_to_empty() {
        let decoded: ValueRangeDto = serde_json::from_str(r#"{"range":"A1:F1"}"#).expect("decode");
        assert!(decoded.values.is_none());
    }

    #[test]
    fn append_response_exposes_updated_rows() {
        let decoded: AppendResponseDto =
            serde_json::from_str(r#"{"updates":{"updatedRows":1}}"#).expect("decode");
        assert_eq!(decoded.updates.and_then(|u| u.updated_rows), Some(1));
    }
}
