use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;

use super::auth::{ServiceAccountKey, TokenProvider};
use super::error::SheetsError;
use super::{AppendOutcome, SheetsApi};

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// HTTP client for the Google Sheets v4 REST API.
pub struct GoogleSheetsClient {
    http: reqwest::Client,
    auth: TokenProvider,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    #[serde(rename = "sheetId")]
    sheet_id: i64,
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Deserialize)]
struct AppendResponse {
    #[serde(default)]
    updates: Option<AppendUpdates>,
}

#[derive(Deserialize)]
struct AppendUpdates {
    #[serde(rename = "updatedRange")]
    updated_range: Option<String>,
}

impl GoogleSheetsClient {
    pub fn new(credentials_path: &Path) -> Result<Self, SheetsError> {
        let key = ServiceAccountKey::from_file(credentials_path)?;
        let auth = TokenProvider::new(key)?;
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self { http, auth })
    }

    async fn bearer(&self) -> Result<String, SheetsError> {
        self.auth.access_token(&self.http).await
    }

    /// Classify a non-success response. 404s (and the "Unable to parse
    /// range" shape the API uses for missing tabs) become `NotFound` so the
    /// header write can self-heal.
    async fn error_from(response: reqwest::Response) -> SheetsError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        if status == 404 || (status == 400 && body.contains("Unable to parse range")) {
            SheetsError::NotFound(body)
        } else {
            SheetsError::Api {
                status,
                message: body,
            }
        }
    }

    async fn fetch_sheet_properties(
        &self,
        spreadsheet_id: &str,
    ) -> Result<Vec<SheetProperties>, SheetsError> {
        let token = self.bearer().await?;
        let url = format!("{}/{}?fields=sheets.properties", API_BASE, spreadsheet_id);
        let response = self.http.get(&url).bearer_auth(&token).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let meta: SpreadsheetMeta = response.json().await?;
        Ok(meta.sheets.into_iter().map(|s| s.properties).collect())
    }

    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        requests: serde_json::Value,
    ) -> Result<(), SheetsError> {
        let token = self.bearer().await?;
        let url = format!("{}/{}:batchUpdate", API_BASE, spreadsheet_id);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&json!({ "requests": requests }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }

    /// Read row 1 of the tab's header range. `None` when the read itself
    /// reports the tab missing.
    async fn read_header_row(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
    ) -> Result<Option<Vec<String>>, SheetsError> {
        let token = self.bearer().await?;
        let range = a1_range(sheet_name, "A1:Z1");
        let url = format!(
            "{}/{}/values/{}",
            API_BASE,
            spreadsheet_id,
            urlencoding::encode(&range)
        );
        let response = self.http.get(&url).bearer_auth(&token).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let value_range: ValueRange = response.json().await?;
        Ok(value_range.values.into_iter().next())
    }

    async fn put_header_row(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        headers: &[String],
    ) -> Result<(), SheetsError> {
        let token = self.bearer().await?;
        let range = a1_range(sheet_name, "A1:Z1");
        let url = format!(
            "{}/{}/values/{}?valueInputOption=USER_ENTERED",
            API_BASE,
            spreadsheet_id,
            urlencoding::encode(&range)
        );
        let response = self
            .http
            .put(&url)
            .bearer_auth(&token)
            .json(&json!({ "values": [headers] }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }
}

#[async_trait]
impl SheetsApi for GoogleSheetsClient {
    async fn ensure_sheet_exists(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
    ) -> Result<(), SheetsError> {
        let sheets = self.fetch_sheet_properties(spreadsheet_id).await?;
        if sheets.iter().any(|s| s.title == sheet_name) {
            return Ok(());
        }

        tracing::info!("Creating sheet tab '{}'", sheet_name);
        self.batch_update(
            spreadsheet_id,
            json!([{ "addSheet": { "properties": { "title": sheet_name } } }]),
        )
        .await
    }

    async fn write_headers(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        headers: &[String],
    ) -> Result<(), SheetsError> {
        // A tab can be deleted externally between form creation and first
        // submission; repair once and retry once, never loop.
        let current = match self.read_header_row(spreadsheet_id, sheet_name).await {
            Ok(row) => row,
            Err(e) if e.is_not_found() => {
                self.ensure_sheet_exists(spreadsheet_id, sheet_name).await?;
                self.read_header_row(spreadsheet_id, sheet_name).await?
            }
            Err(e) => return Err(e),
        };

        let up_to_date = current.as_deref() == Some(headers);
        if !up_to_date {
            self.put_header_row(spreadsheet_id, sheet_name, headers)
                .await?;
        }
        Ok(())
    }

    async fn append_row(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        row: &[String],
    ) -> Result<AppendOutcome, SheetsError> {
        let token = self.bearer().await?;
        let range = a1_range(sheet_name, "A1");
        let url = format!(
            "{}/{}/values/{}:append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
            API_BASE,
            spreadsheet_id,
            urlencoding::encode(&range)
        );
        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&json!({ "values": [row], "majorDimension": "ROWS" }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let append: AppendResponse = response.json().await?;
        Ok(AppendOutcome {
            updated_range: append.updates.and_then(|u| u.updated_range),
        })
    }

    async fn rename_sheet(
        &self,
        spreadsheet_id: &str,
        old_title: &str,
        new_title: &str,
    ) -> Result<(), SheetsError> {
        let sheets = self.fetch_sheet_properties(spreadsheet_id).await?;
        let Some(sheet) = sheets.iter().find(|s| s.title == old_title) else {
            tracing::warn!(
                "Sheet tab '{}' not found in {}; skipping rename",
                old_title,
                spreadsheet_id
            );
            return Ok(());
        };

        self.batch_update(
            spreadsheet_id,
            json!([{
                "updateSheetProperties": {
                    "properties": { "sheetId": sheet.sheet_id, "title": new_title },
                    "fields": "title"
                }
            }]),
        )
        .await
    }

    fn client_email(&self) -> &str {
        self.auth.client_email()
    }
}

/// Build an A1 range reference, quoting the sheet title when it contains
/// anything beyond plain alphanumerics.
fn a1_range(sheet_name: &str, cells: &str) -> String {
    let plain = !sheet_name.is_empty()
        && sheet_name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        format!("{}!{}", sheet_name, cells)
    } else {
        format!("'{}'!{}", sheet_name.replace('\'', "''"), cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_sheet_name_is_unquoted() {
        assert_eq!(a1_range("Sheet7", "A1:Z1"), "Sheet7!A1:Z1");
    }

    #[test]
    fn test_sheet_name_with_spaces_is_quoted() {
        assert_eq!(a1_range("Contact Form sheet", "A1"), "'Contact Form sheet'!A1");
    }

    #[test]
    fn test_embedded_quote_is_doubled() {
        assert_eq!(a1_range("Bob's sheet", "A1"), "'Bob''s sheet'!A1");
    }
}
