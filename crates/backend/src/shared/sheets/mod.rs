pub mod auth;
pub mod client;
pub mod error;

pub use client::GoogleSheetsClient;
pub use error::SheetsError;

use async_trait::async_trait;

/// Descriptor returned by a successful row append.
#[derive(Debug, Clone, Default)]
pub struct AppendOutcome {
    /// A1 range the remote service reports as updated, e.g. "Sheet7!A2:C2".
    pub updated_range: Option<String>,
}

/// Remote tabular-data service operations used by the submission pipeline.
///
/// The production implementation talks to the Google Sheets REST API; tests
/// substitute a fake. The handle is constructed once in `main` and injected
/// through the router state.
#[async_trait]
pub trait SheetsApi: Send + Sync {
    /// Create the tab titled `sheet_name` if the spreadsheet has none.
    async fn ensure_sheet_exists(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
    ) -> Result<(), SheetsError>;

    /// Overwrite row 1 with `headers` when it differs (including when the
    /// row is empty). On a not-found read the tab is repaired once via
    /// `ensure_sheet_exists` and the write retried exactly once.
    async fn write_headers(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        headers: &[String],
    ) -> Result<(), SheetsError>;

    /// Append `row` after the existing data in the tab.
    async fn append_row(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        row: &[String],
    ) -> Result<AppendOutcome, SheetsError>;

    /// Retitle an existing tab. A missing source tab is not an error.
    async fn rename_sheet(
        &self,
        spreadsheet_id: &str,
        old_title: &str,
        new_title: &str,
    ) -> Result<(), SheetsError>;

    /// Service-account email form owners share their spreadsheets with.
    fn client_email(&self) -> &str;
}

/// Stand-in used when no service-account credentials are configured.
///
/// Submissions still persist; every sync attempt reports a credentials
/// error into the per-request outcome instead of failing the request.
pub struct UnconfiguredSheets;

#[async_trait]
impl SheetsApi for UnconfiguredSheets {
    async fn ensure_sheet_exists(&self, _: &str, _: &str) -> Result<(), SheetsError> {
        Err(SheetsError::Credentials(
            "Google Sheets credentials not configured".to_string(),
        ))
    }

    async fn write_headers(&self, _: &str, _: &str, _: &[String]) -> Result<(), SheetsError> {
        Err(SheetsError::Credentials(
            "Google Sheets credentials not configured".to_string(),
        ))
    }

    async fn append_row(&self, _: &str, _: &str, _: &[String]) -> Result<AppendOutcome, SheetsError> {
        Err(SheetsError::Credentials(
            "Google Sheets credentials not configured".to_string(),
        ))
    }

    async fn rename_sheet(&self, _: &str, _: &str, _: &str) -> Result<(), SheetsError> {
        Err(SheetsError::Credentials(
            "Google Sheets credentials not configured".to_string(),
        ))
    }

    fn client_email(&self) -> &str {
        ""
    }
}
