use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of the best-effort spreadsheet mirror for one submission.
///
/// `success` refers to the row append only; header setup problems are
/// logged but do not mark the sync as failed on their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleSheetsOutcome {
    pub spreadsheet_id: Option<String>,
    pub sheet_name: String,
    pub sync_attempted: bool,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_range: Option<String>,
}

impl GoogleSheetsOutcome {
    /// Outcome for a form with no spreadsheet binding: nothing attempted.
    pub fn skipped(sheet_name: String) -> Self {
        Self {
            spreadsheet_id: None,
            sheet_name,
            sync_attempted: false,
            success: false,
            error: None,
            updated_range: None,
        }
    }
}

/// Composite result of one submission.
///
/// The caller can always distinguish "my data is safely stored"
/// (`database_success`) from "it is also mirrored externally"
/// (`google_sheets.success`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResult {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub response_id: String,
    pub database_success: bool,
    pub google_sheets: GoogleSheetsOutcome,
}
