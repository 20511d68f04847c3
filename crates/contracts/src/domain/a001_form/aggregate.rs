use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use crate::domain::common::FormId;

// Settings keys recognized by the submission pipeline.
pub const SETTING_SHEET_ID: &str = "google_sheet_id";
pub const SETTING_SHEET_NAME: &str = "google_sheet_name";

/// One typed input slot within a form.
///
/// `label` doubles as the spreadsheet column header, so the position of a
/// field in `Form::fields` defines both display order and column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    /// Optional machine identifier; submissions may key values by it
    /// instead of by label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Choice options for select/radio fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// A user-defined schema of input fields plus presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    pub id: FormId,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Free-form settings map (themeColor, confirmationMessage, and
    /// optionally the spreadsheet binding keys).
    #[serde(default)]
    pub settings: Map<String, Value>,
    /// Top-level spreadsheet binding; the settings entry wins when both
    /// are present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_sheet_id: Option<String>,
    /// Owner-scoped spreadsheet tab name assigned at creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_sheet_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Form {
    fn settings_str(&self, key: &str) -> Option<&str> {
        self.settings
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Spreadsheet id the form mirrors to, if configured: settings entry
    /// first, then the top-level field.
    pub fn spreadsheet_id(&self) -> Option<&str> {
        self.settings_str(SETTING_SHEET_ID)
            .or_else(|| self.google_sheet_id.as_deref().filter(|s| !s.is_empty()))
    }

    /// Explicitly configured tab name: top-level first, settings second.
    pub fn configured_sheet_name(&self) -> Option<&str> {
        self.google_sheet_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.settings_str(SETTING_SHEET_NAME))
    }
}

/// Payload for creating or updating a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<Field>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
}
