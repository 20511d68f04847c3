use chrono::Utc;
use contracts::domain::a001_form::aggregate::Form;
use contracts::usecases::u101_submit_response::{GoogleSheetsOutcome, SubmitResult};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::SubmitError;
use super::mapping;
use crate::domain::{a001_form, a002_response};
use crate::shared::sheets::{SheetsApi, SheetsError};

/// Run the submission pipeline for one inbound payload.
///
/// The database write is the primary guarantee; the spreadsheet mirror is
/// best-effort and can never turn a stored submission into a failure.
pub async fn submit(
    form_id: Uuid,
    data: Map<String, Value>,
    sheets: &dyn SheetsApi,
) -> Result<SubmitResult, SubmitError> {
    let form = a001_form::service::get_by_id(form_id)
        .await
        .map_err(SubmitError::Persistence)?
        .ok_or(SubmitError::FormNotFound)?;

    if data.is_empty() {
        return Err(SubmitError::EmptyPayload);
    }

    let response_id = a002_response::service::create(form_id, data.clone())
        .await
        .map_err(SubmitError::Persistence)?;
    tracing::info!("Response {} saved for form {}", response_id, form_id);

    let google_sheets = sync_to_sheets(&form, &data, sheets).await;

    Ok(SubmitResult {
        message: "Response submitted successfully".to_string(),
        timestamp: Utc::now(),
        response_id: response_id.to_string(),
        database_success: true,
        google_sheets,
    })
}

/// Mirror one persisted submission into the form's spreadsheet.
///
/// Every failure in here is captured into the outcome; nothing escapes.
pub async fn sync_to_sheets(
    form: &Form,
    data: &Map<String, Value>,
    sheets: &dyn SheetsApi,
) -> GoogleSheetsOutcome {
    let binding = mapping::resolve_binding(form);
    let Some(spreadsheet_id) = binding.spreadsheet_id else {
        return GoogleSheetsOutcome::skipped(binding.sheet_name);
    };
    let sheet_name = binding.sheet_name;

    let (headers, row) = mapping::build_headers_and_row(&form.fields, data);
    tracing::debug!(
        "Syncing form {} to {}/{}: {} columns",
        form.id,
        spreadsheet_id,
        sheet_name,
        headers.len()
    );

    // Headers are a convenience, not a correctness requirement: a failure
    // here must not block the row append.
    if let Err(e) = setup_headers(sheets, &spreadsheet_id, &sheet_name, &headers).await {
        tracing::warn!("Header setup issue for form {}: {}", form.id, e);
    }

    match sheets.append_row(&spreadsheet_id, &sheet_name, &row).await {
        Ok(outcome) => {
            tracing::info!(
                "Appended row for form {} ({})",
                form.id,
                outcome.updated_range.as_deref().unwrap_or("range unknown")
            );
            GoogleSheetsOutcome {
                spreadsheet_id: Some(spreadsheet_id),
                sheet_name,
                sync_attempted: true,
                success: true,
                error: None,
                updated_range: outcome.updated_range,
            }
        }
        Err(e) => {
            tracing::error!("Google Sheets error for form {}: {}", form.id, e);
            GoogleSheetsOutcome {
                spreadsheet_id: Some(spreadsheet_id),
                sheet_name,
                sync_attempted: true,
                success: false,
                error: Some(e.to_string()),
                updated_range: None,
            }
        }
    }
}

async fn setup_headers(
    sheets: &dyn SheetsApi,
    spreadsheet_id: &str,
    sheet_name: &str,
    headers: &[String],
) -> Result<(), SheetsError> {
    sheets.ensure_sheet_exists(spreadsheet_id, sheet_name).await?;
    sheets.write_headers(spreadsheet_id, sheet_name, headers).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::sheets::AppendOutcome;
    use async_trait::async_trait;
    use contracts::domain::a001_form::aggregate::{Field, FormId};
    use serde_json::json;
    use std::sync::Mutex;

    /// Fake spreadsheet service recording calls and failing on demand.
    struct FakeSheets {
        fail_headers: bool,
        fail_append: bool,
        appended: Mutex<Vec<Vec<String>>>,
    }

    impl FakeSheets {
        fn new() -> Self {
            Self {
                fail_headers: false,
                fail_append: false,
                appended: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SheetsApi for FakeSheets {
        async fn ensure_sheet_exists(&self, _: &str, _: &str) -> Result<(), SheetsError> {
            Ok(())
        }

        async fn write_headers(
            &self,
            _: &str,
            _: &str,
            _: &[String],
        ) -> Result<(), SheetsError> {
            if self.fail_headers {
                return Err(SheetsError::Api {
                    status: 500,
                    message: "header write failed".to_string(),
                });
            }
            Ok(())
        }

        async fn append_row(
            &self,
            _: &str,
            _: &str,
            row: &[String],
        ) -> Result<AppendOutcome, SheetsError> {
            if self.fail_append {
                return Err(SheetsError::Api {
                    status: 503,
                    message: "service unavailable".to_string(),
                });
            }
            self.appended.lock().unwrap().push(row.to_vec());
            Ok(AppendOutcome {
                updated_range: Some("Sheet7!A2:B2".to_string()),
            })
        }

        async fn rename_sheet(&self, _: &str, _: &str, _: &str) -> Result<(), SheetsError> {
            Ok(())
        }

        fn client_email(&self) -> &str {
            "fake@example.iam.gserviceaccount.com"
        }
    }

    fn bound_form() -> Form {
        let now = Utc::now();
        let mut settings = Map::new();
        settings.insert("google_sheet_id".into(), json!("spread-1"));
        Form {
            id: FormId::new_v4(),
            user_id: "u1".to_string(),
            title: "Contact".to_string(),
            description: String::new(),
            fields: vec![
                Field {
                    label: "Name".to_string(),
                    field_type: "text".to_string(),
                    required: true,
                    id: None,
                    options: None,
                },
                Field {
                    label: "Email".to_string(),
                    field_type: "email".to_string(),
                    required: true,
                    id: None,
                    options: None,
                },
            ],
            settings,
            google_sheet_id: None,
            google_sheet_name: Some("Contact sheet".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    fn payload() -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("Name".into(), json!("Alice"));
        data.insert("Email".into(), json!("a@x.com"));
        data
    }

    #[tokio::test]
    async fn test_unbound_form_skips_sync() {
        let mut form = bound_form();
        form.settings = Map::new();
        let sheets = FakeSheets::new();

        let outcome = sync_to_sheets(&form, &payload(), &sheets).await;
        assert!(!outcome.sync_attempted);
        assert!(!outcome.success);
        assert!(outcome.error.is_none());
        assert!(sheets.appended.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_successful_sync_reports_updated_range() {
        let sheets = FakeSheets::new();
        let outcome = sync_to_sheets(&bound_form(), &payload(), &sheets).await;

        assert!(outcome.sync_attempted);
        assert!(outcome.success);
        assert_eq!(outcome.spreadsheet_id.as_deref(), Some("spread-1"));
        assert_eq!(outcome.sheet_name, "Contact sheet");
        assert_eq!(outcome.updated_range.as_deref(), Some("Sheet7!A2:B2"));

        let appended = sheets.appended.lock().unwrap();
        assert_eq!(appended.as_slice(), &[vec!["Alice".to_string(), "a@x.com".to_string()]]);
    }

    #[tokio::test]
    async fn test_append_failure_is_captured_not_propagated() {
        let sheets = FakeSheets {
            fail_append: true,
            ..FakeSheets::new()
        };
        let outcome = sync_to_sheets(&bound_form(), &payload(), &sheets).await;

        assert!(outcome.sync_attempted);
        assert!(!outcome.success);
        assert!(outcome.error.as_deref().unwrap().contains("503"));
        assert!(outcome.updated_range.is_none());
    }

    // Drives `submit` through the real SQLite-backed stores. Single test
    // because the global connection can only be initialized once per
    // process.
    #[tokio::test]
    async fn test_submit_persists_exactly_one_record_per_call() {
        use contracts::domain::a001_form::aggregate::FormDto;

        let db_path = std::env::temp_dir().join(format!("forms-test-{}.db", Uuid::new_v4()));
        crate::shared::data::db::initialize_database(db_path.to_str())
            .await
            .unwrap();

        // Unknown form is rejected before anything is stored.
        let missing = Uuid::new_v4();
        let err = submit(missing, payload(), &FakeSheets::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::FormNotFound));
        assert!(a002_response::service::list_by_form(missing)
            .await
            .unwrap()
            .is_empty());

        let mut settings = Map::new();
        settings.insert("google_sheet_id".into(), json!("spread-1"));
        let dto = FormDto {
            title: Some("Contact".to_string()),
            description: None,
            fields: None,
            settings: Some(settings),
        };
        let form_id = a001_form::service::create("u1", dto).await.unwrap();

        // Empty payload is rejected after the lookup, still nothing stored.
        let err = submit(form_id, Map::new(), &FakeSheets::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::EmptyPayload));
        assert!(a002_response::service::list_by_form(form_id)
            .await
            .unwrap()
            .is_empty());

        // A failed mirror still persists exactly one record.
        let failing = FakeSheets {
            fail_append: true,
            ..FakeSheets::new()
        };
        let first = submit(form_id, payload(), &failing).await.unwrap();
        assert!(first.database_success);
        assert!(first.google_sheets.sync_attempted);
        assert!(!first.google_sheets.success);
        assert_eq!(
            a002_response::service::list_by_form(form_id)
                .await
                .unwrap()
                .len(),
            1
        );

        // An identical resubmission is a second record, never an upsert.
        let second = submit(form_id, payload(), &FakeSheets::new()).await.unwrap();
        assert!(second.google_sheets.success);
        assert_ne!(first.response_id, second.response_id);
        let stored = a002_response::service::list_by_form(form_id).await.unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn test_header_failure_does_not_block_append() {
        let sheets = FakeSheets {
            fail_headers: true,
            ..FakeSheets::new()
        };
        let outcome = sync_to_sheets(&bound_form(), &payload(), &sheets).await;

        assert!(outcome.success);
        assert_eq!(sheets.appended.lock().unwrap().len(), 1);
    }
}
