use chrono::Utc;
use contracts::domain::a001_form::aggregate::{
    Form, FormDto, FormId, SETTING_SHEET_ID, SETTING_SHEET_NAME,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::repository;
use crate::shared::sheets::SheetsApi;

const DEFAULT_THEME_COLOR: &str = "#2e86de";
const DEFAULT_CONFIRMATION: &str = "Thank you for your submission!";
const MAX_SHEET_TITLE_LEN: usize = 30;

/// Create a new form for `user_id`, assigning an owner-unique spreadsheet
/// tab name derived from the title.
///
/// The uniqueness check is best-effort (read names, then insert); a rare
/// concurrent collision costs only a cosmetic duplicate name.
pub async fn create(user_id: &str, dto: FormDto) -> anyhow::Result<Uuid> {
    let title = dto
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("Untitled Form")
        .to_string();

    let mut settings = default_settings();
    if let Some(incoming) = dto.settings {
        // Preserve the spreadsheet binding (and anything else) from the
        // builder, on top of the defaults.
        for (key, value) in incoming {
            settings.insert(key, value);
        }
    }

    let existing_names: Vec<String> = repository::list_by_user(user_id)
        .await?
        .into_iter()
        .filter_map(|f| f.google_sheet_name)
        .collect();
    let sheet_name = assign_sheet_name(&sheet_name_base(&title), &existing_names);

    let now = Utc::now();
    let form = Form {
        id: FormId::new_v4(),
        user_id: user_id.to_string(),
        title,
        description: dto.description.unwrap_or_default(),
        fields: dto.fields.unwrap_or_default(),
        settings,
        google_sheet_id: None,
        google_sheet_name: Some(sheet_name),
        created_at: now,
        updated_at: now,
    };

    repository::insert(&form).await
}

/// Apply a partial update to an owned form.
///
/// A title change recomputes the tab name and best-effort renames the live
/// spreadsheet tab; a rename failure is logged, never fatal.
pub async fn update(
    mut form: Form,
    dto: FormDto,
    sheets: &dyn SheetsApi,
) -> anyhow::Result<Form> {
    if let Some(title) = dto.title {
        let new_sheet_name = sheet_name_base(&title);
        let old_sheet_name = form
            .google_sheet_name
            .clone()
            .unwrap_or_else(|| "Sheet1".to_string());

        form.title = title;

        if old_sheet_name != new_sheet_name {
            if let Some(spreadsheet_id) = form.spreadsheet_id() {
                if let Err(e) = sheets
                    .rename_sheet(spreadsheet_id, &old_sheet_name, &new_sheet_name)
                    .await
                {
                    tracing::warn!("Failed to rename spreadsheet tab: {}", e);
                }
            }
            form.google_sheet_name = Some(new_sheet_name);
        }
    }

    if let Some(description) = dto.description {
        form.description = description;
    }
    if let Some(fields) = dto.fields {
        form.fields = fields;
    }
    if let Some(settings) = dto.settings {
        // A tab name configured through settings is promoted to the top
        // level so the submission pipeline sees one source of truth.
        if let Some(name) = settings
            .get(SETTING_SHEET_NAME)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
        {
            form.google_sheet_name = Some(name.to_string());
        }
        form.settings = settings;
    }

    form.updated_at = Utc::now();
    repository::update(&form).await?;
    Ok(form)
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Form>> {
    repository::get_by_id(id).await
}

pub async fn list_by_user(user_id: &str) -> anyhow::Result<Vec<Form>> {
    repository::list_by_user(user_id).await
}

fn default_settings() -> Map<String, Value> {
    let mut settings = Map::new();
    settings.insert("themeColor".into(), Value::String(DEFAULT_THEME_COLOR.into()));
    settings.insert(
        "confirmationMessage".into(),
        Value::String(DEFAULT_CONFIRMATION.into()),
    );
    settings
}

/// Turn a form title into the base tab name: keep ASCII alphanumerics and
/// spaces, truncate, append " sheet".
fn sheet_name_base(title: &str) -> String {
    let safe: String = title
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .take(MAX_SHEET_TITLE_LEN)
        .collect();
    let safe = safe.trim();
    if safe.is_empty() {
        "Untitled Form sheet".to_string()
    } else {
        format!("{} sheet", safe)
    }
}

/// Suffix a counter (2, 3, ...) until the name is unique among the
/// owner's existing tab names.
fn assign_sheet_name(base: &str, existing: &[String]) -> String {
    let mut candidate = base.to_string();
    let mut counter = 2;
    while existing.iter().any(|n| n == &candidate) {
        candidate = format!("{}{}", base, counter);
        counter += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_name_base_keeps_alphanumerics_and_spaces() {
        assert_eq!(sheet_name_base("Contact Form!"), "Contact Form sheet");
        assert_eq!(sheet_name_base("  RSVP (2026)  "), "RSVP 2026 sheet");
    }

    #[test]
    fn test_sheet_name_base_truncates_long_titles() {
        let long = "a".repeat(50);
        let name = sheet_name_base(&long);
        assert_eq!(name, format!("{} sheet", "a".repeat(30)));
    }

    #[test]
    fn test_sheet_name_base_empty_title_falls_back() {
        assert_eq!(sheet_name_base("!!!"), "Untitled Form sheet");
        assert_eq!(sheet_name_base(""), "Untitled Form sheet");
    }

    #[test]
    fn test_assign_sheet_name_counts_up_on_collision() {
        let existing = vec![
            "Survey sheet".to_string(),
            "Survey sheet2".to_string(),
        ];
        assert_eq!(assign_sheet_name("Survey sheet", &existing), "Survey sheet3");
        assert_eq!(assign_sheet_name("Other sheet", &existing), "Other sheet");
    }
}
