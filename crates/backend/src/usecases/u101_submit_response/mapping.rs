use contracts::domain::a001_form::aggregate::{Field, Form};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Resolved spreadsheet target for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetBinding {
    /// `None` means the form has no binding and sync is skipped entirely.
    pub spreadsheet_id: Option<String>,
    pub sheet_name: String,
}

/// Resolve where a form's submissions mirror to.
///
/// The tab name prefers the top-level assignment, then settings, then a
/// deterministic `"SheetN"` fallback so unbound forms don't all pile into
/// Sheet1. The fallback is recomputed per submission, not persisted.
pub fn resolve_binding(form: &Form) -> SheetBinding {
    let spreadsheet_id = form.spreadsheet_id().map(str::to_string);
    let sheet_name = form
        .configured_sheet_name()
        .map(str::to_string)
        .unwrap_or_else(|| fallback_sheet_name(&form.id.to_string()));

    SheetBinding {
        spreadsheet_id,
        sheet_name,
    }
}

/// Deterministic fallback tab name: sha256 of the form id taken as a
/// big-endian integer, mod 1000, plus 1, so it always lands in Sheet1..Sheet1000.
pub fn fallback_sheet_name(form_id: &str) -> String {
    let digest = Sha256::digest(form_id.as_bytes());
    // Equivalent to (digest as one big integer) % 1000, folded byte by
    // byte to avoid big-integer arithmetic.
    let n = digest
        .iter()
        .fold(0u32, |acc, byte| (acc * 256 + u32::from(*byte)) % 1000);
    format!("Sheet{}", n + 1)
}

/// Column headers and the aligned value row for one submission.
///
/// Whether values are looked up by field id or by label is one upfront
/// majority vote over the whole payload: ids win only when strictly more
/// submitted keys match ids than labels. The decision is never made per
/// field, so one row cannot mix both keyings.
pub fn build_headers_and_row(
    fields: &[Field],
    data: &Map<String, Value>,
) -> (Vec<String>, Vec<String>) {
    let label_keys: HashSet<&str> = fields
        .iter()
        .filter(|f| !f.label.is_empty())
        .map(|f| f.label.as_str())
        .collect();
    let id_keys: HashSet<&str> = fields.iter().filter_map(|f| f.id.as_deref()).collect();

    let label_hits = data.keys().filter(|k| label_keys.contains(k.as_str())).count();
    let id_hits = data.keys().filter(|k| id_keys.contains(k.as_str())).count();
    let use_ids = id_hits > label_hits;

    let mut headers = Vec::new();
    let mut row = Vec::new();

    for field in fields {
        if field.label.is_empty() {
            continue;
        }
        headers.push(field.label.clone());

        let lookup_key = if use_ids {
            field.id.as_deref().unwrap_or(field.label.as_str())
        } else {
            field.label.as_str()
        };
        // Missing values become "", never a hole: column alignment with
        // the headers must survive partial submissions.
        row.push(data.get(lookup_key).map(value_to_cell).unwrap_or_default());
    }

    (headers, row)
}

/// Stringify a submitted value for a spreadsheet cell. The remote service
/// is left to auto-format numeric- and date-looking strings.
fn value_to_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use contracts::domain::a001_form::aggregate::FormId;
    use serde_json::json;

    fn field(label: &str) -> Field {
        Field {
            label: label.to_string(),
            field_type: "text".to_string(),
            required: false,
            id: None,
            options: None,
        }
    }

    fn field_with_id(label: &str, id: &str) -> Field {
        Field {
            id: Some(id.to_string()),
            ..field(label)
        }
    }

    fn data(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn form_with(
        settings: Map<String, Value>,
        google_sheet_name: Option<&str>,
    ) -> Form {
        let now = Utc::now();
        Form {
            id: FormId::new_v4(),
            user_id: "u1".to_string(),
            title: "T".to_string(),
            description: String::new(),
            fields: vec![],
            settings,
            google_sheet_id: None,
            google_sheet_name: google_sheet_name.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_headers_and_row_align_with_field_order() {
        let fields = vec![field("Name"), field("Email")];
        let submitted = data(&[
            ("Name", json!("Alice")),
            ("Email", json!("a@x.com")),
        ]);

        let (headers, row) = build_headers_and_row(&fields, &submitted);
        assert_eq!(headers, vec!["Name", "Email"]);
        assert_eq!(row, vec!["Alice", "a@x.com"]);
    }

    #[test]
    fn test_missing_value_becomes_empty_string() {
        let fields = vec![field_with_id("Name", "f1")];
        let (headers, row) = build_headers_and_row(&fields, &Map::new());
        assert_eq!(headers, vec!["Name"]);
        assert_eq!(row, vec![""]);
    }

    #[test]
    fn test_id_keys_win_on_strict_majority() {
        let fields = vec![field_with_id("Name", "f1")];
        let submitted = data(&[("f1", json!("Bob"))]);

        let (_, row) = build_headers_and_row(&fields, &submitted);
        assert_eq!(row, vec!["Bob"]);
    }

    #[test]
    fn test_tie_falls_back_to_labels() {
        // One key matches a label, one matches an id: not strictly more
        // id hits, so the whole row is keyed by label.
        let fields = vec![field_with_id("Name", "f1"), field_with_id("Email", "f2")];
        let submitted = data(&[
            ("Name", json!("Alice")),
            ("f2", json!("a@x.com")),
        ]);

        let (_, row) = build_headers_and_row(&fields, &submitted);
        assert_eq!(row, vec!["Alice", ""]);
    }

    #[test]
    fn test_unlabeled_fields_are_skipped() {
        let fields = vec![field("Name"), field(""), field("Email")];
        let submitted = data(&[("Name", json!("Alice"))]);

        let (headers, row) = build_headers_and_row(&fields, &submitted);
        assert_eq!(headers, vec!["Name", "Email"]);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_non_string_values_are_stringified() {
        let fields = vec![field("Tickets"), field("Confirmed")];
        let submitted = data(&[("Tickets", json!(3)), ("Confirmed", json!(true))]);

        let (_, row) = build_headers_and_row(&fields, &submitted);
        assert_eq!(row, vec!["3", "true"]);
    }

    #[test]
    fn test_fallback_sheet_name_is_deterministic_and_in_range() {
        let name = fallback_sheet_name("abc123");
        assert_eq!(name, fallback_sheet_name("abc123"));

        let n: u32 = name.strip_prefix("Sheet").unwrap().parse().unwrap();
        assert!((1..=1000).contains(&n));
    }

    #[test]
    fn test_resolve_binding_prefers_top_level_name() {
        let mut settings = Map::new();
        settings.insert("google_sheet_id".into(), json!("spread-1"));
        settings.insert("google_sheet_name".into(), json!("from settings"));

        let binding = resolve_binding(&form_with(settings, Some("top level")));
        assert_eq!(binding.spreadsheet_id.as_deref(), Some("spread-1"));
        assert_eq!(binding.sheet_name, "top level");
    }

    #[test]
    fn test_resolve_binding_falls_back_to_settings_then_hash() {
        let mut settings = Map::new();
        settings.insert("google_sheet_id".into(), json!("spread-1"));
        settings.insert("google_sheet_name".into(), json!("from settings"));
        let binding = resolve_binding(&form_with(settings, None));
        assert_eq!(binding.sheet_name, "from settings");

        let form = form_with(Map::new(), None);
        let binding = resolve_binding(&form);
        assert!(binding.spreadsheet_id.is_none());
        assert!(binding.sheet_name.starts_with("Sheet"));
        assert_eq!(
            binding.sheet_name,
            fallback_sheet_name(&form.id.to_string())
        );
    }

    #[test]
    fn test_top_level_sheet_id_is_the_second_choice() {
        let mut form = form_with(Map::new(), None);
        form.google_sheet_id = Some("top-spread".to_string());
        let binding = resolve_binding(&form);
        assert_eq!(binding.spreadsheet_id.as_deref(), Some("top-spread"));

        let mut settings = Map::new();
        settings.insert("google_sheet_id".into(), json!("settings-spread"));
        let mut form = form_with(settings, None);
        form.google_sheet_id = Some("top-spread".to_string());
        let binding = resolve_binding(&form);
        assert_eq!(binding.spreadsheet_id.as_deref(), Some("settings-spread"));
    }

    #[test]
    fn test_empty_sheet_id_means_no_binding() {
        let mut settings = Map::new();
        settings.insert("google_sheet_id".into(), json!(""));
        let binding = resolve_binding(&form_with(settings, None));
        assert!(binding.spreadsheet_id.is_none());
    }
}
