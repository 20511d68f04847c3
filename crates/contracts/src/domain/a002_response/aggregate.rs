use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use crate::domain::common::{FormId, ResponseId};

/// One end-user submission of values against a form.
///
/// Immutable once created; the pipeline only ever inserts and reads these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormResponse {
    pub id: ResponseId,
    pub form_id: FormId,
    /// Raw submitted values, keyed by field label or field id.
    pub data: Map<String, Value>,
    pub submitted_at: DateTime<Utc>,
}
