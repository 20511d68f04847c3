use chrono::Utc;
use contracts::domain::a002_response::aggregate::{FormId, FormResponse, ResponseId};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::repository;

/// Persist one raw submission, timestamped now. Append-only: responses are
/// never updated after this.
pub async fn create(form_id: Uuid, data: Map<String, Value>) -> anyhow::Result<ResponseId> {
    let response = FormResponse {
        id: ResponseId::new_v4(),
        form_id: FormId::new(form_id),
        data,
        submitted_at: Utc::now(),
    };
    repository::insert(&response).await
}

pub async fn list_by_form(form_id: Uuid) -> anyhow::Result<Vec<FormResponse>> {
    repository::list_by_form(form_id).await
}
