use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use contracts::domain::a002_response::aggregate::FormResponse;
use contracts::usecases::u101_submit_response::SubmitResult;
use serde_json::{Map, Value};

use crate::domain::{a001_form, a002_response};
use crate::state::AppState;
use crate::usecases::u101_submit_response::{self, SubmitError};

/// POST /api/forms/:id/responses (also mounted at /api/responses/:id)
///
/// Public: anyone with the form link can submit.
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(data): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<SubmitResult>), SubmitError> {
    let form_id = uuid::Uuid::parse_str(&id).map_err(|_| SubmitError::FormNotFound)?;

    let result = u101_submit_response::submit(form_id, data, state.sheets.as_ref()).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /api/responses/:id
///
/// Plain array of a form's stored submissions, oldest first. Served
/// without authentication, like the render endpoint.
pub async fn list_by_form(Path(id): Path<String>) -> Result<Json<Vec<FormResponse>>, StatusCode> {
    let form_id = uuid::Uuid::parse_str(&id).map_err(|_| StatusCode::BAD_REQUEST)?;

    a001_form::service::get_by_id(form_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let responses = a002_response::service::list_by_form(form_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(responses))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use contracts::domain::a002_response::aggregate::{FormId, FormResponse, ResponseId};
    use serde_json::Map;

    #[test]
    fn test_response_listing_serializes_as_bare_array_with_string_ids() {
        let responses = vec![FormResponse {
            id: ResponseId::new_v4(),
            form_id: FormId::new_v4(),
            data: Map::new(),
            submitted_at: Utc::now(),
        }];

        let value = serde_json::to_value(&responses).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0]["id"].is_string());
        assert!(items[0]["form_id"].is_string());
    }
}
