use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use contracts::domain::a001_form::aggregate::{Form, FormDto};
use serde_json::json;

use crate::domain::{a001_form, a003_template};
use crate::state::AppState;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/forms
///
/// Forms owned by the caller plus the template catalog, so the builder
/// loads with one request.
pub async fn list(
    CurrentUser(claims): CurrentUser,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let forms = a001_form::service::list_by_user(&claims.sub)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let templates = a003_template::service::list_all_seeded()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(json!({
        "forms": forms,
        "templates": templates,
    })))
}

/// POST /api/forms
pub async fn create(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<FormDto>,
) -> Result<(StatusCode, Json<serde_json::Value>), StatusCode> {
    let form_id = a001_form::service::create(&claims.sub, dto)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Form created successfully",
            "form_id": form_id.to_string(),
            "id": form_id.to_string(),
        })),
    ))
}

/// GET /api/forms/:id
///
/// Public: respondents load the form without logging in.
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Form>, StatusCode> {
    let uuid = uuid::Uuid::parse_str(&id).map_err(|_| StatusCode::BAD_REQUEST)?;

    match a001_form::service::get_by_id(uuid).await {
        Ok(Some(form)) => Ok(Json(form)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// PUT /api/forms/:id
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<FormDto>,
) -> Result<Json<Form>, StatusCode> {
    let uuid = uuid::Uuid::parse_str(&id).map_err(|_| StatusCode::BAD_REQUEST)?;

    let form = a001_form::service::get_by_id(uuid)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    if form.user_id != claims.sub {
        return Err(StatusCode::FORBIDDEN);
    }

    let updated = a001_form::service::update(form, dto, state.sheets.as_ref())
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(updated))
}

/// DELETE /api/forms/:id
pub async fn delete(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let uuid = uuid::Uuid::parse_str(&id).map_err(|_| StatusCode::BAD_REQUEST)?;

    let form = a001_form::service::get_by_id(uuid)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    if form.user_id != claims.sub {
        return Err(StatusCode::FORBIDDEN);
    }

    match a001_form::service::delete(uuid).await {
        Ok(true) => Ok(Json(json!({"message": "Form deleted successfully"}))),
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /api/forms/client-email
///
/// The service account address users must share their spreadsheet with.
pub async fn client_email(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    Ok(Json(json!({
        "client_email": state.sheets.client_email(),
    })))
}
