// ABOUTME: Roll handlers: listing, creation, detail view, film catalog, and export
// ABOUTME: Every lookup is scoped to the authenticated user via the ownership predicate

use axum::{
    Form, Json,
    extract::{Path, State},
    http::{HeaderValue, header},
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::AppState;
use crate::error::{AppError, Result};
use crate::films;
use crate::session::CurrentUser;
use crate::types::{RollDetailResponse, RollForm, RollListResponse};

/// `GET /` and `GET /roles` — only the caller's rolls.
pub async fn index(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<RollListResponse>> {
    let roles = state.storage.list_rolls(user.id).await?;
    Ok(Json(RollListResponse { roles }))
}

/// `GET /get_films/:manufacturer` — film types for the cascading dropdown.
pub async fn get_films(
    _user: CurrentUser,
    Path(manufacturer): Path<String>,
) -> Json<Vec<&'static str>> {
    Json(films::list_film_types(&manufacturer).to_vec())
}

pub async fn add_role_page(_user: CurrentUser) -> Html<&'static str> {
    Html(include_str!("../static/add_role.html"))
}

pub async fn add_role(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<RollForm>,
) -> Result<Redirect> {
    let data = form.validate()?;
    let roll = state.storage.create_roll(user.id, data).await?;
    tracing::info!(user_id = user.id, roll_id = roll.id, "added roll");
    Ok(Redirect::to("/"))
}

/// `GET /role/:id` — detail with frames ordered by frame_number, 404 if
/// the roll is not the caller's.
pub async fn role_view(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(role_id): Path<i32>,
) -> Result<Json<RollDetailResponse>> {
    let role = state.storage.roll_owned(user.id, role_id).await?;
    let images = state.storage.roll_frames(role.id).await?;
    Ok(Json(RollDetailResponse { role, images }))
}

/// `GET /role/:id/export_json` — downloadable JSON document.
pub async fn export_role_json(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(role_id): Path<i32>,
) -> Result<Response> {
    let document = state.storage.export_roll(user.id, role_id).await?;

    let mut response = Json(document).into_response();
    let disposition = format!("attachment; filename=role_{}_export.json", role_id);
    response.headers_mut().insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|e| AppError::Internal(format!("Invalid header value: {}", e)))?,
    );
    Ok(response)
}
