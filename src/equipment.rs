// ABOUTME: Equipment handlers for cameras, lenses, and filters
// ABOUTME: Inserts are scoped to the acting user; /materials feeds the frame-form dropdowns

use axum::{
    Form, Json,
    extract::State,
    response::{Html, Redirect},
};

use crate::AppState;
use crate::error::Result;
use crate::session::CurrentUser;
use crate::types::{CameraForm, FilterForm, LensForm, MaterialsResponse};

pub async fn add_camera_page(_user: CurrentUser) -> Html<&'static str> {
    Html(include_str!("../static/add_camera.html"))
}

pub async fn add_camera(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<CameraForm>,
) -> Result<Redirect> {
    let data = form.validate()?;
    let camera = state.storage.add_camera(user.id, data).await?;
    tracing::info!(user_id = user.id, camera_id = camera.id, "added camera");
    Ok(Redirect::to("/"))
}

pub async fn add_lens_page(_user: CurrentUser) -> Html<&'static str> {
    Html(include_str!("../static/add_lens.html"))
}

pub async fn add_lens(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<LensForm>,
) -> Result<Redirect> {
    let data = form.validate()?;
    let lens = state.storage.add_lens(user.id, data).await?;
    tracing::info!(user_id = user.id, lens_id = lens.id, "added lens");
    Ok(Redirect::to("/"))
}

pub async fn add_filter_page(_user: CurrentUser) -> Html<&'static str> {
    Html(include_str!("../static/add_filter.html"))
}

pub async fn add_filter(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<FilterForm>,
) -> Result<Redirect> {
    let data = form.validate()?;
    let filter = state.storage.add_filter(user.id, data).await?;
    tracing::info!(user_id = user.id, filter_id = filter.id, "added filter");
    Ok(Redirect::to("/"))
}

/// `GET /materials` — the caller's cameras, lenses, and filters.
pub async fn materials(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<MaterialsResponse>> {
    let cameras = state.storage.list_cameras(user.id).await?;
    let lenses = state.storage.list_lenses(user.id).await?;
    let filters = state.storage.list_filters(user.id).await?;
    Ok(Json(MaterialsResponse {
        cameras,
        lenses,
        filters,
    }))
}
