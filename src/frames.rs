// ABOUTME: Frame handlers: add with optional multipart upload, edit, and delete
// ABOUTME: Frame ownership is checked through the owning roll, 404 on any mismatch

use axum::{
    Form,
    extract::{Multipart, Path, State},
    response::{Html, Redirect},
};

use crate::AppState;
use crate::error::Result;
use crate::session::CurrentUser;
use crate::types::{FrameEditForm, FrameForm};
use crate::uploads::Upload;

pub async fn add_image_page(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(role_id): Path<i32>,
) -> Result<Html<&'static str>> {
    state.storage.roll_owned(user.id, role_id).await?;
    Ok(Html(include_str!("../static/add_image.html")))
}

/// `POST /role/:id/add_image` — multipart form with an optional file part.
/// The next frame_number and the insert happen inside one transaction in
/// the storage layer.
pub async fn add_image(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(role_id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Redirect> {
    let mut form = FrameForm::default();
    let mut upload: Option<Upload> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "filename" => form.filename = field.text().await?,
            "shutter_speed" => form.shutter_speed = field.text().await?,
            "aperture" => form.aperture = field.text().await?,
            "camera" => form.camera = field.text().await?,
            "lens" => form.lens = field.text().await?,
            "filter" => form.filter = field.text().await?,
            "image_file" => {
                let original_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                // Browsers submit an empty file part when nothing was picked.
                if !original_name.is_empty() && !bytes.is_empty() {
                    upload = Some(Upload {
                        original_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    let data = form.validate()?;
    let frame = state
        .storage
        .add_frame(user.id, role_id, data, upload, &state.config.upload_dir)
        .await?;
    tracing::info!(
        roll_id = role_id,
        frame_number = frame.frame_number,
        "added frame"
    );
    Ok(Redirect::to(&format!("/role/{}", role_id)))
}

fn attr_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `GET /edit_image/:id` — the edit form, prefilled with the frame's
/// current settings. It posts urlencoded back to the same URL.
pub async fn edit_image_page(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(image_id): Path<i32>,
) -> Result<Html<String>> {
    let frame = state.storage.frame_owned(user.id, image_id).await?;
    let page = include_str!("../static/edit_image.html")
        .replace(
            "{{shutter_speed}}",
            &attr_escape(frame.shutter_speed.as_deref().unwrap_or("")),
        )
        .replace(
            "{{aperture}}",
            &attr_escape(frame.aperture.as_deref().unwrap_or("")),
        )
        .replace("{{camera_id}}", &frame.camera_id.unwrap_or(0).to_string())
        .replace("{{lens_id}}", &frame.lens_id.unwrap_or(0).to_string())
        .replace("{{filter_id}}", &frame.filter_id.unwrap_or(0).to_string());
    Ok(Html(page))
}

/// `POST /edit_image/:id` — shutter speed, aperture, and equipment only;
/// frame_number and roll stay fixed.
pub async fn edit_image(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(image_id): Path<i32>,
    Form(form): Form<FrameEditForm>,
) -> Result<Redirect> {
    let update = form.validate()?;
    let frame = state.storage.update_frame(user.id, image_id, update).await?;
    Ok(Redirect::to(&format!("/role/{}", frame.roll_id)))
}

/// `GET /delete_image/:id` — removes the frame; numbering of the rest of
/// the roll is untouched and the number is never reissued.
pub async fn delete_image(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(image_id): Path<i32>,
) -> Result<Redirect> {
    let roll_id = state.storage.delete_frame(user.id, image_id).await?;
    tracing::info!(frame_id = image_id, "deleted frame");
    Ok(Redirect::to(&format!("/role/{}", roll_id)))
}
