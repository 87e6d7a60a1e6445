// ABOUTME: Form payloads, per-field validation, and JSON response documents
// ABOUTME: Validation mirrors the form rules: required fields, catalog membership, sentinel selects

use serde::{Deserialize, Serialize};

use crate::entities::{camera, filter, frame, lens, roll};
use crate::error::{AppError, FieldError, Result};
use crate::films;

// ----- helpers -----

fn trimmed(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn required(field: &'static str, value: &str, errors: &mut Vec<FieldError>) -> String {
    match trimmed(value) {
        Some(v) => v,
        None => {
            errors.push(FieldError::new(field, "This field is required"));
            String::new()
        }
    }
}

/// Equipment selects submit "0" (or nothing) for "none selected"; anything
/// else must be a positive integer id.
fn equipment_ref(
    field: &'static str,
    value: &str,
    errors: &mut Vec<FieldError>,
) -> Option<i32> {
    match trimmed(value) {
        None => None,
        Some(v) => match v.parse::<i32>() {
            Ok(0) => None,
            Ok(id) if id > 0 => Some(id),
            _ => {
                errors.push(FieldError::new(field, "Invalid selection"));
                None
            }
        },
    }
}

fn finish(errors: Vec<FieldError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

// ----- auth forms -----

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password2: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(String, String)> {
        let mut errors = Vec::new();
        let username = required("username", &self.username, &mut errors);
        if !username.is_empty() && !(3..=80).contains(&username.chars().count()) {
            errors.push(FieldError::new(
                "username",
                "Username must be between 3 and 80 characters",
            ));
        }
        if self.password.chars().count() < 6 {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 6 characters",
            ));
        }
        if self.password != self.password2 {
            errors.push(FieldError::new("password2", "Passwords do not match"));
        }
        finish(errors)?;
        Ok((username, self.password.clone()))
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub remember: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

impl LoginForm {
    pub fn remember(&self) -> bool {
        matches!(self.remember.as_deref(), Some("on") | Some("true") | Some("1"))
    }

    /// Post-login target; only same-site paths are honored.
    pub fn next_path(&self) -> Option<&str> {
        self.next
            .as_deref()
            .filter(|n| n.starts_with('/') && !n.starts_with("//"))
    }
}

// ----- roll form -----

#[derive(Debug, Deserialize)]
pub struct RollForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub film_manufacturer: String,
    #[serde(default)]
    pub film_type: String,
    #[serde(default)]
    pub iso: String,
}

#[derive(Debug, Clone)]
pub struct NewRoll {
    pub name: String,
    pub film_manufacturer: String,
    pub film_type: String,
    pub iso: i32,
}

impl RollForm {
    pub fn validate(&self) -> Result<NewRoll> {
        let mut errors = Vec::new();
        let name = required("name", &self.name, &mut errors);
        let manufacturer_raw = required("film_manufacturer", &self.film_manufacturer, &mut errors);
        let film_type = required("film_type", &self.film_type, &mut errors);

        let manufacturer = films::title_case(&manufacturer_raw);
        if !manufacturer_raw.is_empty() && films::list_film_types(&manufacturer).is_empty() {
            errors.push(FieldError::new("film_manufacturer", "Unknown manufacturer"));
        } else if !manufacturer_raw.is_empty()
            && !film_type.is_empty()
            && !films::film_type_valid(&manufacturer, &film_type)
        {
            errors.push(FieldError::new(
                "film_type",
                "Film type does not belong to the selected manufacturer",
            ));
        }

        let iso = match required("iso", &self.iso, &mut errors).parse::<i32>() {
            Ok(v) if v > 0 => v,
            Ok(_) | Err(_) => {
                if !self.iso.trim().is_empty() {
                    errors.push(FieldError::new("iso", "ISO must be a positive number"));
                }
                0
            }
        };

        finish(errors)?;
        Ok(NewRoll {
            name,
            film_manufacturer: manufacturer,
            film_type,
            iso,
        })
    }
}

// ----- frame forms -----

/// Fields of the add-frame form, collected by hand from the multipart body.
#[derive(Debug, Default)]
pub struct FrameForm {
    pub filename: String,
    pub shutter_speed: String,
    pub aperture: String,
    pub camera: String,
    pub lens: String,
    pub filter: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewFrame {
    pub filename: Option<String>,
    pub shutter_speed: Option<String>,
    pub aperture: Option<String>,
    pub camera_id: Option<i32>,
    pub lens_id: Option<i32>,
    pub filter_id: Option<i32>,
}

impl FrameForm {
    pub fn validate(&self) -> Result<NewFrame> {
        let mut errors = Vec::new();
        let camera_id = equipment_ref("camera", &self.camera, &mut errors);
        let lens_id = equipment_ref("lens", &self.lens, &mut errors);
        let filter_id = equipment_ref("filter", &self.filter, &mut errors);
        finish(errors)?;
        Ok(NewFrame {
            filename: trimmed(&self.filename),
            shutter_speed: trimmed(&self.shutter_speed),
            aperture: trimmed(&self.aperture),
            camera_id,
            lens_id,
            filter_id,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct FrameEditForm {
    #[serde(default)]
    pub shutter_speed: String,
    #[serde(default)]
    pub aperture: String,
    #[serde(default)]
    pub camera: String,
    #[serde(default)]
    pub lens: String,
    #[serde(default)]
    pub filter: String,
}

/// Edit never touches frame_number or roll_id.
#[derive(Debug, Clone)]
pub struct FrameUpdate {
    pub shutter_speed: Option<String>,
    pub aperture: Option<String>,
    pub camera_id: Option<i32>,
    pub lens_id: Option<i32>,
    pub filter_id: Option<i32>,
}

impl FrameEditForm {
    pub fn validate(&self) -> Result<FrameUpdate> {
        let mut errors = Vec::new();
        let camera_id = equipment_ref("camera", &self.camera, &mut errors);
        let lens_id = equipment_ref("lens", &self.lens, &mut errors);
        let filter_id = equipment_ref("filter", &self.filter, &mut errors);
        finish(errors)?;
        Ok(FrameUpdate {
            shutter_speed: trimmed(&self.shutter_speed),
            aperture: trimmed(&self.aperture),
            camera_id,
            lens_id,
            filter_id,
        })
    }
}

// ----- equipment forms -----

#[derive(Debug, Deserialize)]
pub struct CameraForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub min_shutter_speed: String,
    #[serde(default)]
    pub max_shutter_speed: String,
    #[serde(default)]
    pub serial_number: String,
}

#[derive(Debug, Clone)]
pub struct NewCamera {
    pub name: String,
    pub brand: Option<String>,
    pub min_shutter_speed: Option<String>,
    pub max_shutter_speed: Option<String>,
    pub serial_number: Option<String>,
}

impl CameraForm {
    pub fn validate(&self) -> Result<NewCamera> {
        let mut errors = Vec::new();
        let name = required("name", &self.name, &mut errors);
        finish(errors)?;
        Ok(NewCamera {
            name,
            brand: trimmed(&self.brand),
            min_shutter_speed: trimmed(&self.min_shutter_speed),
            max_shutter_speed: trimmed(&self.max_shutter_speed),
            serial_number: trimmed(&self.serial_number),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LensForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub focal_length: String,
    #[serde(default)]
    pub min_aperture: String,
    #[serde(default)]
    pub max_aperture: String,
    #[serde(default)]
    pub serial_number: String,
}

#[derive(Debug, Clone)]
pub struct NewLens {
    pub name: String,
    pub focal_length: Option<String>,
    pub min_aperture: String,
    pub max_aperture: String,
    pub serial_number: Option<String>,
}

impl LensForm {
    pub fn validate(&self) -> Result<NewLens> {
        let mut errors = Vec::new();
        let name = required("name", &self.name, &mut errors);
        let min_aperture = required("min_aperture", &self.min_aperture, &mut errors);
        let max_aperture = required("max_aperture", &self.max_aperture, &mut errors);
        finish(errors)?;
        Ok(NewLens {
            name,
            focal_length: trimmed(&self.focal_length),
            min_aperture,
            max_aperture,
            serial_number: trimmed(&self.serial_number),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct FilterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: String,
}

#[derive(Debug, Clone)]
pub struct NewFilter {
    pub name: String,
    pub kind: Option<String>,
}

impl FilterForm {
    pub fn validate(&self) -> Result<NewFilter> {
        let mut errors = Vec::new();
        let name = required("name", &self.name, &mut errors);
        finish(errors)?;
        Ok(NewFilter {
            name,
            kind: trimmed(&self.kind),
        })
    }
}

// ----- response documents -----

#[derive(Debug, Serialize)]
pub struct RollListResponse {
    pub roles: Vec<roll::Model>,
}

#[derive(Debug, Serialize)]
pub struct RollDetailResponse {
    pub role: roll::Model,
    pub images: Vec<frame::Model>,
}

#[derive(Debug, Serialize)]
pub struct MaterialsResponse {
    pub cameras: Vec<camera::Model>,
    pub lenses: Vec<lens::Model>,
    pub filters: Vec<filter::Model>,
}

/// Downloadable export of one roll with equipment denormalized to names.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportDocument {
    pub role_name: String,
    pub film_manufacturer: String,
    pub film_type: String,
    pub iso: i32,
    pub images: Vec<ExportImage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportImage {
    pub frame_number: i32,
    pub filename: Option<String>,
    pub shutter_speed: Option<String>,
    pub aperture: Option<String>,
    pub camera: Option<String>,
    pub lens: Option<String>,
    pub filter: Option<String>,
    pub image_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_form_rejects_short_username_and_password() {
        let form = RegisterForm {
            username: "ab".to_string(),
            password: "123".to_string(),
            password2: "124".to_string(),
        };
        match form.validate() {
            Err(AppError::Validation(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert!(fields.contains(&"username"));
                assert!(fields.contains(&"password"));
                assert!(fields.contains(&"password2"));
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn roll_form_normalizes_manufacturer_case() {
        let form = RollForm {
            name: "Trip".to_string(),
            film_manufacturer: "kodak".to_string(),
            film_type: "Portra 400".to_string(),
            iso: "400".to_string(),
        };
        let roll = form.validate().unwrap();
        assert_eq!(roll.film_manufacturer, "Kodak");
        assert_eq!(roll.iso, 400);
    }

    #[test]
    fn roll_form_rejects_mismatched_film_type() {
        let form = RollForm {
            name: "Trip".to_string(),
            film_manufacturer: "Kodak".to_string(),
            film_type: "HP5 Plus".to_string(),
            iso: "400".to_string(),
        };
        match form.validate() {
            Err(AppError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.field == "film_type"));
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn frame_form_maps_zero_sentinel_to_none() {
        let form = FrameForm {
            camera: "0".to_string(),
            lens: "3".to_string(),
            filter: String::new(),
            ..Default::default()
        };
        let frame = form.validate().unwrap();
        assert_eq!(frame.camera_id, None);
        assert_eq!(frame.lens_id, Some(3));
        assert_eq!(frame.filter_id, None);
    }

    #[test]
    fn login_form_next_path_must_be_local() {
        let mut form = LoginForm {
            username: String::new(),
            password: String::new(),
            remember: None,
            next: Some("/role/3".to_string()),
        };
        assert_eq!(form.next_path(), Some("/role/3"));

        form.next = Some("https://evil.example".to_string());
        assert_eq!(form.next_path(), None);

        form.next = Some("//evil.example".to_string());
        assert_eq!(form.next_path(), None);
    }
}
