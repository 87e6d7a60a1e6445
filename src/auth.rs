// ABOUTME: Registration, login, and logout handlers with argon2 password hashing
// ABOUTME: Login sets the HttpOnly session cookie and honors the post-login next path

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::AppState;
use crate::error::{AppError, Result};
use crate::session::{self, CurrentUser};
use crate::types::{LoginForm, RegisterForm};

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

pub async fn register_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    if session::extract_session_from_jar(&jar, &state.sessions).is_ok() {
        return Redirect::to("/").into_response();
    }
    Html(include_str!("../static/register.html")).into_response()
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect> {
    if session::extract_session_from_jar(&jar, &state.sessions).is_ok() {
        return Ok(Redirect::to("/"));
    }
    let (username, password) = form.validate()?;
    let password_hash = hash_password(&password)?;
    let user = state.storage.create_user(&username, &password_hash).await?;
    tracing::info!(user_id = user.id, "registered user");
    Ok(Redirect::to("/login"))
}

pub async fn login_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    if session::extract_session_from_jar(&jar, &state.sessions).is_ok() {
        return Redirect::to("/").into_response();
    }
    Html(include_str!("../static/login.html")).into_response()
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect)> {
    if session::extract_session_from_jar(&jar, &state.sessions).is_ok() {
        return Ok((jar, Redirect::to("/")));
    }
    // Unknown user and wrong password take the same exit.
    let user = state
        .storage
        .find_user_by_username(&form.username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&form.password, &user.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let remember = form.remember();
    let session_id = state.sessions.create_session(user.id, remember);
    let cookie =
        session::create_session_cookie(session_id, state.config.secure_cookies, remember);
    let jar = jar.add(cookie);

    let target = form.next_path().unwrap_or("/").to_string();
    tracing::info!(user_id = user.id, "logged in");
    Ok((jar, Redirect::to(&target)))
}

pub async fn logout(
    State(state): State<AppState>,
    _user: CurrentUser,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    if let Some(cookie) = jar.get(session::SESSION_COOKIE_NAME) {
        state.sessions.remove_session(cookie.value());
    }
    let jar = jar.add(session::create_logout_cookie(state.config.secure_cookies));
    (jar, Redirect::to("/login"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert_ne!(hash, "correct horse");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_stored_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
