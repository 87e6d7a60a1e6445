// ABOUTME: Session management with HttpOnly cookies for authenticated users
// ABOUTME: Provides the CurrentUser extractor that redirects anonymous requests to login

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::AppState;
use crate::entities::user;
use crate::error::{AppError, Result};

pub const SESSION_COOKIE_NAME: &str = "filmlog_session";

/// Browser-session lifetime unless the user asked to be remembered.
const SESSION_MAX_AGE: i64 = 24 * 60 * 60;
const REMEMBER_MAX_AGE: i64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: i32,
    pub created_at: i64,
    pub expires_at: i64,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn create_session(&self, user_id: i32, remember: bool) -> String {
        let session_id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().timestamp();
        let max_age = if remember {
            REMEMBER_MAX_AGE
        } else {
            SESSION_MAX_AGE
        };
        let session_data = SessionData {
            user_id,
            created_at: now,
            expires_at: now + max_age,
        };

        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(session_id.clone(), session_data);
        }

        session_id
    }

    pub fn get_session(&self, session_id: &str) -> Option<SessionData> {
        let now = chrono::Utc::now().timestamp();
        if let Ok(sessions) = self.sessions.read() {
            sessions
                .get(session_id)
                .filter(|session| session.expires_at > now)
                .cloned()
        } else {
            None
        }
    }

    pub fn remove_session(&self, session_id: &str) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.remove(session_id);
        }
    }

    pub fn cleanup_expired_sessions(&self) {
        let now = chrono::Utc::now().timestamp();
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.retain(|_, session| session.expires_at > now);
        }
    }
}

pub fn create_session_cookie(session_id: String, secure: bool, remember: bool) -> Cookie<'static> {
    let max_age = if remember {
        REMEMBER_MAX_AGE
    } else {
        SESSION_MAX_AGE
    };
    Cookie::build((SESSION_COOKIE_NAME, session_id))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(max_age))
        .path("/")
        .build()
}

pub fn create_logout_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(0))
        .path("/")
        .build()
}

pub fn extract_session_from_jar(
    jar: &CookieJar,
    session_store: &SessionStore,
) -> Result<SessionData> {
    let session_cookie = jar
        .get(SESSION_COOKIE_NAME)
        .ok_or_else(|| AppError::Unauthorized("No session cookie found".to_string()))?;

    let session_data = session_store
        .get_session(session_cookie.value())
        .ok_or_else(|| AppError::Unauthorized("Invalid session".to_string()))?;

    Ok(session_data)
}

/// The authenticated caller, loaded once per request. Every handler behind
/// the login wall takes this, so no handler can forget the check.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub user::Model);

/// Rejection that sends anonymous requests to the login form, carrying the
/// originally requested path for the post-login redirect.
pub struct LoginRedirect(pub String);

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&format!("/login?next={}", self.0)).into_response()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = LoginRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let path = parts.uri.path().to_string();
        let jar = CookieJar::from_headers(&parts.headers);

        let session = extract_session_from_jar(&jar, &state.sessions)
            .map_err(|_| LoginRedirect(path.clone()))?;

        let user = state
            .storage
            .find_user(session.user_id)
            .await
            .ok()
            .flatten()
            .ok_or(LoginRedirect(path))?;

        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_roundtrip_and_removal() {
        let store = SessionStore::new();
        let id = store.create_session(7, false);

        let session = store.get_session(&id).unwrap();
        assert_eq!(session.user_id, 7);

        store.remove_session(&id);
        assert!(store.get_session(&id).is_none());
    }

    #[test]
    fn remember_extends_expiry() {
        let store = SessionStore::new();
        let short = store.create_session(1, false);
        let long = store.create_session(1, true);

        let short_exp = store.get_session(&short).unwrap().expires_at;
        let long_exp = store.get_session(&long).unwrap().expires_at;
        assert!(long_exp > short_exp);
    }

    #[test]
    fn cleanup_drops_expired_sessions() {
        let store = SessionStore::new();
        let id = store.create_session(1, false);

        if let Ok(mut sessions) = store.sessions.write() {
            sessions.get_mut(&id).unwrap().expires_at = 0;
        }

        store.cleanup_expired_sessions();
        assert!(store.get_session(&id).is_none());
    }

    #[test]
    fn logout_cookie_expires_immediately() {
        let cookie = create_logout_cookie(false);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(0)));
    }
}
