//! Identity middleware.
//!
//! Resolves the caller once per request and stores the resulting
//! [`AuthState`] in the request extensions, where the extractors in
//! [`super::auth`] read it. Requests without a session cookie are anonymous
//! and cost no Appwrite call.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use cookie::Cookie;
use tracing::Span;

use bazaar_core::AuthState;

use crate::error::{AppError, set_sentry_user};
use crate::services::SessionToken;
use crate::state::AppState;

/// Middleware that looks up the caller's identity.
///
/// # Errors
///
/// Returns `AppError::Appwrite` (502) if the lookup fails or the account
/// payload is malformed. A rejected session is not an error: the request
/// continues as anonymous.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth = match session_token(request.headers(), state.session_cookie()) {
        Some(token) => {
            let identity = state.identities().current_identity(&token).await?;
            AuthState::new(identity)
        }
        None => AuthState::anonymous(),
    };

    if let Some(identity) = auth.identity() {
        Span::current().record("user_id", identity.id.as_str());
        set_sentry_user(identity);
    }

    request.extensions_mut().insert(auth);
    Ok(next.run(request).await)
}

/// Find the session cookie named `cookie_name` among the request cookies.
#[must_use]
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<SessionToken> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| Cookie::split_parse(raw))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == cookie_name && !cookie.value().is_empty())
        .map(|cookie| SessionToken::new(cookie.value()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for cookie in cookies {
            headers.append(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        headers
    }

    #[test]
    fn test_no_cookie_header() {
        assert!(session_token(&HeaderMap::new(), "a_session_bazaar").is_none());
    }

    #[test]
    fn test_finds_session_among_other_cookies() {
        let headers = headers(&["theme=dark; a_session_bazaar=abc123; lang=en"]);
        let token = session_token(&headers, "a_session_bazaar").unwrap();
        assert_eq!(token.expose(), "abc123");
    }

    #[test]
    fn test_searches_every_cookie_header() {
        let headers = headers(&["theme=dark", "a_session_bazaar=xyz"]);
        let token = session_token(&headers, "a_session_bazaar").unwrap();
        assert_eq!(token.expose(), "xyz");
    }

    #[test]
    fn test_ignores_other_projects_and_empty_values() {
        let headers = headers(&["a_session_other=abc; a_session_bazaar="]);
        assert!(session_token(&headers, "a_session_bazaar").is_none());
    }
}
