//! Sign-in and post-sign-in routing.
//!
//! Sign-in itself happens against Appwrite; this service only reads the
//! session cookie it leaves behind. `/auth/landing` is where the sign-in flow
//! returns to, and sends each caller to the dashboard their labels grant.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use bazaar_core::{Landing, landing_for};

use crate::middleware::{CurrentAuth, sign_in_path};

/// Sign-in page template.
#[derive(Template, WebTemplate)]
#[template(path = "sign_in.html")]
pub struct SignInTemplate {
    /// Where the caller goes once signed in.
    pub continue_url: String,
}

/// Query parameters carrying a return path.
#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

impl NextQuery {
    /// The return path, if it is safe to redirect to.
    #[must_use]
    pub fn safe_next(&self) -> Option<&str> {
        self.next.as_deref().filter(|next| is_local_path(next))
    }
}

/// Whether `path` stays on this site.
///
/// Rejects absolute URLs, protocol-relative `//host` paths and the `/\host`
/// form some browsers treat the same way.
#[must_use]
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\")
}

/// `/auth/landing`, carrying `next` along when present.
fn landing_url(next: Option<&str>) -> String {
    next.map_or_else(
        || "/auth/landing".to_string(),
        |next| format!("/auth/landing?next={}", urlencoding::encode(next)),
    )
}

/// Display the sign-in page.
///
/// Signed-in callers skip straight to `/auth/landing`.
#[instrument(skip_all)]
pub async fn sign_in_page(
    CurrentAuth(auth): CurrentAuth,
    Query(query): Query<NextQuery>,
) -> Response {
    let continue_url = landing_url(query.safe_next());

    if auth.is_authenticated() {
        return Redirect::to(&continue_url).into_response();
    }

    SignInTemplate { continue_url }.into_response()
}

/// Redirect the caller to where they belong.
///
/// Anonymous callers go back to sign-in. Signed-in callers go to `next` if it
/// is a local path, otherwise to the most privileged dashboard they hold.
#[instrument(skip_all, fields(landing))]
pub async fn landing(CurrentAuth(auth): CurrentAuth, Query(query): Query<NextQuery>) -> Redirect {
    let target = landing_for(&auth);
    tracing::Span::current().record("landing", target.path());

    if target == Landing::SignIn {
        return Redirect::to(
            &query
                .safe_next()
                .map_or_else(|| Landing::SignIn.path().to_string(), sign_in_path),
        );
    }

    Redirect::to(query.safe_next().unwrap_or_else(|| target.path()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_local_path() {
        assert!(is_local_path("/admin"));
        assert!(is_local_path("/dashboard/virtual-stores/s1?tab=orders"));
        assert!(!is_local_path("//evil.example.com"));
        assert!(!is_local_path("/\\evil.example.com"));
        assert!(!is_local_path("https://evil.example.com"));
        assert!(!is_local_path(""));
    }

    #[test]
    fn test_safe_next_filters_unsafe_values() {
        let query = NextQuery {
            next: Some("https://evil.example.com".to_string()),
        };
        assert_eq!(query.safe_next(), None);

        let query = NextQuery {
            next: Some("/admin".to_string()),
        };
        assert_eq!(query.safe_next(), Some("/admin"));
    }

    #[test]
    fn test_landing_url() {
        assert_eq!(landing_url(None), "/auth/landing");
        assert_eq!(
            landing_url(Some("/admin")),
            "/auth/landing?next=%2Fadmin"
        );
    }
}
