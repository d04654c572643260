//! Access-control extractors.
//!
//! Every protected page goes through the same three-way branch:
//!
//! | Decision          | HTML request              | `/api/` request  |
//! |-------------------|---------------------------|------------------|
//! | `Unauthenticated` | redirect to `/sign-in`    | 401 Unauthorized |
//! | `Forbidden`       | 403 access-denied page    | 403 Forbidden    |
//! | `Allowed`         | handler runs              | handler runs     |
//!
//! Label-gated handlers take a [`Require<G>`] argument; handlers that need
//! data before deciding (store pages) call [`enforce`] themselves.

use std::convert::Infallible;
use std::marker::PhantomData;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, Uri, request::Parts},
    response::{IntoResponse, Redirect, Response},
};

use thiserror::Error;

use bazaar_core::{AccessDecision, AuthState, Identity, Requirement, Role};

/// Access-denied page.
#[derive(Template, WebTemplate)]
#[template(path = "access_denied.html")]
pub struct AccessDeniedTemplate {
    pub path: String,
}

/// Why a request was turned away.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessRejection {
    /// Redirect to the sign-in page (for HTML requests).
    #[error("Sign-in required for {next}")]
    RedirectToSignIn {
        /// Path to return to after signing in.
        next: String,
    },
    /// Unauthorized response (for API requests).
    #[error("Unauthorized")]
    Unauthorized,
    /// Access-denied page (for HTML requests).
    #[error("Access denied to {path}")]
    Denied {
        /// Path that was refused.
        path: String,
    },
    /// Forbidden response (for API requests).
    #[error("Forbidden")]
    Forbidden,
}

impl IntoResponse for AccessRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToSignIn { next } => Redirect::to(&sign_in_path(&next)).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Denied { path } => {
                (StatusCode::FORBIDDEN, AccessDeniedTemplate { path }).into_response()
            }
            Self::Forbidden => (StatusCode::FORBIDDEN, "Insufficient permissions").into_response(),
        }
    }
}

/// Turn an access decision for `path` into a rejection, if any.
///
/// # Errors
///
/// Returns the rejection matching the decision and the kind of request.
pub fn enforce(decision: AccessDecision, path: &str) -> Result<(), AccessRejection> {
    let is_api = is_api_path(path);

    match decision {
        AccessDecision::Allowed => {
            tracing::debug!(path, "Access allowed");
            Ok(())
        }
        AccessDecision::Unauthenticated => {
            tracing::info!(path, "Access requires sign-in");
            if is_api {
                Err(AccessRejection::Unauthorized)
            } else {
                Err(AccessRejection::RedirectToSignIn {
                    next: path.to_string(),
                })
            }
        }
        AccessDecision::Forbidden => {
            tracing::info!(path, "Access denied");
            if is_api {
                Err(AccessRejection::Forbidden)
            } else {
                Err(AccessRejection::Denied {
                    path: path.to_string(),
                })
            }
        }
    }
}

/// Sign-in page URL that returns the caller to `next` afterwards.
#[must_use]
pub fn sign_in_path(next: &str) -> String {
    format!("/sign-in?next={}", urlencoding::encode(next))
}

fn is_api_path(path: &str) -> bool {
    let path = path.split_once('?').map_or(path, |(path, _)| path);
    path == "/api" || path.starts_with("/api/")
}

/// Path and query string of `uri`, the form `next` carries.
#[must_use]
pub fn path_and_query(uri: &Uri) -> &str {
    uri.path_and_query()
        .map_or_else(|| uri.path(), |pq| pq.as_str())
}

/// Path and query of the request as the client sent it.
fn request_path(parts: &Parts) -> String {
    parts
        .extensions
        .get::<OriginalUri>()
        .map_or_else(|| path_and_query(&parts.uri), |original| path_and_query(&original.0))
        .to_string()
}

/// Auth state placed in the request by the identity middleware.
///
/// Missing state (middleware not installed) reads as anonymous.
fn auth_state(parts: &Parts) -> AuthState {
    parts
        .extensions
        .get::<AuthState>()
        .cloned()
        .unwrap_or_default()
}

/// Extractor for the caller's auth state. Never rejects.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentAuth(auth): CurrentAuth) -> impl IntoResponse {
///     if auth.flags().is_system_admin() { "admin" } else { "not admin" }
/// }
/// ```
pub struct CurrentAuth(pub AuthState);

impl<S> FromRequestParts<S> for CurrentAuth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(auth_state(parts)))
    }
}

/// A named label requirement usable with [`Require`].
pub trait Gate: Send + Sync + 'static {
    /// The labels the caller must satisfy.
    fn requirement() -> Requirement;
}

/// Marketplace administrators.
pub struct SystemAdmin;

impl Gate for SystemAdmin {
    fn requirement() -> Requirement {
        Requirement::role(Role::SystemAdmin)
    }
}

/// Physical store owners.
pub struct PhysicalStoreOwner;

impl Gate for PhysicalStoreOwner {
    fn requirement() -> Requirement {
        Requirement::role(Role::PhysicalStoreOwner)
    }
}

/// Virtual store owners.
pub struct VirtualStoreOwner;

impl Gate for VirtualStoreOwner {
    fn requirement() -> Requirement {
        Requirement::role(Role::VirtualStoreOwner)
    }
}

/// Owners of either kind of store.
pub struct AnyStoreOwner;

impl Gate for AnyStoreOwner {
    fn requirement() -> Requirement {
        Requirement::any_role([Role::PhysicalStoreOwner, Role::VirtualStoreOwner])
    }
}

/// Extractor that requires the caller to pass gate `G`.
///
/// # Example
///
/// ```rust,ignore
/// async fn admin_handler(Require(admin, _): Require<SystemAdmin>) -> impl IntoResponse {
///     format!("Hello, {}!", admin.display_name())
/// }
/// ```
pub struct Require<G: Gate>(pub Identity, pub PhantomData<G>);

impl<S, G> FromRequestParts<S> for Require<G>
where
    S: Send + Sync,
    G: Gate,
{
    type Rejection = AccessRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = auth_state(parts);
        let decision = G::requirement().decide(auth.identity());
        enforce(decision, &request_path(parts))?;

        auth.into_identity()
            .map(|identity| Self(identity, PhantomData))
            .ok_or(AccessRejection::Unauthorized)
    }
}
