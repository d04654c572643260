//! Auth state and access checks for client-side code.

use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use bazaar_core::{LabelSet, MatchMode, RoleFlags, resolve};

use crate::error::{AppError, Result};
use crate::middleware::CurrentAuth;

/// Response body for `GET /api/auth/state`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStateResponse {
    pub authenticated: bool,
    pub user_id: Option<String>,
    pub labels: Vec<String>,
    #[serde(flatten)]
    pub flags: RoleFlags,
}

/// Request body for `POST /api/access/check`.
#[derive(Debug, Deserialize)]
pub struct AccessCheckRequest {
    pub labels: Vec<String>,
    #[serde(default)]
    pub mode: MatchMode,
}

/// Response body for `POST /api/access/check`.
#[derive(Debug, Serialize)]
pub struct AccessCheckResponse {
    pub allowed: bool,
}

/// Return the caller's identity summary and role flags.
///
/// Anonymous callers get `authenticated: false` and every flag unset.
pub async fn auth_state(CurrentAuth(auth): CurrentAuth) -> Json<AuthStateResponse> {
    let identity = auth.identity();

    Json(AuthStateResponse {
        authenticated: auth.is_authenticated(),
        user_id: identity.map(|i| i.id.to_string()),
        labels: identity
            .map(|i| i.labels.iter().map(ToString::to_string).collect())
            .unwrap_or_default(),
        flags: auth.flags(),
    })
}

/// Evaluate a label requirement against the caller.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if any label is not a valid label.
#[instrument(skip_all, fields(mode = %request.mode))]
pub async fn check_access(
    CurrentAuth(auth): CurrentAuth,
    Json(request): Json<AccessCheckRequest>,
) -> Result<Json<AccessCheckResponse>> {
    let required = LabelSet::parse_many(&request.labels)
        .map_err(|e| AppError::BadRequest(format!("invalid label: {e}")))?;

    let allowed = resolve(auth.identity(), &required, request.mode);
    tracing::debug!(required = %required, allowed, "Access check");

    Ok(Json(AccessCheckResponse { allowed }))
}
