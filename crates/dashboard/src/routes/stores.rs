//! Seller dashboards for physical and virtual stores.
//!
//! The owner label only opens the door to a kind of store. Each store page
//! additionally checks the store document's `ownerId` against the caller, so
//! an owner never sees another owner's store. System admins see every store.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{OriginalUri, Path, State};
use tracing::instrument;

use bazaar_core::{
    AuthState, Identity, Requirement, Role, StoreId, StoreKind, decide_store_access,
};

use super::views::{StoreView, UserView};
use crate::error::{AppError, Result};
use crate::middleware::{
    AccessRejection, CurrentAuth, PhysicalStoreOwner, Require, VirtualStoreOwner, enforce,
    path_and_query,
};
use crate::state::AppState;

/// Template for the list of the caller's stores.
#[derive(Template, WebTemplate)]
#[template(path = "stores/index.html")]
pub struct StoresIndexTemplate {
    pub user: UserView,
    pub kind: String,
    pub stores: Vec<StoreView>,
}

/// Template for a single store's dashboard.
#[derive(Template, WebTemplate)]
#[template(path = "stores/show.html")]
pub struct StoreShowTemplate {
    pub user: UserView,
    pub store: StoreView,
    /// The caller is an admin looking at someone else's store.
    pub viewing_as_admin: bool,
    pub back_path: &'static str,
}

// =============================================================================
// Handlers
// =============================================================================

/// List the caller's physical stores.
pub async fn physical_index(
    State(state): State<AppState>,
    Require(owner, _): Require<PhysicalStoreOwner>,
) -> Result<StoresIndexTemplate> {
    index(&state, StoreKind::Physical, &owner).await
}

/// List the caller's virtual stores.
pub async fn virtual_index(
    State(state): State<AppState>,
    Require(owner, _): Require<VirtualStoreOwner>,
) -> Result<StoresIndexTemplate> {
    index(&state, StoreKind::Virtual, &owner).await
}

/// Display a physical store's dashboard.
pub async fn physical_show(
    State(state): State<AppState>,
    CurrentAuth(auth): CurrentAuth,
    OriginalUri(uri): OriginalUri,
    Path(store_id): Path<String>,
) -> Result<StoreShowTemplate> {
    show(&state, StoreKind::Physical, &auth, path_and_query(&uri), &store_id).await
}

/// Display a virtual store's dashboard.
pub async fn virtual_show(
    State(state): State<AppState>,
    CurrentAuth(auth): CurrentAuth,
    OriginalUri(uri): OriginalUri,
    Path(store_id): Path<String>,
) -> Result<StoreShowTemplate> {
    show(&state, StoreKind::Virtual, &auth, path_and_query(&uri), &store_id).await
}

// =============================================================================
// Shared logic
// =============================================================================

#[instrument(skip_all, fields(kind = %kind, user_id = %owner.id))]
async fn index(
    state: &AppState,
    kind: StoreKind,
    owner: &Identity,
) -> Result<StoresIndexTemplate> {
    let stores = state.stores().stores_owned_by(kind, &owner.id).await?;
    tracing::debug!(count = stores.len(), "Loaded owned stores");

    Ok(StoresIndexTemplate {
        user: UserView::from(owner),
        kind: kind.to_string(),
        stores: stores.iter().map(StoreView::from).collect(),
    })
}

/// Resolve access to one store.
///
/// Order matters: anonymous callers are sent to sign-in and callers without
/// a fitting role are refused before the store is looked up, so neither can
/// learn which stores exist.
#[instrument(skip_all, fields(kind = %kind, store_id = %raw_id))]
async fn show(
    state: &AppState,
    kind: StoreKind,
    auth: &AuthState,
    path: &str,
    raw_id: &str,
) -> Result<StoreShowTemplate> {
    let Some(identity) = auth.identity() else {
        tracing::info!(path, "Store dashboard requires sign-in");
        return Err(AccessRejection::RedirectToSignIn {
            next: path.to_string(),
        }
        .into());
    };

    let may_own_kind = Requirement::any_role([Role::SystemAdmin, kind.owner_role()]);
    enforce(may_own_kind.decide(Some(identity)), path)?;

    let not_found = || AppError::NotFound(format!("{kind} store {raw_id}"));
    let store_id = StoreId::parse(raw_id).map_err(|_| not_found())?;
    let store = state
        .stores()
        .find_store(kind, &store_id)
        .await?
        .ok_or_else(not_found)?;

    enforce(decide_store_access(Some(identity), &store), path)?;

    let viewing_as_admin = !(identity.has_role(kind.owner_role()) && store.is_owned_by(identity));
    Ok(StoreShowTemplate {
        user: UserView::from(identity),
        store: StoreView::from(&store),
        viewing_as_admin,
        back_path: if viewing_as_admin {
            "/admin"
        } else {
            kind.dashboard_path()
        },
    })
}
