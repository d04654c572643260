//! Marketplace administration.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use super::views::UserView;
use crate::middleware::{Require, SystemAdmin};

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub user: UserView,
}

/// Display the admin dashboard.
#[instrument(skip_all)]
pub async fn dashboard(Require(admin, _): Require<SystemAdmin>) -> impl IntoResponse {
    AdminDashboardTemplate {
        user: UserView::from(&admin),
    }
}
