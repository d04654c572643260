//! Storefront home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use bazaar_core::{Landing, landing_for};

use super::views::UserView;
use crate::middleware::CurrentAuth;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: Option<UserView>,
    /// Dashboard link for privileged callers.
    pub dashboard_path: Option<&'static str>,
}

/// Display the home page.
///
/// Open to everyone; privileged callers get a link to their dashboard.
pub async fn home(CurrentAuth(auth): CurrentAuth) -> impl IntoResponse {
    let dashboard_path = match landing_for(&auth) {
        Landing::SignIn | Landing::Storefront => None,
        landing => Some(landing.path()),
    };

    HomeTemplate {
        user: auth.identity().map(UserView::from),
        dashboard_path,
    }
}
