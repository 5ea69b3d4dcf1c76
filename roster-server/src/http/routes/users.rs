//! Users page
//!
//! GET /users renders every user with their published posts. Read-only;
//! no query parameters are consumed.

use std::sync::Arc;

use axum::{extract::State, response::Html, routing::get, Router};

use crate::db::load_users_with_published_posts;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::render::render_users_page;

/// GET /users
async fn users_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let users = load_users_with_published_posts(state.store.as_ref()).await?;
    Ok(Html(render_users_page(&users)))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/users", get(users_page))
}
