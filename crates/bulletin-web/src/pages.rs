use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::AppState;
use crate::session;
use crate::views;

/// GET /first
pub async fn first(State(state): State<AppState>, jar: CookieJar) -> Html<String> {
    let user = session::current_user(&jar, &state.session);
    Html(views::first(user.as_deref()))
}

/// Anything no route matched.
pub async fn not_found(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let user = session::current_user(&jar, &state.session);
    (StatusCode::NOT_FOUND, Html(views::not_found(user.as_deref())))
}
