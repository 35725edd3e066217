use axum::{
    Router, middleware,
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::auth::{self, AppState};
use crate::middleware::require_session;
use crate::{news, pages};

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(news::index))
        .route("/first", get(pages::first))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/logout", get(auth::logout))
        .route("/user/{username}", get(news::user_page));

    // `/profile/add_news` is static, so it wins over `/profile/{username}`.
    let protected_routes = Router::new()
        .route("/profile", get(news::my_profile).post(news::post_to_own_profile))
        .route("/profile/add_news", get(news::add_news_form).post(news::add_news))
        .route("/profile/{username}", get(news::profile).post(news::post_to_profile))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
