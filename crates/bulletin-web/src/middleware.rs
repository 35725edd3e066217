use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::auth::AppState;
use crate::session;
use crate::views;

/// Username of the logged-in user, set by [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

/// Gate for pages that need a login. Without a valid session the browser is
/// sent to the login page; there is no 401.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match session::current_user(&jar, &state.session) {
        Some(username) => {
            req.extensions_mut().insert(CurrentUser(username));
            next.run(req).await
        }
        None => {
            debug!("No session for {}, redirecting to login", req.uri().path());
            views::redirect("/login")
        }
    }
}
