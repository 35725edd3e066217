use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use tower::ServiceExt;

use bulletin_db::Database;
use bulletin_web::{AppState, AppStateInner, create_router};

fn app() -> (Router, AppState) {
    let state = AppStateInner::new(Database::open_in_memory().unwrap(), "test-secret");
    (create_router(state.clone()), state)
}

async fn send(app: &Router, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn location(resp: &Response) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// `name=value` of the session cookie the response sets, if any.
fn session_cookie(resp: &Response) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("bulletin_session="))
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
}

async fn body_text(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn register(app: &Router, username: &str, password: &str) -> Response {
    let body = format!("username={username}&password={password}&confirm_password={password}");
    send(app, post("/register", &body, None)).await
}

async fn login(app: &Router, username: &str, password: &str) -> Response {
    let body = format!("username={username}&password={password}");
    send(app, post("/login", &body, None)).await
}

async fn logged_in(app: &Router, username: &str) -> String {
    register(app, username, "secret").await;
    session_cookie(&login(app, username, "secret").await).unwrap()
}

#[tokio::test]
async fn example_scenario() {
    let (app, state) = app();

    let resp = register(&app, "alice", "secret").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login");

    let resp = login(&app, "alice", "secret").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile");
    let cookie = session_cookie(&resp).unwrap();

    let resp = send(&app, get("/profile", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/alice");

    let resp = send(&app, post("/profile", "title=Hi&content=World", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/alice");

    let news = state.db.list_news().unwrap();
    assert_eq!(news.len(), 1);
    assert_eq!(news[0].title, "Hi");
    assert_eq!(news[0].content, "World");
    assert_eq!(news[0].author, "alice");

    let html = body_text(send(&app, get("/", None)).await).await;
    assert!(html.contains("<h3>Hi</h3>"));
    assert!(html.contains("World"));

    let resp = send(&app, get("/logout", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert_eq!(session_cookie(&resp).as_deref(), Some("bulletin_session="));

    let resp = send(&app, get("/profile", None)).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login");
}

#[tokio::test]
async fn password_is_not_stored_verbatim() {
    let (app, state) = app();
    register(&app, "alice", "secret").await;

    let user = state.db.get_user_by_username("alice").unwrap().unwrap();
    assert_ne!(user.password, "secret");
    assert!(user.password.starts_with("$argon2"));
}

#[tokio::test]
async fn duplicate_registration_rerenders_form() {
    let (app, state) = app();
    register(&app, "alice", "secret").await;

    let resp = register(&app, "alice", "other").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("already exists"));
    assert_eq!(state.db.count_users().unwrap(), 1);

    // The first password still works.
    let resp = login(&app, "alice", "secret").await;
    assert!(session_cookie(&resp).is_some());
}

#[tokio::test]
async fn registration_validation_errors() {
    let (app, state) = app();

    let resp = send(
        &app,
        post("/register", "username=alice&password=a&confirm_password=b", None),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Must match password."));

    let resp = send(&app, post("/register", "username=&password=&confirm_password=", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Username is required."));

    // Missing fields behave like empty ones.
    let resp = send(&app, post("/register", "", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(state.db.count_users().unwrap(), 0);
}

#[tokio::test]
async fn register_and_login_pages_render() {
    let (app, _) = app();

    let resp = send(&app, get("/register", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("confirm_password"));

    let resp = send(&app, get("/login", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("remember_me"));
}

#[tokio::test]
async fn login_fails_on_any_mismatch() {
    let (app, _) = app();
    register(&app, "alice", "secret").await;

    for (username, password) in [("alice", "Secret"), ("Alice", "secret"), ("bob", "secret")] {
        let resp = login(&app, username, password).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(session_cookie(&resp).is_none());
        assert!(body_text(resp).await.contains("Invalid username or password."));
    }

    let resp = send(&app, post("/login", "username=alice", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session_cookie(&resp).is_none());
    assert!(body_text(resp).await.contains("Password is required."));
}

#[tokio::test]
async fn remember_me_makes_cookie_persistent() {
    let (app, _) = app();
    register(&app, "alice", "secret").await;

    let resp = login(&app, "alice", "secret").await;
    let set_cookie = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(!set_cookie.contains("Max-Age"));
    assert!(set_cookie.contains("HttpOnly"));

    let body = "username=alice&password=secret&remember_me=y";
    let resp = send(&app, post("/login", body, None)).await;
    let set_cookie = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.contains("Max-Age=2592000"));
}

#[tokio::test]
async fn logout_without_session_still_redirects() {
    let (app, _) = app();
    let resp = send(&app, get("/logout", None)).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
}

#[tokio::test]
async fn protected_routes_redirect_to_login() {
    let (app, state) = app();

    for uri in ["/profile", "/profile/add_news", "/profile/alice"] {
        let resp = send(&app, get(uri, None)).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "{uri}");
        assert_eq!(location(&resp), "/login", "{uri}");
    }

    let forged = "bulletin_session=forged.token.value";
    let resp = send(&app, post("/profile/add_news", "title=Hi&content=World", Some(forged))).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login");

    let resp = send(&app, post("/profile", "title=Hi&content=World", None)).await;
    assert_eq!(location(&resp), "/login");

    assert_eq!(state.db.count_news().unwrap(), 0);
}

#[tokio::test]
async fn add_news_page_posts_as_session_user() {
    let (app, state) = app();
    let cookie = logged_in(&app, "alice").await;

    let resp = send(&app, get("/profile/add_news", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = "title=Hello&content=There";
    let resp = send(&app, post("/profile/add_news", body, Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");

    let news = state.db.list_news().unwrap();
    assert_eq!(news.len(), 1);
    assert_eq!(news[0].author, "alice");
}

#[tokio::test]
async fn add_news_requires_title_and_content() {
    let (app, state) = app();
    let cookie = logged_in(&app, "alice").await;

    let resp = send(&app, post("/profile/add_news", "title=&content=x", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Title is required."));

    let resp = send(&app, post("/profile/alice", "title=x", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Content is required."));

    assert_eq!(state.db.count_news().unwrap(), 0);
}

#[tokio::test]
async fn posting_on_another_profile_is_authored_by_session_user() {
    let (app, state) = app();
    register(&app, "bob", "secret").await;
    let cookie = logged_in(&app, "alice").await;

    let resp = send(&app, post("/profile/bob", "title=Hi&content=Bob", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/alice");

    assert!(state.db.list_news_by_author("bob").unwrap().is_empty());
    assert_eq!(state.db.list_news_by_author("alice").unwrap().len(), 1);
}

#[tokio::test]
async fn rejected_post_on_another_profile_shows_form_errors() {
    let (app, state) = app();
    register(&app, "bob", "secret").await;
    let cookie = logged_in(&app, "alice").await;

    let resp = send(&app, post("/profile/bob", "title=&content=x", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Title is required."));
    assert!(html.contains("<form"));

    assert_eq!(state.db.count_news().unwrap(), 0);
}

#[tokio::test]
async fn auth_pages_show_session_nav() {
    let (app, _) = app();
    let cookie = logged_in(&app, "alice").await;

    for uri in ["/login", "/register"] {
        let html = body_text(send(&app, get(uri, Some(&cookie))).await).await;
        assert!(html.contains("Log out"), "{uri}");
    }

    let html = body_text(send(&app, get("/login", None)).await).await;
    assert!(!html.contains("Log out"));
}

#[tokio::test]
async fn profile_of_unknown_user_is_not_found() {
    let (app, state) = app();
    let cookie = logged_in(&app, "alice").await;

    let resp = send(&app, get("/profile/nobody", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&app, post("/profile/nobody", "title=Hi&content=x", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(state.db.count_news().unwrap(), 0);
}

#[tokio::test]
async fn public_user_page() {
    let (app, state) = app();
    register(&app, "bob", "secret").await;
    state.db.insert_news("Bob's news", "text", "bob").unwrap();
    state.db.insert_news("Other", "text", "carol").unwrap();

    let resp = send(&app, get("/user/bob", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Bob&#x27;s news"));
    assert!(!html.contains("Other"));

    let resp = send(&app, get("/user/nobody", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn home_lists_newest_first() {
    let (app, state) = app();
    state.db.insert_news("older", "a", "alice").unwrap();
    state.db.insert_news("newer", "b", "bob").unwrap();

    let html = body_text(send(&app, get("/", None)).await).await;
    let newer = html.find("newer").unwrap();
    let older = html.find("older").unwrap();
    assert!(newer < older);
}

#[tokio::test]
async fn static_and_unknown_pages() {
    let (app, _) = app();

    let resp = send(&app, get("/first", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&app, get("/nowhere", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
