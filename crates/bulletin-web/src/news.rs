use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, info};

use bulletin_db::{Database, NewsRow};
use bulletin_types::forms::NewsForm;
use bulletin_types::models::{NewsItem, Profile};
use bulletin_types::validation::{FormErrors, Validate};

use crate::auth::{AppState, with_db};
use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::session;
use crate::views;

fn news_item(row: NewsRow) -> NewsItem {
    NewsItem {
        id: row.id,
        title: row.title,
        content: row.content,
        author: row.author,
    }
}

fn load_profile(db: &Database, username: &str) -> anyhow::Result<Option<Profile>> {
    let Some(user) = db.get_user_by_username(username)? else {
        return Ok(None);
    };
    let news = db
        .list_news_by_author(&user.username)?
        .into_iter()
        .map(news_item)
        .collect();
    Ok(Some(Profile {
        username: user.username,
        news,
    }))
}

fn not_found(user: Option<&str>) -> Response {
    (StatusCode::NOT_FOUND, Html(views::not_found(user))).into_response()
}

/// GET / — every article, newest first.
pub async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>, AppError> {
    let user = session::current_user(&jar, &state.session);
    debug!("Index requested, session user: {:?}", user);

    let news: Vec<NewsItem> = with_db(&state, |db| db.list_news())
        .await?
        .into_iter()
        .map(news_item)
        .collect();

    Ok(Html(views::index(user.as_deref(), &news)))
}

/// GET /user/{username} — public view of someone's articles.
pub async fn user_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    let viewer = session::current_user(&jar, &state.session);
    let profile = with_db(&state, move |db| load_profile(db, &username)).await?;

    Ok(match profile {
        Some(profile) => Html(views::user_page(viewer.as_deref(), &profile)).into_response(),
        None => not_found(viewer.as_deref()),
    })
}

// -- Profile (login required) --

/// GET /profile
pub async fn my_profile(Extension(CurrentUser(me)): Extension<CurrentUser>) -> Response {
    views::redirect(&views::profile_url(&me))
}

/// POST /profile
pub async fn post_to_own_profile(
    State(state): State<AppState>,
    Extension(CurrentUser(me)): Extension<CurrentUser>,
    Form(form): Form<NewsForm>,
) -> Result<Response, AppError> {
    post_from_profile(state, me.clone(), me, form).await
}

/// GET /profile/{username}
pub async fn profile(
    State(state): State<AppState>,
    Extension(CurrentUser(me)): Extension<CurrentUser>,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    let profile = with_db(&state, move |db| load_profile(db, &username)).await?;

    Ok(match profile {
        Some(profile) => Html(views::profile(
            &me,
            &profile,
            &NewsForm::default(),
            &FormErrors::new(),
        ))
        .into_response(),
        None => not_found(Some(&me)),
    })
}

/// POST /profile/{username}
pub async fn post_to_profile(
    State(state): State<AppState>,
    Extension(CurrentUser(me)): Extension<CurrentUser>,
    Path(username): Path<String>,
    Form(form): Form<NewsForm>,
) -> Result<Response, AppError> {
    post_from_profile(state, me, username, form).await
}

/// The article is always authored by the session user, whichever profile
/// page the form was submitted from.
async fn post_from_profile(
    state: AppState,
    me: String,
    username: String,
    form: NewsForm,
) -> Result<Response, AppError> {
    let Some(profile) = with_db(&state, move |db| load_profile(db, &username)).await? else {
        return Ok(not_found(Some(&me)));
    };

    if let Err(errors) = form.validate() {
        return Ok(Html(views::profile(&me, &profile, &form, &errors)).into_response());
    }

    create_news(&state, &me, form).await?;
    Ok(views::redirect(&views::profile_url(&me)))
}

/// GET /profile/add_news
pub async fn add_news_form(Extension(CurrentUser(me)): Extension<CurrentUser>) -> Html<String> {
    Html(views::add_news(&me, &NewsForm::default(), &FormErrors::new()))
}

/// POST /profile/add_news
pub async fn add_news(
    State(state): State<AppState>,
    Extension(CurrentUser(me)): Extension<CurrentUser>,
    Form(form): Form<NewsForm>,
) -> Result<Response, AppError> {
    if let Err(errors) = form.validate() {
        return Ok(Html(views::add_news(&me, &form, &errors)).into_response());
    }

    create_news(&state, &me, form).await?;
    Ok(views::redirect("/"))
}

async fn create_news(state: &AppState, author: &str, form: NewsForm) -> Result<i64, AppError> {
    let owner = author.to_string();
    let id = with_db(state, move |db| db.insert_news(&form.title, &form.content, &owner)).await?;
    info!("User '{}' posted news {}", author, id);
    Ok(id)
}
