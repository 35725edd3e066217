use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};

use bulletin_db::{Database, NewUser};
use bulletin_types::forms::{LoginForm, RegisterForm};
use bulletin_types::validation::{FormErrors, Validate};

use crate::error::AppError;
use crate::session::{self, SessionKeys};
use crate::views;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub session: SessionKeys,
}

impl AppStateInner {
    pub fn new(db: Database, secret_key: &str) -> AppState {
        Arc::new(Self {
            db,
            session: SessionKeys::new(secret_key.as_bytes()),
        })
    }
}

/// Run blocking store work off the async runtime.
pub async fn with_db<F, T>(state: &AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    Ok(tokio::task::spawn_blocking(move || f(&state.db)).await??)
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
        .is_ok()
}

// -- Registration --

pub async fn register_form(State(state): State<AppState>, jar: CookieJar) -> Html<String> {
    let user = session::current_user(&jar, &state.session);
    Html(views::register(
        user.as_deref(),
        &RegisterForm::default(),
        &FormErrors::new(),
        None,
    ))
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let user = session::current_user(&jar, &state.session);
    if let Err(errors) = form.validate() {
        return Ok(Html(views::register(user.as_deref(), &form, &errors, None)).into_response());
    }

    let password = form.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    let username = form.username.clone();
    let outcome = with_db(&state, move |db| db.create_user(&username, &password_hash)).await?;

    match outcome {
        NewUser::Created(id) => {
            info!("Registered user '{}' (id {})", form.username, id);
            Ok(views::redirect("/login"))
        }
        NewUser::UsernameTaken => {
            warn!("Registration rejected, '{}' already exists", form.username);
            Ok(Html(views::register(
                user.as_deref(),
                &form,
                &FormErrors::new(),
                Some("A user with that name already exists."),
            ))
            .into_response())
        }
    }
}

// -- Login / logout --

pub async fn login_form(State(state): State<AppState>, jar: CookieJar) -> Html<String> {
    let user = session::current_user(&jar, &state.session);
    Html(views::login(
        user.as_deref(),
        &LoginForm::default(),
        &FormErrors::new(),
        None,
    ))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let current = session::current_user(&jar, &state.session);
    if let Err(errors) = form.validate() {
        return Ok(Html(views::login(current.as_deref(), &form, &errors, None)).into_response());
    }

    let username = form.username.clone();
    let password = form.password.clone();
    let user = with_db(&state, move |db| {
        let user = db.get_user_by_username(&username)?;
        Ok(user.filter(|u| verify_password(&password, &u.password)))
    })
    .await?;

    let Some(user) = user else {
        warn!("Failed login for '{}'", form.username);
        return Ok(Html(views::login(
            current.as_deref(),
            &form,
            &FormErrors::new(),
            Some("Invalid username or password."),
        ))
        .into_response());
    };

    let jar = session::start(jar, &state.session, &user.username, form.remember())?;
    info!("User '{}' logged in", user.username);
    Ok((jar, views::redirect("/profile")).into_response())
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (session::end(jar), views::redirect("/"))
}
