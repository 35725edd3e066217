//! Cookie-backed sessions. The cookie holds a signed token naming the
//! logged-in user; nothing is kept server side.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use bulletin_types::models::SessionClaims;

pub const SESSION_COOKIE: &str = "bulletin_session";

/// Token lifetime, and cookie lifetime when "remember me" is ticked.
const SESSION_DAYS: i64 = 30;

#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn issue(&self, username: &str) -> jsonwebtoken::errors::Result<String> {
        let claims = SessionClaims {
            sub: username.to_string(),
            exp: (chrono::Utc::now() + chrono::Duration::days(SESSION_DAYS)).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Username carried by `token`, if the signature and expiry check out.
    pub fn verify(&self, token: &str) -> Option<String> {
        match decode::<SessionClaims>(token, &self.decoding, &Validation::default()) {
            Ok(data) => Some(data.claims.sub),
            Err(e) => {
                debug!("Rejected session token: {}", e);
                None
            }
        }
    }
}

/// Put `username` into the session. Without `remember` the cookie dies with
/// the browser session.
pub fn start(
    jar: CookieJar,
    keys: &SessionKeys,
    username: &str,
    remember: bool,
) -> jsonwebtoken::errors::Result<CookieJar> {
    let token = keys.issue(username)?;

    let mut cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    if remember {
        cookie = cookie.max_age(time::Duration::days(SESSION_DAYS));
    }

    Ok(jar.add(cookie))
}

/// Drop the session cookie. Safe to call with no session.
pub fn end(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

pub fn current_user(jar: &CookieJar, keys: &SessionKeys) -> Option<String> {
    let cookie = jar.get(SESSION_COOKIE)?;
    keys.verify(cookie.value())
}
