use serde::{Deserialize, Serialize};

/// A posted article as shown on listing pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Username of the poster, copied at write time. Not a foreign key.
    pub author: String,
}

/// A user's page: who they are and what they posted, newest first.
#[derive(Debug, Clone)]
pub struct Profile {
    pub username: String,
    pub news: Vec<NewsItem>,
}

// -- Session --

/// Claims signed into the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Logged-in username.
    pub sub: String,
    pub exp: usize,
}
