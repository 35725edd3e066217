//! Server-rendered pages. Every value that came from a user goes through
//! [`escape`] before it is written into markup.

use std::fmt::Write;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use bulletin_types::forms::{LoginForm, NewsForm, RegisterForm};
use bulletin_types::models::{NewsItem, Profile};
use bulletin_types::validation::FormErrors;

/// `302 Found` to `location`.
pub fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

pub fn profile_url(username: &str) -> String {
    format!("/profile/{}", encode_segment(username))
}

pub fn user_url(username: &str) -> String {
    format!("/user/{}", encode_segment(username))
}

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a single path segment (RFC 3986 unreserved set passes through).
pub fn encode_segment(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                let _ = write!(out, "%{:02X}", byte);
            }
        }
    }
    out
}

fn layout(title: &str, user: Option<&str>, body: &str) -> String {
    let nav = match user {
        Some(name) => format!(
            concat!(
                r#"<a href="/">News</a> <a href="/profile">{}</a> "#,
                r#"<a href="/profile/add_news">Add news</a> <a href="/logout">Log out</a>"#,
            ),
            escape(name)
        ),
        None => concat!(
            r#"<a href="/">News</a> <a href="/login">Log in</a> "#,
            r#"<a href="/register">Register</a>"#,
        )
        .to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<nav>{nav}</nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn field_errors(errors: &FormErrors, field: &str) -> String {
    errors
        .for_field(field)
        .map(|msg| format!(r#"<p class="field-error">{}</p>"#, escape(msg)))
        .collect()
}

fn banner(error: Option<&str>) -> String {
    error
        .map(|msg| format!(r#"<p class="error">{}</p>"#, escape(msg)))
        .unwrap_or_default()
}

fn news_list(news: &[NewsItem], show_author: bool) -> String {
    if news.is_empty() {
        return "<p>No news yet.</p>".to_string();
    }

    let mut out = String::from("<ul class=\"news\">\n");
    for item in news {
        let author = if show_author {
            format!(
                r#"<p class="author">by <a href="{}">{}</a></p>"#,
                user_url(&item.author),
                escape(&item.author)
            )
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            r#"<li id="news-{}"><h3>{}</h3>{}<p>{}</p></li>"#,
            item.id,
            escape(&item.title),
            author,
            escape(&item.content)
        );
    }
    out.push_str("</ul>");
    out
}

fn news_form(action: &str, form: &NewsForm, errors: &FormErrors) -> String {
    format!(
        r#"<form method="post" action="{action}">
<label>Title <input name="title" value="{title}"></label>
{title_errors}
<label>Content <textarea name="content">{content}</textarea></label>
{content_errors}
<button type="submit">Add</button>
</form>"#,
        title = escape(&form.title),
        content = escape(&form.content),
        title_errors = field_errors(errors, "title"),
        content_errors = field_errors(errors, "content"),
    )
}

// -- Pages --

pub fn index(user: Option<&str>, news: &[NewsItem]) -> String {
    let body = format!("<h1>News</h1>\n{}", news_list(news, true));
    layout("News", user, &body)
}

pub fn first(user: Option<&str>) -> String {
    layout("First", user, "<h1>First page</h1>\n<p>Nothing to see here yet.</p>")
}

pub fn login(
    user: Option<&str>,
    form: &LoginForm,
    errors: &FormErrors,
    error: Option<&str>,
) -> String {
    let checked = if form.remember() { " checked" } else { "" };
    let body = format!(
        r#"<h1>Log in</h1>
{banner}
<form method="post" action="/login">
<label>Username <input name="username" value="{username}"></label>
{username_errors}
<label>Password <input type="password" name="password"></label>
{password_errors}
<label><input type="checkbox" name="remember_me"{checked}> Remember me</label>
<button type="submit">Log in</button>
</form>"#,
        banner = banner(error),
        username = escape(&form.username),
        username_errors = field_errors(errors, "username"),
        password_errors = field_errors(errors, "password"),
    );
    layout("Log in", user, &body)
}

pub fn register(
    user: Option<&str>,
    form: &RegisterForm,
    errors: &FormErrors,
    error: Option<&str>,
) -> String {
    let body = format!(
        r#"<h1>Register</h1>
{banner}
<form method="post" action="/register">
<label>Username <input name="username" value="{username}"></label>
{username_errors}
<label>Password <input type="password" name="password"></label>
{password_errors}
<label>Repeat password <input type="password" name="confirm_password"></label>
{confirm_errors}
<button type="submit">Register</button>
</form>"#,
        banner = banner(error),
        username = escape(&form.username),
        username_errors = field_errors(errors, "username"),
        password_errors = field_errors(errors, "password"),
        confirm_errors = field_errors(errors, "confirm_password"),
    );
    layout("Register", user, &body)
}

/// Profile page for a logged-in viewer. The post form appears on the viewer's
/// own profile, and on any profile when a rejected submission is being shown.
pub fn profile(viewer: &str, profile: &Profile, form: &NewsForm, errors: &FormErrors) -> String {
    let compose = if viewer == profile.username || !errors.is_empty() {
        news_form(&profile_url(viewer), form, errors)
    } else {
        String::new()
    };
    let body = format!(
        "<h1>{}</h1>\n{}\n<h2>News</h2>\n{}",
        escape(&profile.username),
        compose,
        news_list(&profile.news, false)
    );
    layout("Profile", Some(viewer), &body)
}

pub fn add_news(user: &str, form: &NewsForm, errors: &FormErrors) -> String {
    let body = format!(
        "<h1>Add news</h1>\n{}",
        news_form("/profile/add_news", form, errors)
    );
    layout("Add news", Some(user), &body)
}

pub fn user_page(viewer: Option<&str>, profile: &Profile) -> String {
    let body = format!(
        "<h1>{}</h1>\n<h2>News</h2>\n{}",
        escape(&profile.username),
        news_list(&profile.news, false)
    );
    layout(&profile.username, viewer, &body)
}

pub fn not_found(user: Option<&str>) -> String {
    layout(
        "Not found",
        user,
        "<h1>Not found</h1>\n<p>The page you asked for does not exist.</p>",
    )
}

pub fn server_error() -> String {
    layout(
        "Server error",
        None,
        "<h1>Something went wrong</h1>\n<p>Please try again later.</p>",
    )
}
