use serde::Deserialize;

use crate::validation::{FormErrors, Validate, equal_to, max_length, required};

pub const USERNAME_MAX: usize = 64;
pub const PASSWORD_MAX: usize = 128;
pub const TITLE_MAX: usize = 255;

// -- Auth --

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl Validate for RegisterForm {
    fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();

        if required(&mut errors, "username", "Username", &self.username) {
            max_length(&mut errors, "username", "Username", &self.username, USERNAME_MAX);
        }
        if required(&mut errors, "password", "Password", &self.password) {
            max_length(&mut errors, "password", "Password", &self.password, PASSWORD_MAX);
        }
        if required(
            &mut errors,
            "confirm_password",
            "Repeat password",
            &self.confirm_password,
        ) {
            equal_to(
                &mut errors,
                "confirm_password",
                "password",
                &self.confirm_password,
                &self.password,
            );
        }

        errors.into_result()
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Checkbox: browsers only send it when ticked.
    #[serde(default)]
    pub remember_me: Option<String>,
}

impl LoginForm {
    pub fn remember(&self) -> bool {
        self.remember_me.is_some()
    }
}

impl Validate for LoginForm {
    fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        required(&mut errors, "username", "Username", &self.username);
        required(&mut errors, "password", "Password", &self.password);
        errors.into_result()
    }
}

// -- News --

#[derive(Debug, Default, Clone, Deserialize)]
pub struct NewsForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl Validate for NewsForm {
    fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        if required(&mut errors, "title", "Title", &self.title) {
            max_length(&mut errors, "title", "Title", &self.title, TITLE_MAX);
        }
        required(&mut errors, "content", "Content", &self.content);
        errors.into_result()
    }
}
