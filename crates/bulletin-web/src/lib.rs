pub mod auth;
pub mod error;
pub mod middleware;
pub mod news;
pub mod pages;
pub mod routes;
pub mod session;
pub mod views;

pub use auth::{AppState, AppStateInner};
pub use routes::create_router;
