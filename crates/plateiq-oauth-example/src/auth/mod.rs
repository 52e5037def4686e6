//! Plate IQ sign-in flow
//!
//! - `GET /login` sends the browser to Plate IQ's authorization page
//! - `GET /oauth/login` receives the code and establishes the session
//! - `GET /logout` drops the session and signs out of Plate IQ too
//! - [`gate::require_login`] guards pages that need a session

pub mod callback;
pub mod gate;
pub mod login;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

pub const LOGIN_PATH: &str = "/login";
pub const LOGOUT_PATH: &str = "/logout";

/// `302 Found` to `location`
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
