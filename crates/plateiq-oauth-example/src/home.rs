//! The protected landing page

use axum::Extension;

use crate::session::Session;

/// GET / - Greet the signed-in user
pub async fn index(Extension(session): Extension<Session>) -> String {
    format!("Hello, {}!", session.email)
}
