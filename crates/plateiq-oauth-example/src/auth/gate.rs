//! Session guard for protected pages

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::SignedCookieJar;

use super::{LOGIN_PATH, found};
use crate::session::{self, Session};

/// Middleware that only lets requests with a session through.
///
/// The session is handed to the wrapped handler as a request extension.
/// Anyone else has their session cookie dropped and is sent to `/login`.
pub async fn require_login(jar: SignedCookieJar, mut request: Request, next: Next) -> Response {
    match Session::from_jar(&jar) {
        Some(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        None => {
            tracing::debug!(path = %request.uri().path(), "No session, redirecting to login");
            (session::clear(jar), found(LOGIN_PATH)).into_response()
        }
    }
}
