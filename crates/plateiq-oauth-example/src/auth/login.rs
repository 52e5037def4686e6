//! Login and logout endpoints

use axum::extract::State;
use axum::response::IntoResponse;
use axum_extra::extract::SignedCookieJar;

use super::found;
use crate::AppState;
use crate::session;

/// GET /login - Redirect to Plate IQ's authorization page.
///
/// Plate IQ sends the browser back to `/oauth/login` with a code once the user
/// has signed in there.
pub async fn login(State(state): State<AppState>, jar: SignedCookieJar) -> impl IntoResponse {
    let (jar, login_state) = session::issue_state(jar, state.config.secure_cookies());
    let url = state.provider.authorization_url(&login_state);

    tracing::debug!("Redirecting to Plate IQ authorization page");
    (jar, found(&url))
}

/// GET /logout - Clear the session, then log out of Plate IQ as well
pub async fn logout(State(state): State<AppState>, jar: SignedCookieJar) -> impl IntoResponse {
    (session::clear(jar), found(&state.config.logout_url()))
}
