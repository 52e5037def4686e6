//! OAuth callback: code exchange and session setup

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;

use super::found;
use crate::AppState;
use crate::error::AppError;
use crate::session::{self, Session};

#[derive(Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// GET /oauth/login - Plate IQ redirects here after the user signs in.
///
/// The session is dropped before anything is fetched, so a failure at any step
/// leaves the browser logged out rather than holding a stale session.
pub async fn handler(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let (jar, expected_state) = session::take_state(jar);
    let jar = session::clear(jar);

    match complete_login(&state, expected_state, query).await {
        Ok(new_session) => {
            let jar = new_session.store(jar, state.config.secure_cookies());
            (jar, found("/")).into_response()
        }
        Err(e) => (jar, e).into_response(),
    }
}

async fn complete_login(
    state: &AppState,
    expected_state: Option<String>,
    query: CallbackQuery,
) -> Result<Session, AppError> {
    match (expected_state, query.state) {
        (Some(expected), Some(received)) if session::state_matches(&expected, &received) => {}
        (expected, received) => {
            tracing::warn!(
                has_cookie = expected.is_some(),
                has_param = received.is_some(),
                "OAuth state mismatch"
            );
            return Err(AppError::StateMismatch);
        }
    }

    let code = query.code.unwrap_or_default();
    let token = state.provider.exchange_code(&code).await?;
    let user = state.provider.fetch_user(&token.access_token).await?;

    // Only logged, the session never holds profile data
    let profile = state
        .provider
        .fetch_profile(&user, &token.access_token)
        .await?;
    tracing::debug!(email = %user.email, %profile, "Fetched extended profile");

    tracing::info!(email = %user.email, "User logged in");

    Ok(Session {
        email: user.email,
        access_token: token.access_token,
    })
}
