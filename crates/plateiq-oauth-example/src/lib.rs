//! Example web app that signs users in with Plate IQ's OAuth2 authorization
//! code flow
//!
//! Provides:
//! - `/login` redirect to the Plate IQ authorization page
//! - `/oauth/login` callback exchanging the code for an access token
//! - `/logout` clearing the session and the Plate IQ login
//! - `/` greeting page behind a signed-cookie session

pub mod auth;
pub mod config;
pub mod error;
pub mod home;
pub mod provider;
pub mod session;

use std::sync::Arc;

use axum::{Router, extract::FromRef, middleware, routing::get};
use cookie::Key;
use tower_http::trace::TraceLayer;

pub use crate::config::Config;
use crate::config::CALLBACK_PATH;
use crate::provider::ProviderClient;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub provider: ProviderClient,
    key: Key,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let key = config.cookie_key();
        let config = Arc::new(config);
        Self {
            provider: ProviderClient::new(config.clone()),
            config,
            key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/", get(home::index))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::gate::require_login,
        ));

    Router::new()
        .route(auth::LOGIN_PATH, get(auth::login::login))
        .route(auth::LOGOUT_PATH, get(auth::login::logout))
        .route(CALLBACK_PATH, get(auth::callback::handler))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
