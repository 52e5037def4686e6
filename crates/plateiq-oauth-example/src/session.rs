//! Signed-cookie session state
//!
//! The whole session lives client-side in one cookie, signed with the key
//! derived from `SECRET_KEY`. A cookie that fails verification or decoding is
//! indistinguishable from no cookie at all.

use axum_extra::extract::SignedCookieJar;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};

pub const SESSION_COOKIE_NAME: &str = "session";
pub const STATE_COOKIE_NAME: &str = "oauth_state";

/// The state cookie is only sent back to the callback route
const STATE_COOKIE_PATH: &str = "/oauth";
const STATE_LIFETIME_MINUTES: i64 = 10;
const STATE_BYTES: usize = 32;

/// An authenticated browser session.
///
/// Both fields are always present together; there is no partially logged in
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub access_token: String,
}

impl Session {
    /// Read the session from the request cookies
    pub fn from_jar(jar: &SignedCookieJar) -> Option<Self> {
        let cookie = jar
            .get(SESSION_COOKIE_NAME)
            .filter(|c| !c.value().is_empty())?;
        let decoded = match URL_SAFE_NO_PAD.decode(cookie.value()) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(error = %e, "Discarding undecodable session cookie");
                return None;
            }
        };

        match serde_json::from_slice(&decoded) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::debug!(error = %e, "Discarding malformed session cookie");
                None
            }
        }
    }

    /// Replace whatever session the jar holds with this one
    pub fn store(&self, jar: SignedCookieJar, secure: bool) -> SignedCookieJar {
        // Never fails: two strings always serialize
        let json = serde_json::to_vec(self).unwrap_or_default();
        let cookie = Cookie::build((SESSION_COOKIE_NAME, URL_SAFE_NO_PAD.encode(json)))
            .path("/")
            .http_only(true)
            .secure(secure)
            .same_site(SameSite::Lax)
            .build();

        clear(jar).add(cookie)
    }
}

/// Drop the session cookie.
///
/// Always sends an expired cookie: the jar silently discards cookies that fail
/// verification, so a forged or stale one would otherwise never be removed.
pub fn clear(jar: SignedCookieJar) -> SignedCookieJar {
    jar.add(removal_cookie(SESSION_COOKIE_NAME, "/"))
}

fn removal_cookie(name: &'static str, path: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path(path)
        .max_age(time::Duration::ZERO)
        .expires(time::OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// Issue a fresh login `state` and remember it in a short-lived cookie
pub fn issue_state(jar: SignedCookieJar, secure: bool) -> (SignedCookieJar, String) {
    let state = generate_state();
    let cookie = Cookie::build((STATE_COOKIE_NAME, state.clone()))
        .path(STATE_COOKIE_PATH)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(STATE_LIFETIME_MINUTES))
        .build();

    (jar.add(cookie), state)
}

/// Remove the login `state` cookie, returning the value it held.
///
/// A state is good for one callback only, whatever the outcome.
pub fn take_state(jar: SignedCookieJar) -> (SignedCookieJar, Option<String>) {
    let state = jar
        .get(STATE_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty());
    let jar = jar.add(removal_cookie(STATE_COOKIE_NAME, STATE_COOKIE_PATH));
    (jar, state)
}

/// 32 random bytes, base64url without padding
pub fn generate_state() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; STATE_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Compare a callback `state` with the issued one without leaking timing
pub fn state_matches(expected: &str, received: &str) -> bool {
    use subtle::ConstantTimeEq;
    expected.as_bytes().ct_eq(received.as_bytes()).into()
}
