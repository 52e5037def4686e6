//! Configuration loading and management

use clap::Args;
use cookie::Key;
use sha2::{Digest, Sha512};

/// Path of the OAuth callback route on this service
pub const CALLBACK_PATH: &str = "/oauth/login";

/// Main configuration for the example app
///
/// Every option can be passed as a flag or through its environment variable.
/// Parsed once at startup and shared through [`crate::AppState`].
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Public URL of this service (the OAuth redirect URI is built from it)
    #[arg(long, default_value = "http://localhost:5000", env = "BASE_URL")]
    pub base_url: String,

    /// Plate IQ authorization server
    #[arg(long, default_value = "https://login.plateiq.com", env = "PLATEIQ_AUTH_URL")]
    pub auth_url: String,

    /// Plate IQ API server
    #[arg(long, default_value = "https://api.qubiqle.com", env = "PLATEIQ_API_URL")]
    pub api_url: String,

    /// OAuth client identifier issued by Plate IQ
    #[arg(long, env = "PLATEIQ_AUTH_CLIENT_ID")]
    pub client_id: Option<String>,

    /// OAuth client secret issued by Plate IQ
    #[arg(long, env = "PLATEIQ_AUTH_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Secret used to sign session cookies
    #[arg(
        long,
        default_value = "Notverysecretwhenlocal",
        env = "SECRET_KEY",
        hide_env_values = true
    )]
    pub secret_key: String,
}

impl Config {
    /// Strip trailing slashes from the URL options so endpoints can be joined by
    /// plain concatenation.
    pub fn normalized(mut self) -> Self {
        for url in [&mut self.base_url, &mut self.auth_url, &mut self.api_url] {
            let trimmed = url.trim_end_matches('/').len();
            url.truncate(trimmed);
        }
        self
    }

    pub fn client_id(&self) -> &str {
        self.client_id.as_deref().unwrap_or_default()
    }

    pub fn client_secret(&self) -> &str {
        self.client_secret.as_deref().unwrap_or_default()
    }

    /// Redirect URI registered with Plate IQ for this service
    pub fn redirect_uri(&self) -> String {
        format!("{}{}", self.base_url, CALLBACK_PATH)
    }

    pub fn authorize_endpoint(&self) -> String {
        format!("{}/oauth/authorize/", self.auth_url)
    }

    pub fn token_endpoint(&self) -> String {
        format!("{}/oauth/token/", self.auth_url)
    }

    pub fn user_endpoint(&self) -> String {
        format!("{}/auth/user", self.api_url)
    }

    /// Provider logout page. Without it the user is silently signed back in.
    pub fn logout_url(&self) -> String {
        format!("{}/logout", self.auth_url)
    }

    /// Cookies get the `Secure` attribute when we are served over TLS
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Cookie signing key derived from `secret_key`.
    ///
    /// `Key` needs 64 bytes of material, SHA-512 gives exactly that for a secret
    /// of any length.
    pub fn cookie_key(&self) -> Key {
        let digest = Sha512::digest(self.secret_key.as_bytes());
        Key::from(digest.as_slice())
    }
}
