//! Client for the Plate IQ authorization server and API
//!
//! Only the three calls the login flow needs: code exchange, current user and
//! extended profile. Every call is plain `reqwest` with no retries; anything
//! but a 200 is reported as [`AppError::Upstream`] carrying the provider's
//! status.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::Config;
use crate::error::AppError;

/// Token endpoint response. Only the access token is used; `token_type`,
/// `expires_in`, `refresh_token` and `scope` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Current user as reported by `GET /auth/user`
#[derive(Debug, Clone, Deserialize)]
pub struct UserIdentity {
    pub email: String,
    /// Link to the extended profile resource
    pub url: String,
}

#[derive(Clone)]
pub struct ProviderClient {
    config: Arc<Config>,
    http: reqwest::Client,
}

impl ProviderClient {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Use a custom HTTP client (timeouts, proxies, connection pool reuse)
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Authorization URL the browser is sent to by `/login`.
    ///
    /// Built by concatenation so a broken `PLATEIQ_AUTH_URL` still yields a
    /// (broken) redirect instead of an error.
    pub fn authorization_url(&self, state: &str) -> String {
        let redirect_uri = self.config.redirect_uri();
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("response_type", "code")
            .append_pair("client_id", self.config.client_id())
            .append_pair("redirect_uri", &redirect_uri)
            .append_pair("state", state)
            .finish();

        format!("{}?{}", self.config.authorize_endpoint(), query)
    }

    /// Exchange an authorization code for an access token
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AppError> {
        let redirect_uri = self.config.redirect_uri();
        let params = [
            ("code", code),
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id()),
            ("client_secret", self.config.client_secret()),
            ("redirect_uri", redirect_uri.as_str()),
        ];

        let response = self
            .http
            .post(self.config.token_endpoint())
            .form(&params)
            .send()
            .await?;

        let response = ensure_ok(response, "token exchange")?;
        Ok(response.json::<TokenResponse>().await?)
    }

    /// Fetch the user the access token belongs to
    pub async fn fetch_user(&self, access_token: &str) -> Result<UserIdentity, AppError> {
        let response = self
            .http
            .get(self.config.user_endpoint())
            .bearer_auth(access_token)
            .send()
            .await?;

        let response = ensure_ok(response, "user lookup")?;
        Ok(response.json::<UserIdentity>().await?)
    }

    /// Fetch the extended profile linked from [`UserIdentity::url`].
    ///
    /// The status is not checked; the body only has to be JSON.
    pub async fn fetch_profile(
        &self,
        user: &UserIdentity,
        access_token: &str,
    ) -> Result<serde_json::Value, AppError> {
        let response = self
            .http
            .get(&user.url)
            .bearer_auth(access_token)
            .send()
            .await?;

        Ok(response.json::<serde_json::Value>().await?)
    }
}

/// Anything other than exactly 200 aborts the login with the provider's status
fn ensure_ok(
    response: reqwest::Response,
    operation: &'static str,
) -> Result<reqwest::Response, AppError> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(response);
    }

    tracing::warn!(operation, status = %status, "Plate IQ request failed");
    Err(AppError::Upstream(status))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(client_id: Option<&str>) -> Arc<Config> {
        Arc::new(Config {
            base_url: "http://localhost:5000".to_string(),
            auth_url: "https://login.example.com".to_string(),
            api_url: "https://api.example.com".to_string(),
            client_id: client_id.map(str::to_string),
            client_secret: Some("shh".to_string()),
            secret_key: "key".to_string(),
        })
    }

    fn query_pairs(url: &str) -> Vec<(String, String)> {
        url::Url::parse(url)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_authorization_url() {
        let client = ProviderClient::new(config(Some("my client")));
        let url = client.authorization_url("xyz");

        assert!(url.starts_with("https://login.example.com/oauth/authorize/?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=my+client"));
        assert_eq!(
            query_pairs(&url),
            vec![
                ("response_type".to_string(), "code".to_string()),
                ("client_id".to_string(), "my client".to_string()),
                (
                    "redirect_uri".to_string(),
                    "http://localhost:5000/oauth/login".to_string()
                ),
                ("state".to_string(), "xyz".to_string()),
            ]
        );
    }

    #[test]
    fn test_authorization_url_without_client_id() {
        let client = ProviderClient::new(config(None));
        let url = client.authorization_url("xyz");
        assert!(url.contains("client_id=&"));
    }

    #[test]
    fn test_user_identity_ignores_extra_fields() {
        let user: UserIdentity = serde_json::from_str(
            r#"{"email":"a@b.c","url":"https://api.example.com/users/1","id":1,"name":"A"}"#,
        )
        .unwrap();
        assert_eq!(user.email, "a@b.c");
        assert_eq!(user.url, "https://api.example.com/users/1");
    }
}
