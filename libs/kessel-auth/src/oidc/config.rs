use std::fmt;
use std::time::Duration;

use kessel_utils::SecretString;
use url::Url;

use super::types::ClientAuthMethod;
use crate::error::TokenError;

/// Configuration for the OIDC client-credentials token source.
///
/// Exactly one of [`token_endpoint`](Self::token_endpoint) or
/// [`issuer_url`](Self::issuer_url) must be set; [`validate`](Self::validate)
/// enforces it. `Debug` redacts the client secret.
#[derive(Clone)]
pub struct OidcClientConfig {
    /// Direct token endpoint URL (mutually exclusive with `issuer_url`).
    pub token_endpoint: Option<Url>,

    /// Issuer URL; the token endpoint is resolved through
    /// `{issuer_url}/.well-known/openid-configuration` on first use.
    pub issuer_url: Option<Url>,

    pub client_id: String,

    pub client_secret: SecretString,

    /// Requested scopes, sent space-separated. Empty sends no `scope`.
    pub scopes: Vec<String>,

    pub auth_method: ClientAuthMethod,

    /// How long before expiry a cached token is replaced (default: 60 s).
    /// Tokens shorter-lived than this are replaced at half their lifetime.
    pub refresh_offset: Duration,

    /// Lifetime assumed when the endpoint omits `expires_in` (default: 5 min).
    pub default_ttl: Duration,

    /// Issue tokens flagged as insecure, allowing them on plaintext channels.
    pub insecure: bool,

    /// Override for the internal HTTP client. When `None`,
    /// [`HttpClientConfig::token_endpoint`](kessel_http::HttpClientConfig::token_endpoint)
    /// is used with the transport mode implied by the configured URL scheme.
    pub http_config: Option<kessel_http::HttpClientConfig>,
}

impl OidcClientConfig {
    /// Validate that the configuration is self-consistent.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::ConfigError`] if the client id or secret is empty,
    /// or if not exactly one of `token_endpoint` and `issuer_url` is set.
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.client_id.trim().is_empty() {
            return Err(TokenError::ConfigError(
                "client_id must not be empty".into(),
            ));
        }
        if self.client_secret.is_empty() {
            return Err(TokenError::ConfigError(
                "client_secret must not be empty".into(),
            ));
        }
        match (&self.token_endpoint, &self.issuer_url) {
            (Some(_), Some(_)) => Err(TokenError::ConfigError(
                "token_endpoint and issuer_url are mutually exclusive".into(),
            )),
            (None, None) => Err(TokenError::ConfigError(
                "one of token_endpoint or issuer_url must be set".into(),
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for OidcClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OidcClientConfig")
            .field("token_endpoint", &self.token_endpoint)
            .field("issuer_url", &self.issuer_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .field("auth_method", &self.auth_method)
            .field("refresh_offset", &self.refresh_offset)
            .field("default_ttl", &self.default_ttl)
            .field("insecure", &self.insecure)
            .field("http_config", &self.http_config)
            .finish()
    }
}

impl Default for OidcClientConfig {
    fn default() -> Self {
        Self {
            token_endpoint: None,
            issuer_url: None,
            client_id: String::new(),
            client_secret: SecretString::default(),
            scopes: Vec::new(),
            auth_method: ClientAuthMethod::default(),
            refresh_offset: Duration::from_secs(60),
            default_ttl: Duration::from_secs(5 * 60),
            insecure: false,
            http_config: None,
        }
    }
}
