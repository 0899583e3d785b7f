use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use http::header::AUTHORIZATION;
use kessel_http::{HttpClient, HttpClientBuilder, HttpClientConfig, TransportSecurity};
use kessel_utils::SecretString;
use tokio::sync::OnceCell;
use url::Url;
use zeroize::Zeroizing;

use super::config::OidcClientConfig;
use super::discovery::discover_token_endpoint;
use super::types::{ClientAuthMethod, TokenResponse};
use crate::error::TokenError;
use crate::http_error::format_http_error;
use crate::token::{AccessToken, AccessTokenSource};

/// Upper bound on how long a fetched token is trusted, whatever
/// `expires_in` the identity provider reports.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

enum Endpoint {
    Direct(Url),
    Discovered { issuer: Url, resolved: OnceCell<Url> },
}

struct CachedToken {
    value: SecretString,
    refresh_at: Instant,
}

/// `OAuth2` client-credentials token source.
///
/// Tokens are cached in memory and reused until they turn stale, then the
/// next caller fetches a replacement. There is no background refresh, and
/// concurrent callers that find a stale token may each fetch one. When
/// configured with an issuer, the token endpoint is discovered on the first
/// fetch and remembered.
pub struct OidcTokenSource {
    client: HttpClient,
    endpoint: Endpoint,
    client_id: String,
    client_secret: SecretString,
    /// Space-joined scopes, `None` when no scope is requested.
    scopes: Option<String>,
    auth_method: ClientAuthMethod,
    default_ttl: Duration,
    refresh_offset: Duration,
    insecure: bool,
    cached: ArcSwapOption<CachedToken>,
}

impl std::fmt::Debug for OidcTokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcTokenSource")
            .field("client_id", &self.client_id)
            .field("insecure", &self.insecure)
            .finish_non_exhaustive()
    }
}

impl OidcTokenSource {
    /// Build a token source. No network traffic happens here.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::ConfigError`] if the configuration is invalid
    /// and [`TokenError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &OidcClientConfig) -> Result<Self, TokenError> {
        config.validate()?;

        let endpoint = match (&config.token_endpoint, &config.issuer_url) {
            (Some(url), _) => Endpoint::Direct(url.clone()),
            (None, Some(issuer)) => Endpoint::Discovered {
                issuer: issuer.clone(),
                resolved: OnceCell::new(),
            },
            (None, None) => {
                return Err(TokenError::ConfigError(
                    "one of token_endpoint or issuer_url must be set".into(),
                ));
            }
        };

        let http_config = config.http_config.clone().unwrap_or_else(|| {
            let target = match &endpoint {
                Endpoint::Direct(url) | Endpoint::Discovered { issuer: url, .. } => url.as_str(),
            };
            HttpClientConfig {
                transport: TransportSecurity::for_url(target),
                ..HttpClientConfig::token_endpoint()
            }
        });
        let client = HttpClientBuilder::with_config(http_config)
            .build()
            .map_err(|e| TokenError::Http(format_http_error(&e, "OIDC token")))?;

        let scopes = if config.scopes.is_empty() {
            None
        } else {
            Some(config.scopes.join(" "))
        };

        Ok(Self {
            client,
            endpoint,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scopes,
            auth_method: config.auth_method,
            default_ttl: config.default_ttl,
            refresh_offset: config.refresh_offset,
            insecure: config.insecure,
            cached: ArcSwapOption::empty(),
        })
    }

    /// Drop the cached token so the next call fetches a fresh one.
    ///
    /// Use after a downstream 401 to discard a possibly revoked token.
    pub fn invalidate(&self) {
        self.cached.store(None);
        tracing::debug!(client_id = %self.client_id, "OIDC token cache invalidated");
    }

    async fn token_endpoint(&self) -> Result<&Url, TokenError> {
        match &self.endpoint {
            Endpoint::Direct(url) => Ok(url),
            Endpoint::Discovered { issuer, resolved } => {
                resolved
                    .get_or_try_init(|| discover_token_endpoint(&self.client, issuer))
                    .await
            }
        }
    }

    fn present(&self, value: SecretString) -> AccessToken {
        if self.insecure {
            AccessToken::insecure_bearer(value)
        } else {
            AccessToken::bearer(value)
        }
    }

    async fn fetch(&self) -> Result<CachedToken, TokenError> {
        let token_endpoint = self.token_endpoint().await?;

        let mut fields: Vec<(&str, &str)> = vec![("grant_type", "client_credentials")];
        if let Some(ref scope) = self.scopes {
            fields.push(("scope", scope));
        }

        // Temporary plaintext copies are scrubbed on drop
        let secret_copy;
        if self.auth_method == ClientAuthMethod::Form {
            secret_copy = Zeroizing::new(self.client_secret.expose().to_owned());
            fields.push(("client_id", &self.client_id));
            fields.push(("client_secret", &secret_copy));
        }

        let mut builder = self.client.post(token_endpoint.as_str());
        if self.auth_method == ClientAuthMethod::Basic {
            let credentials = Zeroizing::new(format!(
                "{}:{}",
                self.client_id,
                self.client_secret.expose()
            ));
            let encoded = Zeroizing::new(general_purpose::STANDARD.encode(credentials.as_bytes()));
            let header_value = Zeroizing::new(format!("Basic {}", &*encoded));
            builder = builder.header(AUTHORIZATION.as_str(), &header_value);
        }

        let response: TokenResponse = builder
            .form(fields.as_slice())
            .map_err(|e| TokenError::Http(format_http_error(&e, "OIDC token")))?
            .send()
            .await
            .map_err(|e| TokenError::Http(format_http_error(&e, "OIDC token")))?
            .error_for_status()
            .map_err(|e| TokenError::Http(format_http_error(&e, "OIDC token")))?
            .json()
            .await
            .map_err(|e| TokenError::InvalidResponse(format_http_error(&e, "OIDC token")))?;

        if let Some(ref tt) = response.token_type
            && !tt.eq_ignore_ascii_case("bearer")
        {
            return Err(TokenError::UnsupportedTokenType(tt.clone()));
        }
        if response.access_token.is_empty() {
            return Err(TokenError::InvalidResponse("empty access_token".into()));
        }

        let lifetime = response
            .expires_in
            .map_or(self.default_ttl, Duration::from_secs)
            .min(MAX_TOKEN_LIFETIME);
        let now = Instant::now();
        let refresh_at = now
            .checked_add(refresh_delay(lifetime, self.refresh_offset))
            .unwrap_or(now);
        tracing::info!(
            client_id = %self.client_id,
            expires_in_secs = lifetime.as_secs(),
            "OIDC token acquired"
        );

        Ok(CachedToken {
            value: SecretString::new(response.access_token),
            refresh_at,
        })
    }
}

#[async_trait]
impl AccessTokenSource for OidcTokenSource {
    async fn access_token(&self) -> Result<AccessToken, TokenError> {
        if let Some(cached) = self.cached.load_full()
            && Instant::now() < cached.refresh_at
        {
            return Ok(self.present(cached.value.clone()));
        }

        let fresh = Arc::new(self.fetch().await?);
        let token = self.present(fresh.value.clone());
        self.cached.store(Some(fresh));
        Ok(token)
    }
}

/// Time until a token of the given lifetime should be replaced.
///
/// - `offset < lifetime`: `offset` before expiry
/// - otherwise: at half the lifetime
/// - zero lifetime: immediately
fn refresh_delay(lifetime: Duration, refresh_offset: Duration) -> Duration {
    if lifetime > refresh_offset {
        lifetime - refresh_offset
    } else {
        lifetime / 2
    }
}
