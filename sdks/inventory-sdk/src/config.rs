use std::time::Duration;

use kessel_auth::oidc::{ClientAuthMethod, OidcClientConfig};
use kessel_http::TlsRootConfig;
use kessel_transport_grpc::{GrpcClientConfig, GrpcSecurity};
use kessel_utils::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ClientError;

/// Client configuration shared by every API version and transport.
///
/// Plain serde data: build it in code with the `with_*` methods or load it
/// from YAML and environment variables. Serializing redacts the client
/// secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// gRPC target, `host:port` or a full URL.
    pub url: String,

    /// Base URL of the HTTP gateway. Only the HTTP clients need it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_url: Option<String>,

    /// Plaintext transport. No certificates are loaded.
    pub insecure: bool,

    pub tls: TlsConfig,

    /// Build an OIDC client-credentials token source from [`oidc`](Self::oidc).
    pub enable_oidc_auth: bool,

    pub oidc: OidcSettings,

    #[serde(with = "kessel_utils::humantime_serde")]
    pub connect_timeout: Duration,

    #[serde(with = "kessel_utils::humantime_serde")]
    pub request_timeout: Duration,
}

/// Trust anchors for TLS connections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TlsConfig {
    pub roots: TlsRootConfig,
}

/// OIDC client-credentials settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OidcSettings {
    pub client_id: String,

    pub client_secret: SecretString,

    /// Token endpoint. Mutually exclusive with `issuer_url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_url: Option<Url>,

    /// Issuer whose discovery document names the token endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_url: Option<Url>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,

    pub auth_method: ClientAuthMethod,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: "localhost:9000".to_owned(),
            http_url: None,
            insecure: false,
            tls: TlsConfig::default(),
            enable_oidc_auth: false,
            oidc: OidcSettings::default(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_http_url(mut self, url: impl Into<String>) -> Self {
        self.http_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    #[must_use]
    pub fn with_tls_roots(mut self, roots: TlsRootConfig) -> Self {
        self.tls.roots = roots;
        self
    }

    /// Enable OIDC with a direct token endpoint.
    #[must_use]
    pub fn with_auth(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<SecretString>,
        token_url: Url,
    ) -> Self {
        self.enable_oidc_auth = true;
        self.oidc.client_id = client_id.into();
        self.oidc.client_secret = client_secret.into();
        self.oidc.token_url = Some(token_url);
        self.oidc.issuer_url = None;
        self
    }

    /// Enable OIDC, resolving the token endpoint from the issuer's
    /// discovery document on first use.
    #[must_use]
    pub fn with_oidc_discovery(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<SecretString>,
        issuer_url: Url,
    ) -> Self {
        self.enable_oidc_auth = true;
        self.oidc.client_id = client_id.into();
        self.oidc.client_secret = client_secret.into();
        self.oidc.issuer_url = Some(issuer_url);
        self.oidc.token_url = None;
        self
    }

    #[must_use]
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.oidc.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Check the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] for an empty `url`, a `url` scheme
    /// that contradicts `insecure`, zero timeouts, or incomplete OIDC
    /// settings when OIDC is enabled.
    pub fn validate(&self) -> Result<(), ClientError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ClientError::Config("url must not be empty".into()));
        }
        if let Some((scheme, _)) = url.split_once("://")
            && !scheme.eq_ignore_ascii_case(self.expected_scheme())
        {
            return Err(ClientError::Config(format!(
                "url scheme '{scheme}' does not match insecure={}",
                self.insecure
            )));
        }
        if self.connect_timeout.is_zero() || self.request_timeout.is_zero() {
            return Err(ClientError::Config("timeouts must be non-zero".into()));
        }
        if let Some(oidc) = self.oidc_client_config() {
            oidc.validate()
                .map_err(|e| ClientError::Config(format!("oidc: {e}")))?;
        }
        Ok(())
    }

    /// OIDC token source settings, or `None` when OIDC is disabled.
    ///
    /// Tokens are marked insecure when the transport is plaintext.
    #[must_use]
    pub fn oidc_client_config(&self) -> Option<OidcClientConfig> {
        if !self.enable_oidc_auth {
            return None;
        }
        Some(OidcClientConfig {
            token_endpoint: self.oidc.token_url.clone(),
            issuer_url: self.oidc.issuer_url.clone(),
            client_id: self.oidc.client_id.clone(),
            client_secret: self.oidc.client_secret.clone(),
            scopes: self.oidc.scopes.clone(),
            auth_method: self.oidc.auth_method,
            insecure: self.insecure,
            ..OidcClientConfig::default()
        })
    }

    fn expected_scheme(&self) -> &'static str {
        if self.insecure { "http" } else { "https" }
    }

    #[must_use]
    pub fn grpc_security(&self) -> GrpcSecurity {
        if self.insecure {
            GrpcSecurity::Plaintext
        } else {
            GrpcSecurity::Tls(self.tls.roots.clone())
        }
    }

    /// Channel settings for a client of `service_name`.
    #[must_use]
    pub fn grpc_client_config(&self, service_name: &'static str) -> GrpcClientConfig {
        GrpcClientConfig::new(service_name)
            .with_connect_timeout(self.connect_timeout)
            .with_rpc_timeout(self.request_timeout)
            .with_security(self.grpc_security())
    }

    /// Normalized HTTP base URL without a trailing slash.
    ///
    /// A bare `host:port` gets `http://` when insecure and `https://`
    /// otherwise. An explicit scheme must agree with `insecure`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when `http_url` is missing, does not
    /// parse, or its scheme contradicts `insecure`.
    pub fn http_base_url(&self) -> Result<String, ClientError> {
        let raw = self
            .http_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ClientError::Config("http_url is required for HTTP clients".into()))?;

        let expected = self.expected_scheme();
        let with_scheme = if raw.contains("://") {
            raw.to_owned()
        } else {
            format!("{expected}://{raw}")
        };

        let parsed = Url::parse(&with_scheme)
            .map_err(|e| ClientError::Config(format!("invalid http_url '{raw}': {e}")))?;
        if parsed.host_str().is_none() {
            return Err(ClientError::Config(format!("http_url '{raw}' has no host")));
        }
        if parsed.scheme() != expected {
            return Err(ClientError::Config(format!(
                "http_url scheme '{}' does not match insecure={}",
                parsed.scheme(),
                self.insecure
            )));
        }

        Ok(with_scheme.trim_end_matches('/').to_owned())
    }
}
