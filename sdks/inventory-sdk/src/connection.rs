//! Transport construction and per-call credentials shared by every API
//! version.

use std::sync::Arc;

use kessel_auth::oidc::OidcTokenSource;
use kessel_auth::{
    AccessTokenSource, CallAuthenticator, ChannelSecurity, GrpcCallOptions, HttpCallOptions,
    TokenError,
};
use tonic::transport::Channel;

use crate::config::Config;
use crate::error::ClientError;
use crate::http_transport::HttpTransport;

/// Pick the token source for a client: an explicit one wins, otherwise an
/// OIDC source when enabled, otherwise none.
fn token_source(
    config: &Config,
    explicit: Option<Arc<dyn AccessTokenSource>>,
) -> Result<Option<Arc<dyn AccessTokenSource>>, ClientError> {
    if explicit.is_some() {
        return Ok(explicit);
    }
    match config.oidc_client_config() {
        Some(oidc) => {
            let source = OidcTokenSource::new(&oidc)?;
            Ok(Some(Arc::new(source)))
        }
        None => Ok(None),
    }
}

/// A lazily connected gRPC channel plus the credentials for its calls.
#[derive(Debug, Clone)]
pub struct GrpcConnection {
    channel: Channel,
    security: ChannelSecurity,
    auth: CallAuthenticator,
}

impl GrpcConnection {
    /// Validate `config` and build the channel. No network traffic happens
    /// here; the channel dials on first use.
    ///
    /// Must be called within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] for invalid settings,
    /// [`ClientError::Tls`] when TLS roots cannot be loaded and
    /// [`ClientError::Transport`] for an unusable target.
    pub fn open(
        config: &Config,
        service_name: &'static str,
        source: Option<Arc<dyn AccessTokenSource>>,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        let grpc = config.grpc_client_config(service_name);
        let security = if grpc.security.is_plaintext() {
            ChannelSecurity::Plaintext
        } else {
            ChannelSecurity::Tls
        };

        let channel = kessel_transport_grpc::connect_lazy(&config.url, &grpc)?;
        let auth = CallAuthenticator::new(token_source(config, source)?);

        tracing::debug!(
            service = service_name,
            target = %config.url,
            insecure = config.insecure,
            authenticated = auth.has_source(),
            "inventory gRPC client created"
        );

        Ok(Self {
            channel,
            security,
            auth,
        })
    }

    #[must_use]
    pub fn channel(&self) -> Channel {
        self.channel.clone()
    }

    #[must_use]
    pub fn security(&self) -> ChannelSecurity {
        self.security
    }

    #[must_use]
    pub fn has_token_source(&self) -> bool {
        self.auth.has_source()
    }

    /// Fetch a token and wrap it as gRPC call credentials.
    ///
    /// # Errors
    ///
    /// Returns the token source's error unchanged.
    pub async fn token_call_options(&self) -> Result<GrpcCallOptions, TokenError> {
        self.auth.grpc_call_options(self.security).await
    }
}

/// An HTTP transport plus the credentials for its calls.
#[derive(Debug, Clone)]
pub struct HttpConnection {
    transport: HttpTransport,
    auth: CallAuthenticator,
}

impl HttpConnection {
    /// Validate `config` and build the HTTP client for `config.http_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] for invalid settings and
    /// [`ClientError::Tls`] when TLS roots cannot be loaded.
    pub fn open(
        config: &Config,
        source: Option<Arc<dyn AccessTokenSource>>,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        let transport = HttpTransport::from_config(config)?;
        let auth = CallAuthenticator::new(token_source(config, source)?);

        tracing::debug!(
            base_url = transport.base_url(),
            insecure = config.insecure,
            authenticated = auth.has_source(),
            "inventory HTTP client created"
        );

        Ok(Self { transport, auth })
    }

    #[must_use]
    pub fn transport(&self) -> HttpTransport {
        self.transport.clone()
    }

    #[must_use]
    pub fn has_token_source(&self) -> bool {
        self.auth.has_source()
    }

    /// Fetch a token and wrap it as an `Authorization` header.
    ///
    /// # Errors
    ///
    /// Returns the token source's error unchanged.
    pub async fn token_http_options(&self) -> Result<HttpCallOptions, TokenError> {
        self.auth.http_call_options().await
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn explicit_source_wins_over_oidc() {
        let config = Config::default().with_auth(
            "svc",
            "s3cr3t",
            Url::parse("https://sso.example.com/token").unwrap(),
        );
        let explicit: Arc<dyn AccessTokenSource> = Arc::new(kessel_auth::StaticTokenSource::new(
            kessel_auth::AccessToken::bearer("abc"),
        ));
        assert!(token_source(&config, Some(explicit)).unwrap().is_some());
    }

    #[test]
    fn no_source_without_oidc() {
        assert!(token_source(&Config::default(), None).unwrap().is_none());
    }

    #[tokio::test]
    async fn oidc_source_is_built_without_network() {
        let config = Config::default().with_insecure(true).with_auth(
            "svc",
            "s3cr3t",
            Url::parse("http://127.0.0.1:1/token").unwrap(),
        );
        let conn = GrpcConnection::open(&config, "test", None).unwrap();
        assert!(conn.has_token_source());
        assert_eq!(conn.security(), ChannelSecurity::Plaintext);
    }
}
