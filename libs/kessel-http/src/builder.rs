use std::time::Duration;

use bytes::Bytes;
use http::HeaderValue;
use http_body_util::Full;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};

use crate::client::HttpClient;
use crate::config::{HttpClientConfig, TransportSecurity};
use crate::error::HttpError;
use crate::tls::{self, TlsRootConfig};

/// Builder for [`HttpClient`].
#[derive(Debug, Clone, Default)]
pub struct HttpClientBuilder {
    config: HttpClientConfig,
}

impl HttpClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: HttpClientConfig) -> Self {
        Self { config }
    }

    /// Set the per-request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    #[must_use]
    pub fn transport(mut self, transport: TransportSecurity) -> Self {
        self.config.transport = transport;
        self
    }

    #[must_use]
    pub fn tls_roots(mut self, roots: TlsRootConfig) -> Self {
        self.config.tls_roots = roots;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Tls` if trust anchors cannot be loaded and
    /// `HttpError::InvalidHeaderValue` if the user agent is not a valid header.
    pub fn build(self) -> Result<HttpClient, HttpError> {
        match self.config.transport {
            TransportSecurity::AllowInsecureHttp => tracing::warn!(
                "insecure HTTP enabled (TransportSecurity::AllowInsecureHttp); \
                 use only for testing with mock servers"
            ),
            TransportSecurity::Plaintext => {
                tracing::debug!("plaintext HTTP client, TLS disabled");
            }
            TransportSecurity::TlsOnly => {}
        }

        let user_agent = HeaderValue::from_str(&self.config.user_agent)?;
        let https = build_https_connector(&self.config.tls_roots, self.config.transport)?;

        // pool_timer is required for pool_idle_timeout to take effect
        let mut client_builder = Client::builder(TokioExecutor::new());
        client_builder
            .pool_timer(TokioTimer::new())
            .pool_max_idle_per_host(self.config.pool_max_idle_per_host);
        if let Some(idle_timeout) = self.config.pool_idle_timeout {
            client_builder.pool_idle_timeout(idle_timeout);
        }
        let inner = client_builder.build::<_, Full<Bytes>>(https);

        Ok(HttpClient::from_parts(
            inner,
            self.config.request_timeout,
            self.config.max_body_size,
            self.config.transport,
            user_agent,
        ))
    }
}

/// Build the HTTPS connector for the requested transport mode.
///
/// Plaintext mode still goes through `HttpsConnector` (so the client type is
/// the same in all modes) but with an empty trust store; URL validation keeps
/// `https://` requests from ever reaching it.
fn build_https_connector(
    tls_roots: &TlsRootConfig,
    transport: TransportSecurity,
) -> Result<HttpsConnector<HttpConnector>, HttpError> {
    let client_config = match transport {
        TransportSecurity::Plaintext => tls::plaintext_client_config()?,
        TransportSecurity::TlsOnly | TransportSecurity::AllowInsecureHttp => {
            tls::client_config(tls_roots)?
        }
    };

    let builder = hyper_rustls::HttpsConnectorBuilder::new().with_tls_config(client_config);
    let connector = match transport {
        TransportSecurity::TlsOnly => builder.https_only().enable_all_versions().build(),
        TransportSecurity::AllowInsecureHttp | TransportSecurity::Plaintext => {
            builder.https_or_http().enable_all_versions().build()
        }
    };
    Ok(connector)
}
