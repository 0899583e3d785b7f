//! gRPC channel configuration and construction.
//!
//! Channels get:
//! - configurable connect and RPC timeouts
//! - TCP and HTTP/2 keepalive for connection health
//! - either plaintext or rustls TLS with `h2` negotiated through ALPN
//!
//! Certificates are only loaded for TLS channels. A plaintext channel never
//! reads the OS store or a PEM bundle.

use std::time::Duration;

use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use kessel_http::TlsRootConfig;
use tonic::transport::{Channel, Endpoint};

use crate::error::GrpcTransportError;

const TCP_KEEPALIVE: Duration = Duration::from_secs(30);
const HTTP2_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);
const HTTP2_KEEPALIVE_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport security of a gRPC channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrpcSecurity {
    /// Unencrypted HTTP/2 (`h2c`).
    Plaintext,
    /// TLS trusting the given roots.
    Tls(TlsRootConfig),
}

impl Default for GrpcSecurity {
    fn default() -> Self {
        Self::Tls(TlsRootConfig::Native)
    }
}

impl GrpcSecurity {
    #[must_use]
    pub fn is_plaintext(&self) -> bool {
        matches!(self, Self::Plaintext)
    }

    fn default_scheme(&self) -> &'static str {
        match self {
            Self::Plaintext => "http",
            Self::Tls(_) => "https",
        }
    }
}

/// Configuration for a gRPC client channel.
#[derive(Debug, Clone)]
pub struct GrpcClientConfig {
    /// Timeout for establishing a connection.
    pub connect_timeout: Duration,

    /// Deadline applied to every RPC on the channel.
    pub rpc_timeout: Duration,

    pub security: GrpcSecurity,

    /// Name used in tracing spans and events.
    pub service_name: &'static str,
}

impl Default for GrpcClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            rpc_timeout: Duration::from_secs(30),
            security: GrpcSecurity::default(),
            service_name: "grpc_client",
        }
    }
}

impl GrpcClientConfig {
    #[must_use]
    pub fn new(service_name: &'static str) -> Self {
        Self {
            service_name,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_security(mut self, security: GrpcSecurity) -> Self {
        self.security = security;
        self
    }

    /// Use a plaintext channel.
    #[must_use]
    pub fn insecure(self) -> Self {
        self.with_security(GrpcSecurity::Plaintext)
    }
}

/// Add a scheme to a bare `host:port` target.
///
/// Targets that already carry a scheme are returned unchanged. Otherwise
/// `http://` is prepended for plaintext channels and `https://` for TLS.
#[must_use]
pub fn normalize_target(target: &str, security: &GrpcSecurity) -> String {
    let target = target.trim();
    if target.contains("://") {
        target.to_owned()
    } else {
        format!("{}://{target}", security.default_scheme())
    }
}

/// Build a tonic `Endpoint` with timeouts and keepalive settings.
fn build_endpoint(uri: String, cfg: &GrpcClientConfig) -> Result<Endpoint, GrpcTransportError> {
    let endpoint = Endpoint::from_shared(uri.clone())
        .map_err(|e| GrpcTransportError::InvalidTarget {
            target: uri,
            reason: e.to_string(),
        })?
        .connect_timeout(cfg.connect_timeout)
        .timeout(cfg.rpc_timeout)
        .tcp_keepalive(Some(TCP_KEEPALIVE))
        .http2_keep_alive_interval(HTTP2_KEEPALIVE_INTERVAL)
        .keep_alive_timeout(HTTP2_KEEPALIVE_TIMEOUT)
        .keep_alive_while_idle(true);

    Ok(endpoint)
}

/// Normalize the target and build its endpoint.
fn prepare(target: &str, cfg: &GrpcClientConfig) -> Result<(String, Endpoint), GrpcTransportError> {
    if target.trim().is_empty() {
        return Err(GrpcTransportError::InvalidTarget {
            target: target.to_owned(),
            reason: "target is empty".to_owned(),
        });
    }
    let uri = normalize_target(target, &cfg.security);
    let endpoint = build_endpoint(uri.clone(), cfg)?;
    Ok((uri, endpoint))
}

/// TLS connector for HTTP/2 over rustls.
///
/// tonic's own TCP settings do not reach a custom connector, so they are
/// repeated on the inner `HttpConnector`.
fn tls_connector(
    roots: &TlsRootConfig,
    cfg: &GrpcClientConfig,
) -> Result<HttpsConnector<HttpConnector>, GrpcTransportError> {
    let tls = kessel_http::tls::client_config(roots)?;

    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_nodelay(true);
    http.set_keepalive(Some(TCP_KEEPALIVE));
    http.set_connect_timeout(Some(cfg.connect_timeout));

    Ok(hyper_rustls::HttpsConnectorBuilder::new()
        .with_tls_config(tls)
        .https_only()
        .enable_http2()
        .wrap_connector(http))
}

/// Build a channel that connects on first use.
///
/// Fails only on an invalid target or unusable TLS material. Must be called
/// within a Tokio runtime.
///
/// # Errors
///
/// Returns [`GrpcTransportError::InvalidTarget`] or
/// [`GrpcTransportError::Tls`].
pub fn connect_lazy(target: &str, cfg: &GrpcClientConfig) -> Result<Channel, GrpcTransportError> {
    let (uri, endpoint) = prepare(target, cfg)?;

    let channel = match &cfg.security {
        GrpcSecurity::Plaintext => {
            tracing::warn!(
                service = cfg.service_name,
                target = %uri,
                "gRPC channel uses plaintext transport"
            );
            endpoint.connect_lazy()
        }
        GrpcSecurity::Tls(roots) => endpoint.connect_with_connector_lazy(tls_connector(roots, cfg)?),
    };

    tracing::debug!(
        service = cfg.service_name,
        target = %uri,
        plaintext = cfg.security.is_plaintext(),
        "gRPC channel built"
    );
    Ok(channel)
}
