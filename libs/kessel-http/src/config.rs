use std::time::Duration;

use crate::tls::TlsRootConfig;

/// Default User-Agent string for HTTP requests
pub const DEFAULT_USER_AGENT: &str = concat!("kessel-http/", env!("CARGO_PKG_VERSION"));

/// Maximum number of body bytes kept in `HttpError::HttpStatus` previews.
pub const ERROR_BODY_PREVIEW_LIMIT: usize = 8 * 1024;

/// Transport security configuration
///
/// Controls which URL schemes the client accepts and whether TLS material is
/// loaded at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportSecurity {
    /// Require TLS for all connections (HTTPS only)
    #[default]
    TlsOnly,
    /// Accept both `https://` and `http://` URLs. Trust anchors are still loaded.
    AllowInsecureHttp,
    /// Plain `http://` only. No certificates are loaded and `https://` URLs are
    /// rejected.
    Plaintext,
}

impl TransportSecurity {
    /// Pick the transport mode implied by a URL scheme: `http` maps to
    /// [`Plaintext`](Self::Plaintext), anything else to
    /// [`TlsOnly`](Self::TlsOnly).
    #[must_use]
    pub fn for_url(url: &str) -> Self {
        if url.get(..7).is_some_and(|s| s.eq_ignore_ascii_case("http://")) {
            Self::Plaintext
        } else {
            Self::TlsOnly
        }
    }
}

/// Overall HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Per-request timeout covering connect, request and response headers
    /// (default: 30 seconds)
    pub request_timeout: Duration,

    /// Maximum response body size in bytes (default: 10 MB)
    pub max_body_size: usize,

    /// User-Agent header value
    pub user_agent: String,

    /// Transport security mode (default: `TlsOnly`)
    pub transport: TransportSecurity,

    /// Trust anchors used when TLS is enabled (default: OS native store)
    pub tls_roots: TlsRootConfig,

    /// Idle timeout for pooled connections; `None` keeps them forever
    pub pool_idle_timeout: Option<Duration>,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_body_size: 10 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            transport: TransportSecurity::TlsOnly,
            tls_roots: TlsRootConfig::default(),
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: 32,
        }
    }
}

impl HttpClientConfig {
    /// Configuration for `OAuth2` token and OIDC discovery endpoints.
    #[must_use]
    pub fn token_endpoint() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_body_size: 1024 * 1024, // 1 MB
            pool_idle_timeout: Some(Duration::from_secs(60)),
            pool_max_idle_per_host: 4,
            ..Self::default()
        }
    }

    /// Configuration for testing with local mock servers (plain HTTP only).
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            max_body_size: 1024 * 1024, // 1 MB
            transport: TransportSecurity::Plaintext,
            pool_idle_timeout: Some(Duration::from_secs(10)),
            pool_max_idle_per_host: 4,
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn defaults_require_tls() {
        let cfg = HttpClientConfig::default();
        assert_eq!(cfg.transport, TransportSecurity::TlsOnly);
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
        assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
        assert!(DEFAULT_USER_AGENT.starts_with("kessel-http/"));
    }

    #[test]
    fn testing_preset_is_plaintext() {
        let cfg = HttpClientConfig::for_testing();
        assert_eq!(cfg.transport, TransportSecurity::Plaintext);
        assert_eq!(cfg.max_body_size, 1024 * 1024);
    }

    #[test]
    fn transport_for_url_follows_scheme() {
        assert_eq!(
            TransportSecurity::for_url("http://localhost:8080/token"),
            TransportSecurity::Plaintext
        );
        assert_eq!(
            TransportSecurity::for_url("HTTP://localhost:8080"),
            TransportSecurity::Plaintext
        );
        assert_eq!(
            TransportSecurity::for_url("https://sso.example.com/token"),
            TransportSecurity::TlsOnly
        );
        assert_eq!(TransportSecurity::for_url("sso"), TransportSecurity::TlsOnly);
    }
}
