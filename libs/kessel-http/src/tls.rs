//! TLS utilities shared by the HTTP client and the gRPC transport.
//!
//! Native root certificates are loaded once per process and cached, since OS
//! certificate store lookups can be slow on some platforms. PEM bundles are
//! read on every call so that rotated files are picked up by new clients.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use rustls::{ClientConfig, RootCertStore};
use rustls_pki_types::CertificateDer;
use rustls_pki_types::pem::{self, PemObject};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Source of trust anchors for TLS connections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum TlsRootConfig {
    /// Use the OS native root certificate store
    #[default]
    Native,
    /// Read CA certificates from a PEM bundle on disk
    PemFile { path: PathBuf },
    /// Use CA certificates from an inline PEM string
    Pem { pem: String },
}

/// Errors raised while assembling a rustls client configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TlsError {
    #[error("failed to read CA certificates from '{}': {source}", path.display())]
    ReadPem {
        path: PathBuf,
        #[source]
        source: pem::Error,
    },

    #[error("invalid PEM certificate data: {0}")]
    InvalidPem(#[source] pem::Error),

    #[error("no usable root CA certificates: {0}")]
    NoRoots(String),

    #[error("TLS configuration failed: {0}")]
    Rustls(#[from] rustls::Error),
}

/// Cached native root certificates; empty means none were found.
static NATIVE_ROOTS_CACHE: OnceLock<Vec<CertificateDer<'static>>> = OnceLock::new();

#[cfg(test)]
static LOAD_COUNT: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

fn load_native_certs_inner() -> Vec<CertificateDer<'static>> {
    #[cfg(test)]
    LOAD_COUNT.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

    let result = rustls_native_certs::load_native_certs();
    for err in &result.errors {
        tracing::warn!(error = %err, "error loading native root certificate");
    }

    if result.certs.is_empty() {
        tracing::warn!("no native root CA certificates found");
    } else {
        tracing::debug!(count = result.certs.len(), "loaded native root certificates");
    }

    result.certs
}

/// Native root certificates, loaded lazily on first call and cached.
pub fn native_root_certs() -> &'static [CertificateDer<'static>] {
    NATIVE_ROOTS_CACHE
        .get_or_init(load_native_certs_inner)
        .as_slice()
}

/// Crypto provider for TLS connections.
///
/// Uses the process-wide default when one is installed, otherwise an
/// aws-lc-rs provider that is not installed globally.
#[must_use]
pub fn get_crypto_provider() -> Arc<rustls::crypto::CryptoProvider> {
    rustls::crypto::CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
}

fn load_roots(roots: &TlsRootConfig) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    match roots {
        TlsRootConfig::Native => Ok(native_root_certs().to_vec()),
        TlsRootConfig::PemFile { path } => CertificateDer::pem_file_iter(path)
            .and_then(|certs| certs.collect::<Result<Vec<_>, _>>())
            .map_err(|source| TlsError::ReadPem {
                path: path.clone(),
                source,
            }),
        TlsRootConfig::Pem { pem } => CertificateDer::pem_slice_iter(pem.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .map_err(TlsError::InvalidPem),
    }
}

fn with_roots(root_store: RootCertStore) -> Result<ClientConfig, TlsError> {
    let config = ClientConfig::builder_with_provider(get_crypto_provider())
        .with_safe_default_protocol_versions()?
        .with_root_certificates(root_store)
        .with_no_client_auth();
    Ok(config)
}

/// Build a rustls `ClientConfig` trusting the configured roots.
///
/// ALPN protocols are left empty; the hyper-rustls connector sets them.
///
/// # Errors
///
/// Returns an error when the PEM source cannot be read or parsed, or when no
/// valid root certificate remains. Failing here surfaces TLS setup problems
/// at client construction rather than at the first handshake.
pub fn client_config(roots: &TlsRootConfig) -> Result<ClientConfig, TlsError> {
    let certs = load_roots(roots)?;
    if certs.is_empty() {
        return Err(TlsError::NoRoots(match roots {
            TlsRootConfig::Native => "OS certificate store is empty".to_owned(),
            TlsRootConfig::PemFile { path } => format!("'{}' holds no certificates", path.display()),
            TlsRootConfig::Pem { .. } => "inline PEM holds no certificates".to_owned(),
        }));
    }

    let found = certs.len();
    let mut root_store = RootCertStore::empty();
    let (added, ignored) = root_store.add_parsable_certificates(certs);
    if ignored > 0 {
        tracing::warn!(added, ignored, "some root certificates could not be parsed");
    }
    if added == 0 {
        return Err(TlsError::NoRoots(format!(
            "found {found} certificates, none could be parsed"
        )));
    }

    with_roots(root_store)
}

/// Client config with an empty trust store, for connectors that only ever
/// speak plain HTTP. Nothing is read from disk or the OS.
pub(crate) fn plaintext_client_config() -> Result<ClientConfig, TlsError> {
    with_roots(RootCertStore::empty())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    const TEST_CA: &str = include_str!("../tests/fixtures/test-ca.pem");

    #[test]
    fn native_roots_cached() {
        let initial_count = LOAD_COUNT.load(Ordering::SeqCst);

        let first = native_root_certs();
        let second = native_root_certs();

        let final_count = LOAD_COUNT.load(Ordering::SeqCst);
        assert!(final_count <= initial_count + 1, "loader should run at most once");
        assert!(std::ptr::eq(first, second), "should return same slice");
    }

    #[test]
    fn inline_pem_builds_config() {
        let roots = TlsRootConfig::Pem {
            pem: TEST_CA.to_owned(),
        };
        assert!(client_config(&roots).is_ok());
    }

    #[test]
    fn pem_file_builds_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ca.pem");
        std::fs::write(&path, TEST_CA).unwrap();

        let cfg = client_config(&TlsRootConfig::PemFile { path }).unwrap();
        assert!(cfg.alpn_protocols.is_empty());
    }

    #[test]
    fn missing_pem_file_is_read_error() {
        let roots = TlsRootConfig::PemFile {
            path: PathBuf::from("/definitely/not/here/ca.pem"),
        };
        let err = client_config(&roots).unwrap_err();
        assert!(matches!(err, TlsError::ReadPem { .. }), "got {err:?}");
        assert!(err.to_string().contains("/definitely/not/here/ca.pem"));
    }

    #[test]
    fn pem_without_certificates_is_rejected() {
        let roots = TlsRootConfig::Pem {
            pem: "not a certificate".to_owned(),
        };
        let err = client_config(&roots).unwrap_err();
        assert!(matches!(err, TlsError::NoRoots(_)), "got {err:?}");
    }

    #[test]
    fn plaintext_config_needs_no_roots() {
        assert!(plaintext_client_config().is_ok());
    }

    #[test]
    fn root_config_serde_shape() {
        let roots: TlsRootConfig =
            serde_json::from_str(r#"{"source":"pem_file","path":"/etc/kessel/ca.pem"}"#).unwrap();
        assert_eq!(
            roots,
            TlsRootConfig::PemFile {
                path: PathBuf::from("/etc/kessel/ca.pem")
            }
        );
        let native: TlsRootConfig = serde_json::from_str(r#"{"source":"native"}"#).unwrap();
        assert_eq!(native, TlsRootConfig::Native);
    }
}
