use kessel_auth::TokenError;
use kessel_http::{HttpError, TlsError};
use kessel_transport_grpc::GrpcTransportError;
use thiserror::Error;

/// Errors returned by the inventory clients.
///
/// Construction fails with `Config`, `Tls`, `Transport` or `Http`. The
/// per-call option producers return `Token`. HTTP stubs return `Api` for
/// error responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to load TLS credentials: {0}")]
    Tls(#[from] TlsError),

    #[error("gRPC transport error: {0}")]
    Transport(#[source] GrpcTransportError),

    #[error("HTTP transport error: {0}")]
    Http(#[from] HttpError),

    #[error(transparent)]
    Token(#[from] TokenError),

    /// The server answered with a non-2xx status.
    #[error("inventory API returned {status}: {message}")]
    Api {
        status: u16,
        /// Machine-readable reason from the error body, when present.
        reason: Option<String>,
        message: String,
    },
}

impl From<GrpcTransportError> for ClientError {
    fn from(err: GrpcTransportError) -> Self {
        match err {
            GrpcTransportError::Tls(tls) => Self::Tls(tls),
            other => Self::Transport(other),
        }
    }
}

impl ClientError {
    /// HTTP status of an API error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn grpc_tls_errors_surface_as_tls() {
        let err: ClientError =
            GrpcTransportError::Tls(TlsError::NoRoots("empty bundle".into())).into();
        assert!(matches!(err, ClientError::Tls(TlsError::NoRoots(_))));
    }

    #[test]
    fn other_grpc_errors_stay_transport() {
        let err: ClientError = GrpcTransportError::InvalidTarget {
            target: String::new(),
            reason: "target is empty".into(),
        }
        .into();
        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn api_error_display() {
        let err = ClientError::Api {
            status: 403,
            reason: None,
            message: "forbidden".into(),
        };
        assert_eq!(err.to_string(), "inventory API returned 403: forbidden");
        assert_eq!(err.status(), Some(403));
    }
}
