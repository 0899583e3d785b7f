use std::time::Duration;

use thiserror::Error;

use crate::tls::TlsError;

/// Why a request URL was refused before sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum UrlErrorKind {
    Malformed,
    /// No host, e.g. a relative path.
    NoHost,
    /// No `http://` or `https://` prefix.
    NoScheme,
}

/// Errors from [`HttpClient`](crate::HttpClient) requests.
///
/// Status errors are only produced by the checked body readers, so callers
/// that inspect non-2xx responses themselves never see `HttpStatus`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpError {
    #[error("cannot build request: {0}")]
    RequestBuild(#[from] http::Error),

    #[error("bad header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    #[error("bad header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    /// The request exceeded the client's `request_timeout`.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// Connection, DNS or protocol failure.
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("TLS error: {0}")]
    Tls(#[from] TlsError),

    #[error("body exceeds {limit} bytes (got {actual})")]
    BodyTooLarge { limit: usize, actual: usize },

    /// Non-2xx status with at most
    /// [`ERROR_BODY_PREVIEW_LIMIT`](crate::ERROR_BODY_PREVIEW_LIMIT) bytes
    /// of the body.
    #[error("HTTP {status}: {body_preview}")]
    HttpStatus {
        status: http::StatusCode,
        body_preview: String,
        content_type: Option<String>,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot encode form: {0}")]
    FormEncode(#[from] serde_urlencoded::ser::Error),

    /// `reason` is for logs; match on `kind`.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        url: String,
        kind: UrlErrorKind,
        reason: String,
    },

    /// The scheme conflicts with the client's
    /// [`TransportSecurity`](crate::TransportSecurity).
    #[error("scheme '{scheme}' refused: {reason}")]
    SchemeNotAllowed { scheme: String, reason: String },
}

impl From<hyper::Error> for HttpError {
    fn from(err: hyper::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

impl From<hyper_util::client::legacy::Error> for HttpError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn transport_error_keeps_io_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = HttpError::Transport(Box::new(io));
        let source = err.source().unwrap();
        assert_eq!(
            source.downcast_ref::<std::io::Error>().unwrap().kind(),
            std::io::ErrorKind::ConnectionRefused
        );
        assert_eq!(err.to_string(), "transport failure: connection refused");
    }

    #[test]
    fn tls_error_chains_to_cause() {
        let err = HttpError::from(TlsError::NoRoots("empty".into()));
        assert!(err.to_string().starts_with("TLS error: "));
        assert!(err.source().is_some());
    }

    #[test]
    fn status_error_shows_preview() {
        let err = HttpError::HttpStatus {
            status: http::StatusCode::FORBIDDEN,
            body_preview: "{\"message\":\"denied\"}".into(),
            content_type: Some("application/json".into()),
        };
        assert_eq!(err.to_string(), "HTTP 403 Forbidden: {\"message\":\"denied\"}");
    }
}
