/// Format a [`kessel_http::HttpError`] for token-related error messages.
///
/// The prefix names the caller context (`"OIDC token"`, `"OIDC discovery"`)
/// so messages are attributable in logs.
///
/// `HttpStatus` errors render only the status code. Response bodies from
/// identity providers are never included.
#[must_use]
pub fn format_http_error(e: &kessel_http::HttpError, prefix: &str) -> String {
    use kessel_http::HttpError;
    match e {
        HttpError::HttpStatus { status, .. } => format!("{prefix} HTTP {status}"),
        HttpError::Json(err) => format!("{prefix} JSON parse failed: {err}"),
        HttpError::Timeout(duration) => {
            format!("{prefix} request timed out after {duration:?}")
        }
        HttpError::Transport(err) => format!("{prefix} transport error: {err}"),
        HttpError::BodyTooLarge { limit, actual } => {
            format!("{prefix} response too large: limit {limit} bytes, got {actual} bytes")
        }
        HttpError::Tls(err) => format!("{prefix} TLS error: {err}"),
        HttpError::RequestBuild(err) => format!("{prefix} request build failed: {err}"),
        HttpError::InvalidHeaderName(err) => format!("{prefix} invalid header name: {err}"),
        HttpError::InvalidHeaderValue(_) => format!("{prefix} invalid header value"),
        HttpError::FormEncode(err) => format!("{prefix} form encode error: {err}"),
        HttpError::InvalidUrl { url, reason, .. } => {
            format!("{prefix} invalid URL '{url}': {reason}")
        }
        HttpError::SchemeNotAllowed { scheme, reason } => {
            format!("{prefix} invalid scheme '{scheme}': {reason}")
        }
        // Unknown future variants: omit detail, their Display may carry data
        _ => format!("{prefix} request failed"),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn http_status_excludes_body() {
        let err = kessel_http::HttpError::HttpStatus {
            status: http::StatusCode::INTERNAL_SERVER_ERROR,
            body_preview: "client_secret=hunter2 rejected".into(),
            content_type: None,
        };
        let msg = format_http_error(&err, "OIDC token");
        assert_eq!(msg, "OIDC token HTTP 500 Internal Server Error");
        assert!(!msg.contains("hunter2"));
    }

    #[test]
    fn timeout_error() {
        let err = kessel_http::HttpError::Timeout(Duration::from_secs(30));
        assert_eq!(
            format_http_error(&err, "OIDC discovery"),
            "OIDC discovery request timed out after 30s"
        );
    }

    #[test]
    fn invalid_scheme_error() {
        let err = kessel_http::HttpError::SchemeNotAllowed {
            scheme: "http".into(),
            reason: "HTTPS required".into(),
        };
        assert_eq!(
            format_http_error(&err, "CTX"),
            "CTX invalid scheme 'http': HTTPS required"
        );
    }
}
