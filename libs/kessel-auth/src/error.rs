use thiserror::Error;

/// Errors returned while acquiring an access token.
///
/// No variant ever carries a client secret or token value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TokenError {
    /// HTTP transport or status error talking to the identity provider.
    ///
    /// The message comes from
    /// [`format_http_error`](crate::http_error::format_http_error) and never
    /// includes response bodies.
    #[error("{0}")]
    Http(String),

    /// The identity provider returned an unparseable or incomplete response.
    #[error("invalid token response: {0}")]
    InvalidResponse(String),

    /// The token endpoint returned a `token_type` other than `Bearer`.
    #[error("unsupported token type: {0}")]
    UnsupportedTokenType(String),

    /// The token source configuration is invalid.
    #[error("OIDC config error: {0}")]
    ConfigError(String),

    /// No token can be produced right now.
    #[error("token unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn variants_render() {
        assert_eq!(
            TokenError::ConfigError("client_id must not be empty".into()).to_string(),
            "OIDC config error: client_id must not be empty"
        );
        assert_eq!(
            TokenError::Http("OIDC token HTTP 401 Unauthorized".into()).to_string(),
            "OIDC token HTTP 401 Unauthorized"
        );
        assert_eq!(
            TokenError::InvalidResponse("missing access_token".into()).to_string(),
            "invalid token response: missing access_token"
        );
        assert_eq!(
            TokenError::UnsupportedTokenType("mac".into()).to_string(),
            "unsupported token type: mac"
        );
        assert_eq!(
            TokenError::Unavailable("source shut down".into()).to_string(),
            "token unavailable: source shut down"
        );
    }
}
