use serde::Deserialize;
use url::Url;

use crate::error::TokenError;
use crate::http_error::format_http_error;

/// The only field of the OIDC discovery document the SDK needs.
#[derive(Deserialize)]
struct OidcDiscoveryDoc {
    token_endpoint: String,
}

/// Resolve the token endpoint advertised by an OIDC issuer.
///
/// Fetches `{issuer_url}/.well-known/openid-configuration`, ignoring a
/// trailing slash on the issuer.
///
/// # Errors
///
/// Returns [`TokenError::Http`] if the request fails or the status is not
/// 2xx, and [`TokenError::InvalidResponse`] if the document cannot be parsed
/// or its `token_endpoint` is not a valid URL.
pub(crate) async fn discover_token_endpoint(
    client: &kessel_http::HttpClient,
    issuer_url: &Url,
) -> Result<Url, TokenError> {
    let base = issuer_url.as_str().trim_end_matches('/');
    let discovery_url = format!("{base}/.well-known/openid-configuration");

    let doc: OidcDiscoveryDoc = client
        .get(&discovery_url)
        .send()
        .await
        .map_err(|e| TokenError::Http(format_http_error(&e, "OIDC discovery")))?
        .error_for_status()
        .map_err(|e| TokenError::Http(format_http_error(&e, "OIDC discovery")))?
        .json()
        .await
        .map_err(|e| TokenError::InvalidResponse(format_http_error(&e, "OIDC discovery")))?;

    let endpoint = Url::parse(&doc.token_endpoint).map_err(|e| {
        TokenError::InvalidResponse(format!(
            "invalid token_endpoint URL in discovery document: {e}"
        ))
    })?;
    tracing::debug!(issuer = %issuer_url, token_endpoint = %endpoint, "resolved OIDC token endpoint");
    Ok(endpoint)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn build_client() -> kessel_http::HttpClient {
        kessel_http::HttpClientBuilder::with_config(kessel_http::HttpClientConfig::for_testing())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn discover_with_trailing_slash_issuer() {
        let server = MockServer::start();
        let token_ep = server.url("/protocol/openid-connect/token");
        let mock = server.mock(|when, then| {
            when.method(GET).path("/.well-known/openid-configuration");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(serde_json::json!({
                    "issuer": server.base_url(),
                    "token_endpoint": token_ep,
                }));
        });

        let issuer = Url::parse(&format!("{}/", server.base_url())).unwrap();
        let url = discover_token_endpoint(&build_client(), &issuer).await.unwrap();
        assert_eq!(url.as_str(), token_ep);
        mock.assert();
    }

    #[tokio::test]
    async fn discover_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/.well-known/openid-configuration");
            then.status(503);
        });

        let issuer = Url::parse(&server.base_url()).unwrap();
        let err = discover_token_endpoint(&build_client(), &issuer).await.unwrap_err();
        assert_eq!(
            err,
            TokenError::Http("OIDC discovery HTTP 503 Service Unavailable".into())
        );
    }

    #[tokio::test]
    async fn discover_missing_token_endpoint() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/.well-known/openid-configuration");
            then.status(200).json_body(serde_json::json!({"issuer": "x"}));
        });

        let issuer = Url::parse(&server.base_url()).unwrap();
        let err = discover_token_endpoint(&build_client(), &issuer).await.unwrap_err();
        assert!(matches!(err, TokenError::InvalidResponse(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn discover_invalid_token_endpoint_url() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/.well-known/openid-configuration");
            then.status(200)
                .json_body(serde_json::json!({"token_endpoint": "not a url"}));
        });

        let issuer = Url::parse(&server.base_url()).unwrap();
        let err = discover_token_endpoint(&build_client(), &issuer).await.unwrap_err();
        assert!(matches!(err, TokenError::InvalidResponse(ref m) if m.contains("token_endpoint")));
    }
}
