use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use http::{Method, Request};
use http_body_util::Full;
use serde::Serialize;

use crate::client::HttpClient;
use crate::config::TransportSecurity;
use crate::error::{HttpError, UrlErrorKind};
use crate::response::HttpResponse;

/// HTTP request builder with fluent API
///
/// Created by [`HttpClient::get`], [`HttpClient::post`], etc. Errors from
/// `header()` are deferred and reported by [`send()`](RequestBuilder::send).
///
/// ```ignore
/// let resp = client
///     .post("https://sso.example.com/token")
///     .header("authorization", "Basic xyz")
///     .form(&[("grant_type", "client_credentials")])?
///     .send()
///     .await?;
/// ```
#[must_use = "RequestBuilder does nothing until .send() is called"]
pub struct RequestBuilder {
    client: HttpClient,
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Option<(Bytes, &'static str)>,
    /// Error captured during building (deferred to `send()`)
    error: Option<HttpError>,
}

impl RequestBuilder {
    pub(crate) fn new(client: HttpClient, method: Method, url: String) -> Self {
        Self {
            client,
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            error: None,
        }
    }

    /// Add a single header, replacing any previous value with the same name.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            (Err(e), _) => self.error = Some(e.into()),
            (_, Err(e)) => self.error = Some(e.into()),
        }
        self
    }

    /// Merge pre-built headers, replacing existing values with the same name.
    pub fn headers(mut self, headers: &HeaderMap) -> Self {
        for (name, value) in headers {
            self.headers.insert(name.clone(), value.clone());
        }
        self
    }

    /// Set a JSON body. Content-Type defaults to `application/json`.
    ///
    /// # Errors
    ///
    /// Returns a deferred header error or `HttpError::Json` when serialization
    /// fails.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        let bytes = serde_json::to_vec(body)?;
        self.body = Some((Bytes::from(bytes), "application/json"));
        Ok(self)
    }

    /// Set a form URL-encoded body.
    ///
    /// # Errors
    ///
    /// Returns a deferred header error or `HttpError::FormEncode`.
    pub fn form(mut self, fields: &[(&str, &str)]) -> Result<Self, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        let encoded = serde_urlencoded::to_string(fields)?;
        self.body = Some((Bytes::from(encoded), "application/x-www-form-urlencoded"));
        Ok(self)
    }

    fn validate_url(&self) -> Result<http::Uri, HttpError> {
        let uri: http::Uri =
            self.url
                .parse()
                .map_err(|e: http::uri::InvalidUri| HttpError::InvalidUrl {
                    url: self.url.clone(),
                    kind: UrlErrorKind::Malformed,
                    reason: e.to_string(),
                })?;

        if uri.authority().is_none() {
            return Err(HttpError::InvalidUrl {
                url: self.url.clone(),
                kind: UrlErrorKind::NoHost,
                reason: "no host".to_owned(),
            });
        }

        let transport = self.client.transport_security();
        match uri.scheme_str() {
            Some("https") if transport == TransportSecurity::Plaintext => {
                Err(HttpError::SchemeNotAllowed {
                    scheme: "https".to_owned(),
                    reason: "client is plaintext-only".to_owned(),
                })
            }
            Some("http") if transport == TransportSecurity::TlsOnly => {
                Err(HttpError::SchemeNotAllowed {
                    scheme: "http".to_owned(),
                    reason: "client requires TLS".to_owned(),
                })
            }
            Some("https" | "http") => Ok(uri),
            Some(scheme) => Err(HttpError::SchemeNotAllowed {
                scheme: scheme.to_owned(),
                reason: "expected http or https".to_owned(),
            }),
            None => Err(HttpError::InvalidUrl {
                url: self.url.clone(),
                kind: UrlErrorKind::NoScheme,
                reason: "no scheme".to_owned(),
            }),
        }
    }

    /// Send the request.
    ///
    /// # Errors
    ///
    /// Returns `HttpError` if building failed, the URL is invalid for the
    /// transport security mode, or on transport failure or timeout. HTTP
    /// error statuses are not errors at this point.
    pub async fn send(mut self) -> Result<HttpResponse, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        let uri = self.validate_url()?;

        let mut headers = std::mem::take(&mut self.headers);
        if !headers.contains_key(USER_AGENT) {
            headers.insert(USER_AGENT, self.client.user_agent().clone());
        }
        let body = match self.body.take() {
            Some((bytes, content_type)) => {
                if !headers.contains_key(CONTENT_TYPE) {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
                }
                bytes
            }
            None => Bytes::new(),
        };

        let mut request = Request::builder()
            .method(self.method.clone())
            .uri(uri)
            .body(Full::new(body))?;
        *request.headers_mut() = headers;

        let response = self.client.execute(request).await?;
        Ok(HttpResponse::new(response, self.client.max_body_size()))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::builder::HttpClientBuilder;
    use crate::config::HttpClientConfig;
    use httpmock::prelude::*;

    fn plaintext_client() -> HttpClient {
        HttpClientBuilder::with_config(HttpClientConfig::for_testing())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn relative_url_is_rejected() {
        let err = plaintext_client().get("/relative").send().await.unwrap_err();
        assert!(matches!(
            err,
            HttpError::InvalidUrl {
                kind: UrlErrorKind::NoHost,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn https_rejected_in_plaintext_mode() {
        let err = plaintext_client()
            .get("https://example.com/")
            .send()
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::SchemeNotAllowed { ref scheme, .. } if scheme == "https"));
    }

    #[tokio::test]
    async fn unknown_scheme_rejected() {
        let err = plaintext_client()
            .get("ftp://example.com/file")
            .send()
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::SchemeNotAllowed { ref scheme, .. } if scheme == "ftp"));
    }

    #[tokio::test]
    async fn invalid_header_is_deferred_to_send() {
        let err = plaintext_client()
            .get("http://localhost:1/")
            .header("bad header", "v")
            .send()
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::InvalidHeaderName(_)));
    }

    #[tokio::test]
    async fn json_body_sets_content_type() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/items")
                .header("content-type", "application/json")
                .header("x-request-id", "r-1")
                .json_body(serde_json::json!({"name": "host-1"}));
            then.status(201);
        });

        let mut extra = HeaderMap::new();
        extra.insert("x-request-id", HeaderValue::from_static("r-1"));
        let resp = plaintext_client()
            .post(&server.url("/items"))
            .headers(&extra)
            .json(&serde_json::json!({"name": "host-1"}))
            .unwrap()
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), http::StatusCode::CREATED);
        mock.assert();
    }

    #[tokio::test]
    async fn form_body_is_urlencoded() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/token")
                .header("content-type", "application/x-www-form-urlencoded")
                .body("grant_type=client_credentials&scope=a+b");
            then.status(200);
        });

        plaintext_client()
            .post(&server.url("/token"))
            .form(&[("grant_type", "client_credentials"), ("scope", "a b")])
            .unwrap()
            .send()
            .await
            .unwrap();
        mock.assert();
    }
}
