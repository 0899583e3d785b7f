use std::time::Duration;

use bytes::Bytes;
use http::{HeaderValue, Method, Request, Response};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower::{ServiceBuilder, ServiceExt};

use crate::builder::HttpClientBuilder;
use crate::config::TransportSecurity;
use crate::error::HttpError;
use crate::request::RequestBuilder;

type HyperClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// HTTP client over a pooled hyper connection manager.
///
/// `HttpClient` is `Clone + Send + Sync`; clones share the connection pool.
///
/// `send()` resolves to a response for every HTTP status. Non-2xx statuses
/// become errors only through [`HttpResponse::error_for_status`] or the
/// checked body readers.
///
/// [`HttpResponse::error_for_status`]: crate::HttpResponse::error_for_status
#[derive(Clone)]
pub struct HttpClient {
    inner: HyperClient,
    request_timeout: Duration,
    max_body_size: usize,
    transport_security: TransportSecurity,
    user_agent: HeaderValue,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("request_timeout", &self.request_timeout)
            .field("max_body_size", &self.max_body_size)
            .field("transport_security", &self.transport_security)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    pub(crate) fn from_parts(
        inner: HyperClient,
        request_timeout: Duration,
        max_body_size: usize,
        transport_security: TransportSecurity,
        user_agent: HeaderValue,
    ) -> Self {
        Self {
            inner,
            request_timeout,
            max_body_size,
            transport_security,
            user_agent,
        }
    }

    /// Create a new HTTP client with default configuration
    ///
    /// # Errors
    /// Returns an error if TLS initialization fails
    pub fn new() -> Result<Self, HttpError> {
        HttpClientBuilder::new().build()
    }

    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Start a request with an arbitrary method.
    ///
    /// The URL must be absolute (`https://host/path`); `http://` is accepted
    /// only when the transport security mode allows it.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        RequestBuilder::new(self.clone(), method, url.to_owned())
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    pub fn put(&self, url: &str) -> RequestBuilder {
        self.request(Method::PUT, url)
    }

    pub fn delete(&self, url: &str) -> RequestBuilder {
        self.request(Method::DELETE, url)
    }

    pub(crate) fn transport_security(&self) -> TransportSecurity {
        self.transport_security
    }

    pub(crate) fn max_body_size(&self) -> usize {
        self.max_body_size
    }

    pub(crate) fn user_agent(&self) -> &HeaderValue {
        &self.user_agent
    }

    /// Dispatch a prepared request through the timeout layer.
    pub(crate) async fn execute(
        &self,
        request: Request<Full<Bytes>>,
    ) -> Result<Response<Incoming>, HttpError> {
        let service = ServiceBuilder::new()
            .layer(TimeoutLayer::new(self.request_timeout))
            .service(self.inner.clone());

        service
            .oneshot(request)
            .await
            .map_err(|err| map_service_error(err, self.request_timeout))
    }
}

fn map_service_error(err: tower::BoxError, timeout: Duration) -> HttpError {
    if err.is::<Elapsed>() {
        return HttpError::Timeout(timeout);
    }
    match err.downcast::<hyper_util::client::legacy::Error>() {
        Ok(e) => HttpError::from(*e),
        Err(other) => HttpError::Transport(other),
    }
}
