//! JSON transport shared by the HTTP service stubs.

use http::Method;
use kessel_auth::HttpCallOptions;
use kessel_http::{HttpClient, HttpClientBuilder, HttpClientConfig, HttpError, TransportSecurity};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::ClientError;

/// Error body returned by the inventory gateway.
#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client bound to the gateway base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: HttpClient,
    base_url: String,
}

impl HttpTransport {
    /// Build the transport for `config.http_url`.
    ///
    /// Plaintext configurations load no certificates.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] for a missing or inconsistent URL and
    /// [`ClientError::Tls`] when trust anchors cannot be loaded.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let base_url = config.http_base_url()?;
        let transport = if config.insecure {
            TransportSecurity::Plaintext
        } else {
            TransportSecurity::TlsOnly
        };
        let client = HttpClientBuilder::with_config(HttpClientConfig {
            request_timeout: config.request_timeout,
            transport,
            tls_roots: config.tls.roots.clone(),
            ..HttpClientConfig::default()
        })
        .user_agent(concat!("kessel-inventory-sdk/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| match e {
            HttpError::Tls(tls) => ClientError::Tls(tls),
            other => ClientError::Http(other),
        })?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send `request` as JSON and decode the JSON response.
    ///
    /// An empty success body decodes as `Resp::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] for non-2xx responses and
    /// [`ClientError::Http`] for transport or decoding failures.
    pub async fn call<Req, Resp>(
        &self,
        method: Method,
        path: &str,
        request: &Req,
        options: &HttpCallOptions,
    ) -> Result<Resp, ClientError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned + Default,
    {
        let url = format!("{}{path}", self.base_url);
        tracing::trace!(%method, %url, authenticated = options.is_authenticated(), "inventory HTTP call");

        let response = self
            .client
            .request(method, &url)
            .headers(options.headers())
            .json(request)?
            .send()
            .await?;

        let body = match response.checked_bytes().await {
            Ok(body) => body,
            Err(HttpError::HttpStatus {
                status,
                body_preview,
                ..
            }) => return Err(api_error(status, &body_preview)),
            Err(e) => return Err(e.into()),
        };

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Resp::default());
        }
        serde_json::from_slice(&body).map_err(|e| ClientError::Http(HttpError::Json(e)))
    }
}

fn api_error(status: http::StatusCode, body: &str) -> ClientError {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();
    let reason = parsed.as_ref().and_then(|b| b.reason.clone());
    let message = parsed
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_owned());

    ClientError::Api {
        status: status.as_u16(),
        reason,
        message,
    }
}
