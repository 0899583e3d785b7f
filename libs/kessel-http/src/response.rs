use bytes::Bytes;
use http::{HeaderMap, Response, StatusCode};
use http_body_util::BodyExt;
use hyper::body::Incoming;
use serde::de::DeserializeOwned;

use crate::config::ERROR_BODY_PREVIEW_LIMIT;
use crate::error::HttpError;

/// HTTP response wrapper with body-reading helpers
///
/// - `resp.error_for_status()?` checks the status without reading the body
/// - `resp.bytes().await?` reads raw bytes
/// - `resp.checked_bytes().await?` reads bytes after a status check
/// - `resp.json::<T>().await?` parses JSON after a status check
///
/// All body reads enforce the client's `max_body_size`.
#[derive(Debug)]
pub struct HttpResponse {
    inner: Response<Incoming>,
    max_body_size: usize,
}

impl HttpResponse {
    pub(crate) fn new(inner: Response<Incoming>, max_body_size: usize) -> Self {
        Self {
            inner,
            max_body_size,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Return `HttpError::HttpStatus` (with an empty body preview) for
    /// non-2xx responses.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::HttpStatus` if the response status is not 2xx.
    pub fn error_for_status(self) -> Result<Self, HttpError> {
        if self.inner.status().is_success() {
            return Ok(self);
        }
        Err(HttpError::HttpStatus {
            status: self.inner.status(),
            body_preview: String::new(),
            content_type: content_type(self.inner.headers()),
        })
    }

    /// Read the body without a status check.
    ///
    /// # Errors
    /// Returns `HttpError::BodyTooLarge` if the body exceeds the limit.
    pub async fn bytes(self) -> Result<Bytes, HttpError> {
        read_body_limited(self.inner, self.max_body_size).await
    }

    /// Read the body after a status check. Non-2xx responses become
    /// `HttpError::HttpStatus` carrying a preview of the body.
    ///
    /// # Errors
    /// Returns `HttpError::HttpStatus` if status is not 2xx.
    /// Returns `HttpError::BodyTooLarge` if body exceeds limit.
    pub async fn checked_bytes(self) -> Result<Bytes, HttpError> {
        let status = self.inner.status();
        if status.is_success() {
            return read_body_limited(self.inner, self.max_body_size).await;
        }

        let content_type = content_type(self.inner.headers());
        let preview_limit = self.max_body_size.min(ERROR_BODY_PREVIEW_LIMIT);
        let body_preview = match read_body_limited(self.inner, preview_limit).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(HttpError::BodyTooLarge { .. }) => "<body too large for preview>".to_owned(),
            Err(e) => return Err(e),
        };
        Err(HttpError::HttpStatus {
            status,
            body_preview,
            content_type,
        })
    }

    /// Parse the body as JSON after a status check.
    ///
    /// # Errors
    /// Returns `HttpError::HttpStatus` if status is not 2xx.
    /// Returns `HttpError::BodyTooLarge` if body exceeds limit.
    /// Returns `HttpError::Json` if parsing fails.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, HttpError> {
        let body = self.checked_bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Read the body as (lossy) UTF-8 text after a status check.
    ///
    /// # Errors
    /// Same as [`checked_bytes`](Self::checked_bytes).
    pub async fn text(self) -> Result<String, HttpError> {
        let body = self.checked_bytes().await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

fn content_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

async fn read_body_limited(response: Response<Incoming>, limit: usize) -> Result<Bytes, HttpError> {
    let mut body = response.into_body();
    let mut collected = Vec::new();

    while let Some(frame) = body.frame().await {
        let frame = frame?;
        if let Some(chunk) = frame.data_ref() {
            if collected.len() + chunk.len() > limit {
                return Err(HttpError::BodyTooLarge {
                    limit,
                    actual: collected.len() + chunk.len(),
                });
            }
            collected.extend_from_slice(chunk);
        }
    }

    Ok(Bytes::from(collected))
}
