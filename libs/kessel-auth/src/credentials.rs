use std::fmt;
use std::sync::Arc;

use http::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tonic::metadata::MetadataValue;
use tonic::{Request, Status};
use zeroize::Zeroizing;

use crate::error::TokenError;
use crate::token::{AccessToken, AccessTokenSource};

/// Whether the gRPC channel a call travels on is encrypted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChannelSecurity {
    #[default]
    Tls,
    Plaintext,
}

/// Per-call gRPC credentials: `authorization: Bearer <token>` metadata.
///
/// A regular bearer token refuses to be applied to a plaintext channel,
/// failing the call with `UNAUTHENTICATED`. Insecure tokens are applied to
/// any channel. Options without a token apply nothing.
///
/// Also usable as a `tonic` interceptor.
#[derive(Clone, Default)]
pub struct GrpcCallOptions {
    token: Option<AccessToken>,
    channel: ChannelSecurity,
}

impl GrpcCallOptions {
    /// Options that attach no credentials.
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: AccessToken, channel: ChannelSecurity) -> Self {
        Self {
            token: Some(token),
            channel,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Attach the credentials to an outgoing request.
    ///
    /// # Errors
    ///
    /// Returns `UNAUTHENTICATED` when a bearer token needs TLS but the channel
    /// is plaintext, or when the token is not valid metadata.
    pub fn apply<T>(&self, request: &mut Request<T>) -> Result<(), Status> {
        let Some(token) = &self.token else {
            return Ok(());
        };
        if !token.is_insecure() && self.channel == ChannelSecurity::Plaintext {
            return Err(Status::unauthenticated(
                "credentials require transport level security",
            ));
        }

        let header = Zeroizing::new(format!("Bearer {}", token.secret().expose()));
        let mut value = MetadataValue::try_from(header.as_str())
            .map_err(|_| Status::unauthenticated("access token is not valid gRPC metadata"))?;
        value.set_sensitive(true);
        request.metadata_mut().insert(AUTHORIZATION.as_str(), value);
        Ok(())
    }

    /// Wrap a message into a request carrying these credentials.
    ///
    /// # Errors
    ///
    /// Same as [`apply`](Self::apply).
    pub fn request<T>(&self, message: T) -> Result<Request<T>, Status> {
        let mut request = Request::new(message);
        self.apply(&mut request)?;
        Ok(request)
    }
}

impl fmt::Debug for GrpcCallOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrpcCallOptions")
            .field("token", &self.token)
            .field("channel", &self.channel)
            .finish()
    }
}

impl tonic::service::Interceptor for GrpcCallOptions {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        self.apply(&mut request)?;
        Ok(request)
    }
}

/// Per-call HTTP credentials: an `Authorization: Bearer <token>` header.
///
/// HTTP always sends the header; whether the connection is encrypted is
/// decided by the client's transport configuration.
#[derive(Debug, Clone, Default)]
pub struct HttpCallOptions {
    headers: HeaderMap,
}

impl HttpCallOptions {
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns [`TokenError::InvalidResponse`] when the token cannot be used
    /// as a header value.
    pub fn with_token(token: &AccessToken) -> Result<Self, TokenError> {
        let header = Zeroizing::new(format!("Bearer {}", token.secret().expose()));
        let mut value = HeaderValue::from_str(&header).map_err(|_| {
            TokenError::InvalidResponse("access token is not a valid header value".into())
        })?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(Self { headers })
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.headers.contains_key(AUTHORIZATION)
    }

    /// Headers to merge into the outgoing request.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

/// Turns the current access token into per-call credentials.
///
/// Holds at most one token source. Every producer call asks the source for a
/// token right then; nothing is cached here. Without a source, producers
/// return unauthenticated options.
#[derive(Clone, Default)]
pub struct CallAuthenticator {
    source: Option<Arc<dyn AccessTokenSource>>,
}

impl CallAuthenticator {
    #[must_use]
    pub fn new(source: Option<Arc<dyn AccessTokenSource>>) -> Self {
        Self { source }
    }

    #[must_use]
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    async fn token(&self) -> Result<Option<AccessToken>, TokenError> {
        match &self.source {
            Some(source) => source.access_token().await.map(Some),
            None => Ok(None),
        }
    }

    /// gRPC options for the next call on a channel with the given security.
    ///
    /// # Errors
    ///
    /// Returns the token source's error unchanged.
    pub async fn grpc_call_options(
        &self,
        channel: ChannelSecurity,
    ) -> Result<GrpcCallOptions, TokenError> {
        Ok(match self.token().await? {
            Some(token) => GrpcCallOptions::with_token(token, channel),
            None => GrpcCallOptions::unauthenticated(),
        })
    }

    /// HTTP header options for the next call.
    ///
    /// # Errors
    ///
    /// Returns the token source's error unchanged, or
    /// [`TokenError::InvalidResponse`] for tokens unusable as a header.
    pub async fn http_call_options(&self) -> Result<HttpCallOptions, TokenError> {
        match self.token().await? {
            Some(token) => HttpCallOptions::with_token(&token),
            None => Ok(HttpCallOptions::unauthenticated()),
        }
    }
}

impl fmt::Debug for CallAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallAuthenticator")
            .field("has_source", &self.source.is_some())
            .finish()
    }
}
