use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use kessel_utils::SecretString;

use crate::error::TokenError;

/// An access token plus how it may be presented.
///
/// An *insecure* token may be sent over plaintext channels. A regular bearer
/// token requires transport security on gRPC channels.
#[derive(Clone)]
pub struct AccessToken {
    value: SecretString,
    insecure: bool,
}

impl AccessToken {
    /// Bearer token that must only travel over TLS.
    #[must_use]
    pub fn bearer(value: impl Into<SecretString>) -> Self {
        Self {
            value: value.into(),
            insecure: false,
        }
    }

    /// Bearer token that may also travel over plaintext channels.
    #[must_use]
    pub fn insecure_bearer(value: impl Into<SecretString>) -> Self {
        Self {
            value: value.into(),
            insecure: true,
        }
    }

    #[must_use]
    pub fn secret(&self) -> &SecretString {
        &self.value
    }

    #[must_use]
    pub fn is_insecure(&self) -> bool {
        self.insecure
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &self.value)
            .field("insecure", &self.insecure)
            .finish()
    }
}

/// Produces the access token to attach to the next outbound call.
///
/// Implementations may hit the network; callers bound latency by dropping
/// the future.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    /// Return a currently valid token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError`] when no token can be obtained.
    async fn access_token(&self) -> Result<AccessToken, TokenError>;
}

#[async_trait]
impl<T: AccessTokenSource + ?Sized> AccessTokenSource for Arc<T> {
    async fn access_token(&self) -> Result<AccessToken, TokenError> {
        (**self).access_token().await
    }
}

/// Token source that always returns the same pre-issued token.
#[derive(Debug, Clone)]
pub struct StaticTokenSource {
    token: AccessToken,
}

impl StaticTokenSource {
    #[must_use]
    pub fn new(token: AccessToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl AccessTokenSource for StaticTokenSource {
    async fn access_token(&self) -> Result<AccessToken, TokenError> {
        Ok(self.token.clone())
    }
}
