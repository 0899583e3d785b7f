//! Clients for the `v1beta2` inventory API.
//!
//! ```ignore
//! use kessel_inventory_sdk::{Config, v1beta2::InventoryClient};
//!
//! let mut client = InventoryClient::new(&config)?;
//! let opts = client.token_call_options().await?;
//! let resp = client.resource_service.check(opts.request(check_request)?).await?;
//! ```

use std::sync::Arc;

use kessel_auth::{AccessTokenSource, GrpcCallOptions, HttpCallOptions, TokenError};
use tonic::transport::Channel;

use crate::config::Config;
use crate::connection::{GrpcConnection, HttpConnection};
use crate::error::ClientError;
use crate::proto::v1beta2::{KesselResourceServiceClient, KesselResourceServiceHttpClient};

const SERVICE_NAME: &str = "kessel-inventory-v1beta2";

/// gRPC client for the `v1beta2` services.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    pub resource_service: KesselResourceServiceClient,
    connection: GrpcConnection,
}

impl InventoryClient {
    /// Build a client from `config`, with an OIDC token source when
    /// `enable_oidc_auth` is set.
    ///
    /// # Errors
    ///
    /// See [`ClientError`]; fails on invalid configuration or TLS material.
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        Self::build(config, None)
    }

    /// Build a client that authenticates with `source`, ignoring the OIDC
    /// settings.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_token_source(
        config: &Config,
        source: Arc<dyn AccessTokenSource>,
    ) -> Result<Self, ClientError> {
        Self::build(config, Some(source))
    }

    fn build(
        config: &Config,
        source: Option<Arc<dyn AccessTokenSource>>,
    ) -> Result<Self, ClientError> {
        let connection = GrpcConnection::open(config, SERVICE_NAME, source)?;
        Ok(Self {
            resource_service: KesselResourceServiceClient::new(connection.channel()),
            connection,
        })
    }

    /// Credentials for the next call.
    ///
    /// # Errors
    ///
    /// Returns the token source's error unchanged.
    pub async fn token_call_options(&self) -> Result<GrpcCallOptions, TokenError> {
        self.connection.token_call_options().await
    }

    #[must_use]
    pub fn has_token_source(&self) -> bool {
        self.connection.has_token_source()
    }

    #[must_use]
    pub fn channel(&self) -> Channel {
        self.connection.channel()
    }
}

/// HTTP client for the `v1beta2` services.
#[derive(Debug, Clone)]
pub struct InventoryHttpClient {
    pub resource_service: KesselResourceServiceHttpClient,
    connection: HttpConnection,
}

impl InventoryHttpClient {
    /// Build a client for `config.http_url`.
    ///
    /// # Errors
    ///
    /// See [`ClientError`]; fails on a missing `http_url`, invalid
    /// configuration or TLS material.
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        Self::build(config, None)
    }

    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_token_source(
        config: &Config,
        source: Arc<dyn AccessTokenSource>,
    ) -> Result<Self, ClientError> {
        Self::build(config, Some(source))
    }

    fn build(
        config: &Config,
        source: Option<Arc<dyn AccessTokenSource>>,
    ) -> Result<Self, ClientError> {
        let connection = HttpConnection::open(config, source)?;
        Ok(Self {
            resource_service: KesselResourceServiceHttpClient::new(connection.transport()),
            connection,
        })
    }

    /// `Authorization` header for the next call.
    ///
    /// # Errors
    ///
    /// Returns the token source's error unchanged.
    pub async fn token_http_options(&self) -> Result<HttpCallOptions, TokenError> {
        self.connection.token_http_options().await
    }

    #[must_use]
    pub fn has_token_source(&self) -> bool {
        self.connection.has_token_source()
    }
}
