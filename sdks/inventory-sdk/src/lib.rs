#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Client SDK for the Kessel inventory API.
//!
//! Each API version has a gRPC client ([`v1beta2::InventoryClient`]) and an
//! HTTP client ([`v1beta2::InventoryHttpClient`]) built from one [`Config`].
//! A client holds one public stub per backend service plus an optional
//! token source. Before each call, ask the client for credentials and pass
//! them along:
//!
//! ```ignore
//! use kessel_inventory_sdk::{Config, v1beta2::InventoryClient};
//!
//! let config = Config::new("inventory.example.com:443")
//!     .with_auth("svc-reporter", secret, token_url);
//! let mut client = InventoryClient::new(&config)?;
//!
//! let opts = client.token_call_options().await?;
//! let resp = client
//!     .resource_service
//!     .report_resource(opts.request(request)?)
//!     .await?;
//! ```
//!
//! Credentials are produced fresh for every call. With OIDC enabled the
//! token source caches the access token until shortly before it expires.

mod config;
mod connection;
mod error;
mod http_transport;
pub mod proto;
pub mod v1beta1;
pub mod v1beta2;

pub use config::{Config, OidcSettings, TlsConfig};
pub use error::ClientError;
pub use kessel_auth::oidc::ClientAuthMethod;
pub use kessel_auth::{
    AccessToken, AccessTokenSource, GrpcCallOptions, HttpCallOptions, StaticTokenSource,
    TokenError,
};
pub use kessel_http::TlsRootConfig;
