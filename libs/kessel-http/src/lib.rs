#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! HTTP client infrastructure for the Kessel SDK.
//!
//! A thin hyper client with:
//! - TLS via rustls with selectable trust anchors (OS store or PEM)
//! - an explicit plaintext mode that never touches certificate stores
//! - connection pooling and a per-request timeout
//! - size-limited body reads and a reqwest-like response API
//!
//! ```ignore
//! use kessel_http::HttpClient;
//!
//! let client = HttpClient::builder().build()?;
//! let body: serde_json::Value = client
//!     .get("https://inventory.example.com/api/inventory/v1/livez")
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod request;
mod response;
pub mod tls;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::{DEFAULT_USER_AGENT, ERROR_BODY_PREVIEW_LIMIT, HttpClientConfig, TransportSecurity};
pub use error::{HttpError, UrlErrorKind};
pub use request::RequestBuilder;
pub use response::HttpResponse;
pub use tls::{TlsError, TlsRootConfig};
