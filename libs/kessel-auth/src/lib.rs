#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Authentication for outbound Kessel calls.
//!
//! A single capability, [`AccessTokenSource`], produces access tokens.
//! [`CallAuthenticator`] turns the current token into per-call credentials
//! for either transport: gRPC metadata ([`GrpcCallOptions`]) or HTTP headers
//! ([`HttpCallOptions`]).
//!
//! Token sources:
//! - [`StaticTokenSource`] for pre-issued tokens
//! - [`oidc::OidcTokenSource`] for the `OAuth2` client-credentials grant with
//!   optional OIDC discovery and in-memory caching

mod credentials;
mod error;
pub mod http_error;
pub mod oidc;
mod token;

pub use credentials::{CallAuthenticator, ChannelSecurity, GrpcCallOptions, HttpCallOptions};
pub use error::TokenError;
pub use kessel_utils::SecretString;
pub use token::{AccessToken, AccessTokenSource, StaticTokenSource};
