#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! gRPC transport for the Kessel SDK: tonic channels over plaintext HTTP/2 or
//! rustls TLS, with keepalive and timeouts applied.

pub mod client;
mod error;

pub use client::{GrpcClientConfig, GrpcSecurity, connect_lazy, normalize_target};
pub use error::GrpcTransportError;
