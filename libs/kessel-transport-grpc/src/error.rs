use thiserror::Error;

/// Errors raised while building a gRPC channel.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GrpcTransportError {
    #[error("invalid gRPC target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error(transparent)]
    Tls(#[from] kessel_http::TlsError),
}
