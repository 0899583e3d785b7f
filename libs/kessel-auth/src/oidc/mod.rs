//! `OAuth2` client-credentials token acquisition with optional OIDC discovery.

mod config;
mod discovery;
mod source;
mod types;

pub use config::OidcClientConfig;
pub use source::OidcTokenSource;
pub use types::ClientAuthMethod;
