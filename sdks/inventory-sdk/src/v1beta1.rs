//! Clients for the `v1beta1` inventory API: one service per resource type
//! plus the policy propagation relationship.

use std::sync::Arc;

use kessel_auth::{AccessTokenSource, GrpcCallOptions, HttpCallOptions, TokenError};
use tonic::transport::Channel;

use crate::config::Config;
use crate::connection::{GrpcConnection, HttpConnection};
use crate::error::ClientError;
use crate::proto::v1beta1::relationships::{
    KesselK8sPolicyIsPropagatedToK8sClusterServiceClient,
    KesselK8sPolicyIsPropagatedToK8sClusterServiceHttpClient,
};
use crate::proto::v1beta1::resources::{
    KesselK8sClusterServiceClient, KesselK8sClusterServiceHttpClient, KesselK8sPolicyServiceClient,
    KesselK8sPolicyServiceHttpClient, KesselNotificationsIntegrationServiceClient,
    KesselNotificationsIntegrationServiceHttpClient, KesselRhelHostServiceClient,
    KesselRhelHostServiceHttpClient,
};

const SERVICE_NAME: &str = "kessel-inventory-v1beta1";

/// gRPC client for the `v1beta1` services. All stubs share one channel.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    pub k8s_cluster_service: KesselK8sClusterServiceClient,
    pub k8s_policy_service: KesselK8sPolicyServiceClient,
    pub k8s_policy_is_propagated_to_k8s_cluster_service:
        KesselK8sPolicyIsPropagatedToK8sClusterServiceClient,
    pub rhel_host_service: KesselRhelHostServiceClient,
    pub notifications_integration_service: KesselNotificationsIntegrationServiceClient,
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

    /// Build a client that authenticates with `source`.
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
        let channel = connection.channel();
        Ok(Self {
            k8s_cluster_service: KesselK8sClusterServiceClient::new(channel.clone()),
            k8s_policy_service: KesselK8sPolicyServiceClient::new(channel.clone()),
            k8s_policy_is_propagated_to_k8s_cluster_service:
                KesselK8sPolicyIsPropagatedToK8sClusterServiceClient::new(channel.clone()),
            rhel_host_service: KesselRhelHostServiceClient::new(channel.clone()),
            notifications_integration_service: KesselNotificationsIntegrationServiceClient::new(
                channel,
            ),
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

/// HTTP client for the `v1beta1` services.
#[derive(Debug, Clone)]
pub struct InventoryHttpClient {
    pub k8s_cluster_service: KesselK8sClusterServiceHttpClient,
    pub k8s_policy_service: KesselK8sPolicyServiceHttpClient,
    pub k8s_policy_is_propagated_to_k8s_cluster_service:
        KesselK8sPolicyIsPropagatedToK8sClusterServiceHttpClient,
    pub rhel_host_service: KesselRhelHostServiceHttpClient,
    pub notifications_integration_service: KesselNotificationsIntegrationServiceHttpClient,
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
        let transport = connection.transport();
        Ok(Self {
            k8s_cluster_service: KesselK8sClusterServiceHttpClient::new(transport.clone()),
            k8s_policy_service: KesselK8sPolicyServiceHttpClient::new(transport.clone()),
            k8s_policy_is_propagated_to_k8s_cluster_service:
                KesselK8sPolicyIsPropagatedToK8sClusterServiceHttpClient::new(transport.clone()),
            rhel_host_service: KesselRhelHostServiceHttpClient::new(transport.clone()),
            notifications_integration_service:
                KesselNotificationsIntegrationServiceHttpClient::new(transport),
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
