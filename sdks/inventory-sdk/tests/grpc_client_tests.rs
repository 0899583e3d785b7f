//! Construction and credential behavior of the gRPC clients. No server is
//! needed: channels dial lazily.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use kessel_inventory_sdk::proto::v1beta2::{CheckRequest, ResourceReference};
use kessel_inventory_sdk::{
    AccessToken, AccessTokenSource, ClientError, Config, StaticTokenSource, TlsRootConfig,
    TokenError, v1beta1, v1beta2,
};
use tonic::{Code, Request};

fn fixture_ca() -> TlsRootConfig {
    TlsRootConfig::PemFile {
        path: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/test-ca.pem"),
    }
}

fn missing_ca() -> TlsRootConfig {
    TlsRootConfig::PemFile {
        path: PathBuf::from("/nonexistent/kessel/ca.pem"),
    }
}

fn secure_config() -> Config {
    Config::new("inventory.example.com:443").with_tls_roots(fixture_ca())
}

struct FailingSource;

#[async_trait]
impl AccessTokenSource for FailingSource {
    async fn access_token(&self) -> Result<AccessToken, TokenError> {
        Err(TokenError::Unavailable("identity provider down".into()))
    }
}

fn authorization<T>(request: &Request<T>) -> Option<String> {
    request
        .metadata()
        .get("authorization")
        .map(|v| v.to_str().unwrap().to_owned())
}

#[tokio::test]
async fn insecure_config_never_loads_certificates() {
    let config = Config::new("localhost:9000")
        .with_insecure(true)
        .with_tls_roots(missing_ca());

    v1beta1::InventoryClient::new(&config).unwrap();
    v1beta2::InventoryClient::new(&config).unwrap();
}

#[tokio::test]
async fn unreadable_certificates_fail_secure_construction() {
    let config = Config::new("localhost:9000").with_tls_roots(missing_ca());

    let err = v1beta2::InventoryClient::new(&config).unwrap_err();
    assert!(matches!(err, ClientError::Tls(_)), "got {err:?}");

    let err = v1beta1::InventoryClient::new(&config).unwrap_err();
    assert!(matches!(err, ClientError::Tls(_)), "got {err:?}");
}

#[tokio::test]
async fn invalid_config_fails_before_dialing() {
    let err = v1beta2::InventoryClient::new(&Config::new("")).unwrap_err();
    assert!(matches!(err, ClientError::Config(_)), "got {err:?}");
}

#[tokio::test]
async fn without_oidc_options_are_unauthenticated() {
    let client = v1beta2::InventoryClient::new(&secure_config()).unwrap();
    assert!(!client.has_token_source());

    let opts = client.token_call_options().await.unwrap();
    assert!(!opts.is_authenticated());
    let request = opts.request(CheckRequest::default()).unwrap();
    assert_eq!(authorization(&request), None);
}

#[tokio::test]
async fn static_token_becomes_bearer_metadata() {
    let source = Arc::new(StaticTokenSource::new(AccessToken::bearer("abc")));
    let client = v1beta2::InventoryClient::with_token_source(&secure_config(), source).unwrap();
    assert!(client.has_token_source());

    let opts = client.token_call_options().await.unwrap();
    assert!(opts.is_authenticated());
    let request = opts.request(CheckRequest::default()).unwrap();
    assert_eq!(authorization(&request).as_deref(), Some("Bearer abc"));
}

#[tokio::test]
async fn secure_token_is_refused_on_plaintext_channel() {
    let config = Config::new("localhost:9000").with_insecure(true);
    let source = Arc::new(StaticTokenSource::new(AccessToken::bearer("abc")));
    let client = v1beta1::InventoryClient::with_token_source(&config, source).unwrap();

    let opts = client.token_call_options().await.unwrap();
    let status = opts.request(()).unwrap_err();
    assert_eq!(status.code(), Code::Unauthenticated);
}

#[tokio::test]
async fn insecure_token_is_sent_on_plaintext_channel() {
    let config = Config::new("localhost:9000").with_insecure(true);
    let source = Arc::new(StaticTokenSource::new(AccessToken::insecure_bearer("abc")));
    let client = v1beta1::InventoryClient::with_token_source(&config, source).unwrap();

    let opts = client.token_call_options().await.unwrap();
    let request = opts.request(()).unwrap();
    assert_eq!(authorization(&request).as_deref(), Some("Bearer abc"));
}

#[tokio::test]
async fn failing_source_error_is_returned_unchanged() {
    let client =
        v1beta2::InventoryClient::with_token_source(&secure_config(), Arc::new(FailingSource))
            .unwrap();

    let err = client.token_call_options().await.unwrap_err();
    assert_eq!(
        err,
        TokenError::Unavailable("identity provider down".into())
    );
}

/// Pairs a handle with its client's `SERVICE_NAME`; the argument type pins
/// which generated client the field holds.
macro_rules! service_of {
    ($handle:expr, $client:ty) => {{
        let _: &$client = &$handle;
        <$client>::SERVICE_NAME
    }};
}

#[tokio::test]
async fn one_stub_per_backend_service() {
    use kessel_inventory_sdk::proto::v1beta1::relationships::KesselK8sPolicyIsPropagatedToK8sClusterServiceClient;
    use kessel_inventory_sdk::proto::v1beta1::resources::{
        KesselK8sClusterServiceClient, KesselK8sPolicyServiceClient,
        KesselNotificationsIntegrationServiceClient, KesselRhelHostServiceClient,
    };
    use kessel_inventory_sdk::proto::v1beta2::KesselResourceServiceClient;

    let client = v1beta1::InventoryClient::new(&secure_config()).unwrap();
    let names = [
        service_of!(client.k8s_cluster_service, KesselK8sClusterServiceClient),
        service_of!(client.k8s_policy_service, KesselK8sPolicyServiceClient),
        service_of!(
            client.k8s_policy_is_propagated_to_k8s_cluster_service,
            KesselK8sPolicyIsPropagatedToK8sClusterServiceClient
        ),
        service_of!(client.rhel_host_service, KesselRhelHostServiceClient),
        service_of!(
            client.notifications_integration_service,
            KesselNotificationsIntegrationServiceClient
        ),
    ];
    assert_eq!(
        names,
        [
            "kessel.inventory.v1beta1.resources.KesselK8sClusterService",
            "kessel.inventory.v1beta1.resources.KesselK8sPolicyService",
            "kessel.inventory.v1beta1.relationships.KesselK8sPolicyIsPropagatedToK8sClusterService",
            "kessel.inventory.v1beta1.resources.KesselRhelHostService",
            "kessel.inventory.v1beta1.resources.KesselNotificationsIntegrationService",
        ]
    );
    let unique: HashSet<_> = names.iter().collect();
    assert_eq!(unique.len(), names.len());

    let client = v1beta2::InventoryClient::new(&secure_config()).unwrap();
    assert_eq!(
        service_of!(client.resource_service, KesselResourceServiceClient),
        "kessel.inventory.v1beta2.KesselResourceService"
    );
}

#[tokio::test]
async fn grpc_url_scheme_must_match_insecure() {
    let err = v1beta2::InventoryClient::new(&Config::new("http://inventory:9000")).unwrap_err();
    assert!(matches!(err, ClientError::Config(_)), "got {err:?}");

    let config = Config::new("https://inventory:9000").with_insecure(true);
    let err = v1beta1::InventoryClient::new(&config).unwrap_err();
    assert!(matches!(err, ClientError::Config(_)), "got {err:?}");
}

#[tokio::test]
async fn call_to_unreachable_server_fails_with_status() {
    // Port 1 is reserved and normally closed.
    let config = Config::new("127.0.0.1:1").with_insecure(true);
    let mut client = v1beta2::InventoryClient::new(&config).unwrap();

    let opts = client.token_call_options().await.unwrap();
    let request = opts
        .request(CheckRequest {
            object: Some(ResourceReference {
                resource_type: "host".into(),
                resource_id: "h-1".into(),
                reporter: None,
            }),
            relation: "view".into(),
            subject: None,
        })
        .unwrap();

    let status = client.resource_service.check(request).await.unwrap_err();
    assert!(
        matches!(status.code(), Code::Unavailable | Code::Unknown),
        "got {status:?}"
    );
}
