//! `kessel.inventory.v1beta1.resources`
#![allow(clippy::empty_structs_with_brackets)]

use serde::{Deserialize, Serialize};

use crate::proto::protobuf::int64_json;

proto_enum! {
    pub enum ReporterType as reporter_type {
        Unspecified = 0 => "REPORTER_TYPE_UNSPECIFIED",
        Other = 1 => "OTHER",
        Acm = 2 => "ACM",
        Hbi = 3 => "HBI",
        Ocm = 4 => "OCM",
        Notifications = 5 => "NOTIFICATIONS",
    }
}

proto_enum! {
    pub enum ClusterStatus as cluster_status {
        Unspecified = 0 => "CLUSTER_STATUS_UNSPECIFIED",
        Other = 1 => "CLUSTER_STATUS_OTHER",
        Ready = 2 => "READY",
        Failed = 3 => "FAILED",
        Offline = 4 => "OFFLINE",
    }
}

proto_enum! {
    pub enum KubeVendor as kube_vendor {
        Unspecified = 0 => "KUBE_VENDOR_UNSPECIFIED",
        Other = 1 => "KUBE_VENDOR_OTHER",
        Aks = 2 => "AKS",
        Eks = 3 => "EKS",
        Iks = 4 => "IKS",
        Openshift = 5 => "OPENSHIFT",
        Gke = 6 => "GKE",
    }
}

proto_enum! {
    pub enum CloudPlatform as cloud_platform {
        Unspecified = 0 => "CLOUD_PLATFORM_UNSPECIFIED",
        Other = 1 => "CLOUD_PLATFORM_OTHER",
        NoneUpi = 2 => "NONE_UPI",
        BaremetalIpi = 3 => "BAREMETAL_IPI",
        BaremetalUpi = 4 => "BAREMETAL_UPI",
        AwsIpi = 5 => "AWS_IPI",
        AwsUpi = 6 => "AWS_UPI",
        AzureIpi = 7 => "AZURE_IPI",
        GcpIpi = 8 => "GCP_IPI",
    }
}

proto_enum! {
    pub enum Severity as severity {
        Unspecified = 0 => "SEVERITY_UNSPECIFIED",
        Other = 1 => "SEVERITY_OTHER",
        Low = 2 => "LOW",
        Medium = 3 => "MEDIUM",
        High = 4 => "HIGH",
        Critical = 5 => "CRITICAL",
    }
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLabel {
    #[prost(string, tag = "1")]
    pub key: String,

    #[prost(string, tag = "2")]
    pub value: String,
}

/// Server-assigned and shared attributes of a resource.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    #[prost(int64, tag = "1")]
    #[serde(with = "int64_json")]
    pub id: i64,

    #[prost(string, tag = "2")]
    pub resource_type: String,

    #[prost(string, tag = "5")]
    pub workspace_id: String,

    #[prost(string, tag = "6")]
    pub org_id: String,

    #[prost(message, repeated, tag = "7")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<ResourceLabel>,
}

/// Identifies the reporter and the resource within it.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterData {
    #[prost(enumeration = "ReporterType", tag = "1")]
    #[serde(with = "reporter_type")]
    pub reporter_type: i32,

    #[prost(string, tag = "2")]
    pub reporter_instance_id: String,

    #[prost(string, tag = "3")]
    pub console_href: String,

    #[prost(string, tag = "4")]
    pub api_href: String,

    #[prost(string, tag = "5")]
    pub local_resource_id: String,

    #[prost(string, tag = "6")]
    pub reporter_version: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct K8sClusterDetailNodesInner {
    #[prost(string, tag = "1")]
    pub name: String,

    /// CPU capacity, in Kubernetes quantity notation.
    #[prost(string, tag = "2")]
    pub cpu: String,

    #[prost(string, tag = "3")]
    pub memory: String,

    #[prost(message, repeated, tag = "4")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<ResourceLabel>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct K8sClusterDetail {
    #[prost(string, tag = "1")]
    pub external_cluster_id: String,

    #[prost(enumeration = "ClusterStatus", tag = "2")]
    #[serde(with = "cluster_status")]
    pub cluster_status: i32,

    #[prost(string, tag = "3")]
    pub kube_version: String,

    #[prost(enumeration = "KubeVendor", tag = "4")]
    #[serde(with = "kube_vendor")]
    pub kube_vendor: i32,

    #[prost(string, tag = "5")]
    pub vendor_version: String,

    #[prost(enumeration = "CloudPlatform", tag = "6")]
    #[serde(with = "cloud_platform")]
    pub cloud_platform: i32,

    #[prost(message, repeated, tag = "7")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<K8sClusterDetailNodesInner>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct K8sCluster {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_data: Option<ReporterData>,

    #[prost(message, optional, tag = "3")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_data: Option<K8sClusterDetail>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct K8sPolicyDetail {
    #[prost(bool, tag = "1")]
    pub disabled: bool,

    #[prost(enumeration = "Severity", tag = "2")]
    #[serde(with = "severity")]
    pub severity: i32,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct K8sPolicy {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_data: Option<ReporterData>,

    #[prost(message, optional, tag = "3")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_data: Option<K8sPolicyDetail>,
}

/// A RHEL host; hosts carry no reporter-specific data.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct RhelHost {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_data: Option<ReporterData>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsIntegration {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_data: Option<ReporterData>,
}

/// Declares the create/update/delete request and response messages of a
/// resource: create and update carry the resource in `$field`, delete
/// carries only the reporter data.
macro_rules! resource_messages {
    (
        $resource:ty, $field:ident,
        $create:ident / $create_resp:ident,
        $update:ident / $update_resp:ident,
        $delete:ident / $delete_resp:ident $(,)?
    ) => {
        #[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $create {
            #[prost(message, optional, tag = "1")]
            #[serde(skip_serializing_if = "Option::is_none")]
            pub $field: Option<$resource>,
        }

        #[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $create_resp {}

        #[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $update {
            #[prost(message, optional, tag = "1")]
            #[serde(skip_serializing_if = "Option::is_none")]
            pub $field: Option<$resource>,
        }

        #[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $update_resp {}

        #[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $delete {
            #[prost(message, optional, tag = "1")]
            #[serde(skip_serializing_if = "Option::is_none")]
            pub reporter_data: Option<ReporterData>,
        }

        #[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $delete_resp {}
    };
}

resource_messages!(
    K8sCluster, k8s_cluster,
    CreateK8sClusterRequest / CreateK8sClusterResponse,
    UpdateK8sClusterRequest / UpdateK8sClusterResponse,
    DeleteK8sClusterRequest / DeleteK8sClusterResponse,
);

resource_messages!(
    K8sPolicy, k8s_policy,
    CreateK8sPolicyRequest / CreateK8sPolicyResponse,
    UpdateK8sPolicyRequest / UpdateK8sPolicyResponse,
    DeleteK8sPolicyRequest / DeleteK8sPolicyResponse,
);

resource_messages!(
    RhelHost, rhel_host,
    CreateRhelHostRequest / CreateRhelHostResponse,
    UpdateRhelHostRequest / UpdateRhelHostResponse,
    DeleteRhelHostRequest / DeleteRhelHostResponse,
);

resource_messages!(
    NotificationsIntegration, integration,
    CreateNotificationsIntegrationRequest / CreateNotificationsIntegrationResponse,
    UpdateNotificationsIntegrationRequest / UpdateNotificationsIntegrationResponse,
    DeleteNotificationsIntegrationRequest / DeleteNotificationsIntegrationResponse,
);

grpc_client! {
    KesselK8sClusterServiceClient => "kessel.inventory.v1beta1.resources.KesselK8sClusterService" {
        fn create_k8s_cluster(CreateK8sClusterRequest) -> CreateK8sClusterResponse = "CreateK8sCluster";
        fn update_k8s_cluster(UpdateK8sClusterRequest) -> UpdateK8sClusterResponse = "UpdateK8sCluster";
        fn delete_k8s_cluster(DeleteK8sClusterRequest) -> DeleteK8sClusterResponse = "DeleteK8sCluster";
    }
}

grpc_client! {
    KesselK8sPolicyServiceClient => "kessel.inventory.v1beta1.resources.KesselK8sPolicyService" {
        fn create_k8s_policy(CreateK8sPolicyRequest) -> CreateK8sPolicyResponse = "CreateK8sPolicy";
        fn update_k8s_policy(UpdateK8sPolicyRequest) -> UpdateK8sPolicyResponse = "UpdateK8sPolicy";
        fn delete_k8s_policy(DeleteK8sPolicyRequest) -> DeleteK8sPolicyResponse = "DeleteK8sPolicy";
    }
}

grpc_client! {
    KesselRhelHostServiceClient => "kessel.inventory.v1beta1.resources.KesselRhelHostService" {
        fn create_rhel_host(CreateRhelHostRequest) -> CreateRhelHostResponse = "CreateRhelHost";
        fn update_rhel_host(UpdateRhelHostRequest) -> UpdateRhelHostResponse = "UpdateRhelHost";
        fn delete_rhel_host(DeleteRhelHostRequest) -> DeleteRhelHostResponse = "DeleteRhelHost";
    }
}

grpc_client! {
    KesselNotificationsIntegrationServiceClient => "kessel.inventory.v1beta1.resources.KesselNotificationsIntegrationService" {
        fn create_notifications_integration(CreateNotificationsIntegrationRequest) -> CreateNotificationsIntegrationResponse = "CreateNotificationsIntegration";
        fn update_notifications_integration(UpdateNotificationsIntegrationRequest) -> UpdateNotificationsIntegrationResponse = "UpdateNotificationsIntegration";
        fn delete_notifications_integration(DeleteNotificationsIntegrationRequest) -> DeleteNotificationsIntegrationResponse = "DeleteNotificationsIntegration";
    }
}

http_client! {
    KesselK8sClusterServiceHttpClient {
        fn create_k8s_cluster(CreateK8sClusterRequest) -> CreateK8sClusterResponse = POST "/api/inventory/v1beta1/resources/k8s-clusters";
        fn update_k8s_cluster(UpdateK8sClusterRequest) -> UpdateK8sClusterResponse = PUT "/api/inventory/v1beta1/resources/k8s-clusters";
        fn delete_k8s_cluster(DeleteK8sClusterRequest) -> DeleteK8sClusterResponse = DELETE "/api/inventory/v1beta1/resources/k8s-clusters";
    }
}

http_client! {
    KesselK8sPolicyServiceHttpClient {
        fn create_k8s_policy(CreateK8sPolicyRequest) -> CreateK8sPolicyResponse = POST "/api/inventory/v1beta1/resources/k8s-policies";
        fn update_k8s_policy(UpdateK8sPolicyRequest) -> UpdateK8sPolicyResponse = PUT "/api/inventory/v1beta1/resources/k8s-policies";
        fn delete_k8s_policy(DeleteK8sPolicyRequest) -> DeleteK8sPolicyResponse = DELETE "/api/inventory/v1beta1/resources/k8s-policies";
    }
}

http_client! {
    KesselRhelHostServiceHttpClient {
        fn create_rhel_host(CreateRhelHostRequest) -> CreateRhelHostResponse = POST "/api/inventory/v1beta1/resources/rhel-hosts";
        fn update_rhel_host(UpdateRhelHostRequest) -> UpdateRhelHostResponse = PUT "/api/inventory/v1beta1/resources/rhel-hosts";
        fn delete_rhel_host(DeleteRhelHostRequest) -> DeleteRhelHostResponse = DELETE "/api/inventory/v1beta1/resources/rhel-hosts";
    }
}

http_client! {
    KesselNotificationsIntegrationServiceHttpClient {
        fn create_notifications_integration(CreateNotificationsIntegrationRequest) -> CreateNotificationsIntegrationResponse = POST "/api/inventory/v1beta1/resources/notifications-integrations";
        fn update_notifications_integration(UpdateNotificationsIntegrationRequest) -> UpdateNotificationsIntegrationResponse = PUT "/api/inventory/v1beta1/resources/notifications-integrations";
        fn delete_notifications_integration(DeleteNotificationsIntegrationRequest) -> DeleteNotificationsIntegrationResponse = DELETE "/api/inventory/v1beta1/resources/notifications-integrations";
    }
}
