//! `kessel.inventory.v1beta1.relationships`
#![allow(clippy::empty_structs_with_brackets)]

use serde::{Deserialize, Serialize};

use super::resources::reporter_type;
use crate::proto::protobuf::int64_json;

proto_enum! {
    /// Compliance state of a propagated policy on a cluster.
    pub enum Status as status {
        Unspecified = 0 => "STATUS_UNSPECIFIED",
        Other = 1 => "STATUS_OTHER",
        Violations = 2 => "VIOLATIONS",
        NoViolations = 3 => "NO_VIOLATIONS",
    }
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipMetadata {
    #[prost(int64, tag = "1")]
    #[serde(with = "int64_json")]
    pub id: i64,

    #[prost(string, tag = "2")]
    pub relationship_type: String,

    #[prost(string, tag = "5")]
    pub org_id: String,
}

/// Reporter of a relationship and the local ids of both ends.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterData {
    #[prost(enumeration = "super::resources::ReporterType", tag = "1")]
    #[serde(with = "reporter_type")]
    pub reporter_type: i32,

    #[prost(string, tag = "2")]
    pub subject_local_resource_id: String,

    #[prost(string, tag = "3")]
    pub object_local_resource_id: String,

    #[prost(string, tag = "4")]
    pub reporter_version: String,

    #[prost(string, tag = "5")]
    pub reporter_instance_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct K8sPolicyIsPropagatedToK8sClusterDetail {
    #[prost(int64, tag = "1")]
    #[serde(with = "int64_json")]
    pub k8s_policy_id: i64,

    #[prost(int64, tag = "2")]
    #[serde(with = "int64_json")]
    pub k8s_cluster_id: i64,

    #[prost(enumeration = "Status", tag = "3")]
    #[serde(with = "status")]
    pub status: i32,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct K8sPolicyIsPropagatedToK8sCluster {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RelationshipMetadata>,

    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_data: Option<ReporterData>,

    #[prost(message, optional, tag = "3")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_data: Option<K8sPolicyIsPropagatedToK8sClusterDetail>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateK8sPolicyIsPropagatedToK8sClusterRequest {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k8spolicy_ispropagatedto_k8scluster: Option<K8sPolicyIsPropagatedToK8sCluster>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateK8sPolicyIsPropagatedToK8sClusterResponse {}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateK8sPolicyIsPropagatedToK8sClusterRequest {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k8spolicy_ispropagatedto_k8scluster: Option<K8sPolicyIsPropagatedToK8sCluster>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateK8sPolicyIsPropagatedToK8sClusterResponse {}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteK8sPolicyIsPropagatedToK8sClusterRequest {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_data: Option<ReporterData>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteK8sPolicyIsPropagatedToK8sClusterResponse {}

grpc_client! {
    KesselK8sPolicyIsPropagatedToK8sClusterServiceClient
        => "kessel.inventory.v1beta1.relationships.KesselK8sPolicyIsPropagatedToK8sClusterService"
    {
        fn create_k8s_policy_is_propagated_to_k8s_cluster(CreateK8sPolicyIsPropagatedToK8sClusterRequest)
            -> CreateK8sPolicyIsPropagatedToK8sClusterResponse = "CreateK8sPolicyIsPropagatedToK8sCluster";
        fn update_k8s_policy_is_propagated_to_k8s_cluster(UpdateK8sPolicyIsPropagatedToK8sClusterRequest)
            -> UpdateK8sPolicyIsPropagatedToK8sClusterResponse = "UpdateK8sPolicyIsPropagatedToK8sCluster";
        fn delete_k8s_policy_is_propagated_to_k8s_cluster(DeleteK8sPolicyIsPropagatedToK8sClusterRequest)
            -> DeleteK8sPolicyIsPropagatedToK8sClusterResponse = "DeleteK8sPolicyIsPropagatedToK8sCluster";
    }
}

http_client! {
    KesselK8sPolicyIsPropagatedToK8sClusterServiceHttpClient {
        fn create_k8s_policy_is_propagated_to_k8s_cluster(CreateK8sPolicyIsPropagatedToK8sClusterRequest)
            -> CreateK8sPolicyIsPropagatedToK8sClusterResponse
            = POST "/api/inventory/v1beta1/resource-relationships/k8s-policy_is-propagated-to_k8s-cluster";
        fn update_k8s_policy_is_propagated_to_k8s_cluster(UpdateK8sPolicyIsPropagatedToK8sClusterRequest)
            -> UpdateK8sPolicyIsPropagatedToK8sClusterResponse
            = PUT "/api/inventory/v1beta1/resource-relationships/k8s-policy_is-propagated-to_k8s-cluster";
        fn delete_k8s_policy_is_propagated_to_k8s_cluster(DeleteK8sPolicyIsPropagatedToK8sClusterRequest)
            -> DeleteK8sPolicyIsPropagatedToK8sClusterResponse
            = DELETE "/api/inventory/v1beta1/resource-relationships/k8s-policy_is-propagated-to_k8s-cluster";
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::proto::v1beta1::resources::ReporterType;
    use serde_json::json;

    #[test]
    fn relationship_json_shape() {
        let req = CreateK8sPolicyIsPropagatedToK8sClusterRequest {
            k8spolicy_ispropagatedto_k8scluster: Some(K8sPolicyIsPropagatedToK8sCluster {
                reporter_data: Some(ReporterData {
                    reporter_type: ReporterType::Acm.into(),
                    subject_local_resource_id: "policy-1".into(),
                    object_local_resource_id: "cluster-1".into(),
                    ..Default::default()
                }),
                relationship_data: Some(K8sPolicyIsPropagatedToK8sClusterDetail {
                    k8s_policy_id: 1,
                    k8s_cluster_id: 2,
                    status: Status::NoViolations.into(),
                }),
                metadata: None,
            }),
        };

        let value = serde_json::to_value(&req).unwrap();
        let rel = &value["k8spolicy_ispropagatedto_k8scluster"];
        assert_eq!(rel["reporter_data"]["reporter_type"], json!("ACM"));
        assert_eq!(rel["relationship_data"]["status"], json!("NO_VIOLATIONS"));
        assert_eq!(rel["relationship_data"]["k8s_cluster_id"], json!("2"));
        assert!(rel.get("metadata").is_none());
    }

    #[test]
    fn service_name() {
        assert_eq!(
            KesselK8sPolicyIsPropagatedToK8sClusterServiceClient::SERVICE_NAME,
            "kessel.inventory.v1beta1.relationships.KesselK8sPolicyIsPropagatedToK8sClusterService"
        );
    }
}
