//! `kessel.inventory.v1beta2`: resource reporting and permission checks.
#![allow(clippy::empty_structs_with_brackets)]

use prost_types::Struct;
use serde::{Deserialize, Serialize};

use super::protobuf::struct_json;

proto_enum! {
    /// Outcome of a permission check.
    pub enum Allowed as allowed {
        Unspecified = 0 => "ALLOWED_UNSPECIFIED",
        True = 1 => "ALLOWED_TRUE",
        False = 2 => "ALLOWED_FALSE",
    }
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportResourceRequest {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportResourceResponse {}

/// A resource as seen by one reporter.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct Resource {
    /// e.g. `k8s_cluster`, `host`
    #[prost(string, tag = "1")]
    pub resource_type: String,

    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_data: Option<ReporterData>,

    #[prost(message, optional, tag = "3")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_resource_data: Option<CommonResourceData>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterData {
    #[prost(string, tag = "1")]
    pub reporter_type: String,

    #[prost(string, tag = "2")]
    pub reporter_instance_id: String,

    #[prost(string, tag = "3")]
    pub reporter_version: String,

    /// Identifier of the resource within the reporter.
    #[prost(string, tag = "4")]
    pub local_resource_id: String,

    #[prost(string, tag = "5")]
    pub api_href: String,

    #[prost(string, tag = "6")]
    pub console_href: String,

    /// Reporter-specific attributes, validated by the server against the
    /// resource type's schema.
    #[prost(message, optional, tag = "7")]
    #[serde(with = "struct_json", skip_serializing_if = "Option::is_none")]
    pub resource_data: Option<Struct>,
}

/// Attributes shared by every reporter of a resource.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonResourceData {
    #[prost(string, tag = "1")]
    pub workspace_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteResourceRequest {
    #[prost(string, tag = "1")]
    pub local_resource_id: String,

    #[prost(string, tag = "2")]
    pub reporter_type: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteResourceResponse {}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterReference {
    #[prost(string, tag = "1")]
    pub r#type: String,

    #[prost(string, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceReference {
    #[prost(string, tag = "1")]
    pub resource_type: String,

    #[prost(string, tag = "2")]
    pub resource_id: String,

    #[prost(message, optional, tag = "3")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter: Option<ReporterReference>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectReference {
    /// Relation on the subject resource, for subject sets.
    #[prost(string, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,

    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceReference>,
}

/// Does `subject` have `relation` on `object`?
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckRequest {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<ResourceReference>,

    #[prost(string, tag = "2")]
    pub relation: String,

    #[prost(message, optional, tag = "3")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<SubjectReference>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckResponse {
    #[prost(enumeration = "Allowed", tag = "1")]
    #[serde(with = "allowed")]
    pub allowed: i32,
}

/// Same question as [`CheckRequest`], answered with read-your-writes
/// consistency ahead of an update.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckForUpdateRequest {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<ResourceReference>,

    #[prost(string, tag = "2")]
    pub relation: String,

    #[prost(message, optional, tag = "3")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<SubjectReference>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckForUpdateResponse {
    #[prost(enumeration = "Allowed", tag = "1")]
    #[serde(with = "allowed")]
    pub allowed: i32,
}

grpc_client! {
    /// gRPC client for `KesselResourceService`.
    KesselResourceServiceClient => "kessel.inventory.v1beta2.KesselResourceService" {
        /// Create or update a resource from a reporter.
        fn report_resource(ReportResourceRequest) -> ReportResourceResponse = "ReportResource";
        /// Remove a reporter's view of a resource.
        fn delete_resource(DeleteResourceRequest) -> DeleteResourceResponse = "DeleteResource";
        fn check(CheckRequest) -> CheckResponse = "Check";
        fn check_for_update(CheckForUpdateRequest) -> CheckForUpdateResponse = "CheckForUpdate";
    }
}

http_client! {
    /// HTTP client for `KesselResourceService`.
    KesselResourceServiceHttpClient {
        fn report_resource(ReportResourceRequest) -> ReportResourceResponse = POST "/api/inventory/v1beta2/resources";
        fn delete_resource(DeleteResourceRequest) -> DeleteResourceResponse = DELETE "/api/inventory/v1beta2/resources";
        fn check(CheckRequest) -> CheckResponse = POST "/api/inventory/v1beta2/check";
        fn check_for_update(CheckForUpdateRequest) -> CheckForUpdateResponse = POST "/api/inventory/v1beta2/checkforupdate";
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use prost::Message;
    use serde_json::json;

    fn check_request() -> CheckRequest {
        CheckRequest {
            object: Some(ResourceReference {
                resource_type: "host".into(),
                resource_id: "dd1b73b9".into(),
                reporter: Some(ReporterReference {
                    r#type: "HBI".into(),
                    instance_id: None,
                }),
            }),
            relation: "view".into(),
            subject: Some(SubjectReference {
                relation: None,
                resource: Some(ResourceReference {
                    resource_type: "principal".into(),
                    resource_id: "redhat/alice".into(),
                    reporter: Some(ReporterReference {
                        r#type: "rbac".into(),
                        instance_id: None,
                    }),
                }),
            }),
        }
    }

    #[test]
    fn check_request_json_uses_proto_field_names() {
        let value = serde_json::to_value(check_request()).unwrap();
        assert_eq!(
            value,
            json!({
                "object": {
                    "resource_type": "host",
                    "resource_id": "dd1b73b9",
                    "reporter": {"type": "HBI"}
                },
                "relation": "view",
                "subject": {
                    "resource": {
                        "resource_type": "principal",
                        "resource_id": "redhat/alice",
                        "reporter": {"type": "rbac"}
                    }
                }
            })
        );
    }

    #[test]
    fn check_response_reads_enum_name() {
        let resp: CheckResponse = serde_json::from_str(r#"{"allowed":"ALLOWED_TRUE"}"#).unwrap();
        assert_eq!(resp.allowed(), Allowed::True);
        let empty: CheckResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.allowed(), Allowed::Unspecified);
    }

    #[test]
    fn report_request_carries_resource_data_object() {
        let body = json!({
            "resource": {
                "resource_type": "k8s_cluster",
                "reporter_data": {
                    "reporter_type": "ACM",
                    "reporter_instance_id": "acm-1",
                    "local_resource_id": "cluster-1",
                    "resource_data": {"external_cluster_id": "abc", "nodes": 3.0}
                },
                "common_resource_data": {"workspace_id": "ws-1"}
            }
        });
        let req: ReportResourceRequest = serde_json::from_value(body).unwrap();
        let resource = req.resource.as_ref().unwrap();
        let data = resource.reporter_data.as_ref().unwrap();
        assert_eq!(data.local_resource_id, "cluster-1");
        assert_eq!(data.resource_data.as_ref().unwrap().fields.len(), 2);

        let decoded = ReportResourceRequest::decode(req.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn service_name_matches_path_prefix() {
        assert_eq!(
            KesselResourceServiceClient::SERVICE_NAME,
            "kessel.inventory.v1beta2.KesselResourceService"
        );
    }
}
