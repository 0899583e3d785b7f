//! Inventory API messages and service stubs.
//!
//! Messages are prost types that also carry the API's JSON mapping: proto
//! field names, enum value names, `int64` as strings and
//! `google.protobuf.Struct` as plain objects. Each service has a gRPC stub
//! over a shared [`Channel`] and an HTTP stub over the JSON gateway routes.

use http::uri::PathAndQuery;
use tonic::client::Grpc;
use tonic::transport::Channel;
use tonic::{GrpcMethod, Request, Response, Status};
use tonic_prost::ProstCodec;

#[macro_use]
mod enum_serde;
pub mod protobuf;

/// Issue one unary call on `grpc`.
pub(crate) async fn unary<Req, Resp>(
    grpc: &mut Grpc<Channel>,
    service: &'static str,
    method: &'static str,
    path: &'static str,
    mut request: Request<Req>,
) -> Result<Response<Resp>, Status>
where
    Req: prost::Message + Send + Sync + 'static,
    Resp: prost::Message + Default + Send + Sync + 'static,
{
    grpc.ready()
        .await
        .map_err(|e| Status::unknown(format!("service was not ready: {e}")))?;
    request
        .extensions_mut()
        .insert(GrpcMethod::new(service, method));
    grpc.unary(request, PathAndQuery::from_static(path), ProstCodec::default())
        .await
}

/// Declares a gRPC client for one service: a unary method per RPC, sent to
/// `/<service>/<rpc>`.
macro_rules! grpc_client {
    (
        $(#[$meta:meta])*
        $client:ident => $service:literal {
            $( $(#[$mmeta:meta])* fn $method:ident($req:ty) -> $resp:ty = $rpc:literal; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $client {
            inner: ::tonic::client::Grpc<::tonic::transport::Channel>,
        }

        impl $client {
            /// Fully qualified gRPC service name.
            pub const SERVICE_NAME: &'static str = $service;

            #[must_use]
            pub fn new(channel: ::tonic::transport::Channel) -> Self {
                Self {
                    inner: ::tonic::client::Grpc::new(channel),
                }
            }

            $(
                $(#[$mmeta])*
                ///
                /// # Errors
                ///
                /// Returns the status reported by the server or the channel.
                pub async fn $method(
                    &mut self,
                    request: impl ::tonic::IntoRequest<$req>,
                ) -> Result<::tonic::Response<$resp>, ::tonic::Status> {
                    $crate::proto::unary(
                        &mut self.inner,
                        $service,
                        $rpc,
                        concat!("/", $service, "/", $rpc),
                        ::tonic::IntoRequest::into_request(request),
                    )
                    .await
                }
            )+
        }
    };
}

/// Declares an HTTP client for one service: a JSON call per route.
macro_rules! http_client {
    (
        $(#[$meta:meta])*
        $client:ident {
            $( $(#[$mmeta:meta])* fn $method:ident($req:ty) -> $resp:ty = $verb:ident $path:literal; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $client {
            transport: $crate::http_transport::HttpTransport,
        }

        impl $client {
            pub(crate) fn new(transport: $crate::http_transport::HttpTransport) -> Self {
                Self { transport }
            }

            $(
                $(#[$mmeta])*
                #[doc = concat!("\n\n`", stringify!($verb), " ", $path, "`")]
                ///
                /// # Errors
                ///
                /// Returns [`ClientError::Api`](crate::ClientError::Api) for
                /// error responses and [`ClientError::Http`](crate::ClientError::Http)
                /// for transport failures.
                pub async fn $method(
                    &self,
                    request: &$req,
                    options: &::kessel_auth::HttpCallOptions,
                ) -> Result<$resp, $crate::ClientError> {
                    self.transport
                        .call(::http::Method::$verb, $path, request, options)
                        .await
                }
            )+
        }
    };
}

pub mod v1beta1;
pub mod v1beta2;
