use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use kessel_auth::oidc::OidcTokenSource;
use kessel_inventory_sdk::proto::v1beta2::{
    CheckRequest, DeleteResourceRequest, ReportResourceRequest, ReporterReference,
    ResourceReference, SubjectReference,
};
use kessel_inventory_sdk::v1beta2::{InventoryClient, InventoryHttpClient};
use kessel_inventory_sdk::{AccessTokenSource, Config};
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Args)]
pub struct TransportArgs {
    /// Use the HTTP gateway (`http_url`) instead of gRPC
    #[arg(long)]
    http: bool,
}

/// Print the effective configuration with secrets redacted.
pub fn print_config(config: &Config) -> Result<()> {
    print_json(config)
}

/// Fetch an access token through the configured OIDC client and print it.
pub async fn token(config: &Config) -> Result<()> {
    let Some(oidc) = config.oidc_client_config() else {
        bail!("OIDC is not enabled; set enable_oidc_auth and the oidc settings");
    };
    let source = OidcTokenSource::new(&oidc).context("failed to build OIDC token source")?;
    let token = source
        .access_token()
        .await
        .context("failed to obtain access token")?;
    println!("{}", token.secret().expose());
    Ok(())
}

#[derive(Args)]
pub struct CheckArgs {
    /// Type of the resource being accessed, e.g. `host`
    #[arg(long)]
    object_type: String,

    #[arg(long)]
    object_id: String,

    /// Reporter type owning the object, e.g. `HBI`
    #[arg(long)]
    object_reporter: String,

    /// Relation to check, e.g. `view`
    #[arg(long)]
    relation: String,

    #[arg(long)]
    subject_id: String,

    #[arg(long, default_value = "principal")]
    subject_type: String,

    #[arg(long, default_value = "rbac")]
    subject_reporter: String,

    #[command(flatten)]
    transport: TransportArgs,
}

impl CheckArgs {
    fn request(&self) -> CheckRequest {
        CheckRequest {
            object: Some(ResourceReference {
                resource_type: self.object_type.clone(),
                resource_id: self.object_id.clone(),
                reporter: Some(ReporterReference {
                    r#type: self.object_reporter.clone(),
                    instance_id: None,
                }),
            }),
            relation: self.relation.clone(),
            subject: Some(SubjectReference {
                relation: None,
                resource: Some(ResourceReference {
                    resource_type: self.subject_type.clone(),
                    resource_id: self.subject_id.clone(),
                    reporter: Some(ReporterReference {
                        r#type: self.subject_reporter.clone(),
                        instance_id: None,
                    }),
                }),
            }),
        }
    }

    pub async fn run(&self, config: &Config) -> Result<()> {
        let request = self.request();
        let response = if self.transport.http {
            let client = InventoryHttpClient::new(config)?;
            let opts = client.token_http_options().await?;
            client.resource_service.check(&request, &opts).await?
        } else {
            let mut client = InventoryClient::new(config)?;
            let opts = client.token_call_options().await?;
            client
                .resource_service
                .check(opts.request(request)?)
                .await?
                .into_inner()
        };
        tracing::info!(allowed = ?response.allowed(), "check completed");
        print_json(&response)
    }
}

#[derive(Args)]
pub struct ReportArgs {
    /// JSON file holding a `ReportResourceRequest`
    file: PathBuf,

    #[command(flatten)]
    transport: TransportArgs,
}

impl ReportArgs {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let raw = std::fs::read_to_string(&self.file)
            .with_context(|| format!("failed to read {}", self.file.display()))?;
        let request: ReportResourceRequest = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not a valid report request", self.file.display()))?;

        let response = if self.transport.http {
            let client = InventoryHttpClient::new(config)?;
            let opts = client.token_http_options().await?;
            client.resource_service.report_resource(&request, &opts).await?
        } else {
            let mut client = InventoryClient::new(config)?;
            let opts = client.token_call_options().await?;
            client
                .resource_service
                .report_resource(opts.request(request)?)
                .await?
                .into_inner()
        };
        print_json(&response)
    }
}

#[derive(Args)]
pub struct DeleteArgs {
    #[arg(long)]
    local_resource_id: String,

    #[arg(long)]
    reporter_type: String,

    #[command(flatten)]
    transport: TransportArgs,
}

impl DeleteArgs {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let request = DeleteResourceRequest {
            local_resource_id: self.local_resource_id.clone(),
            reporter_type: self.reporter_type.clone(),
        };

        let response = if self.transport.http {
            let client = InventoryHttpClient::new(config)?;
            let opts = client.token_http_options().await?;
            client.resource_service.delete_resource(&request, &opts).await?
        } else {
            let mut client = InventoryClient::new(config)?;
            let opts = client.token_call_options().await?;
            client
                .resource_service
                .delete_resource(opts.request(request)?)
                .await?
                .into_inner()
        };
        print_json(&response)
    }
}
