// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use e2e_deploy::command::{CommandRunner, ProcessRunner};
use e2e_deploy::config::Config;
use e2e_deploy::identity::{AzCliResolver, ClientIdResolver, StaticClientId};
use e2e_deploy::kubernetes::Kubectl;
use e2e_deploy::manifest::ManifestTemplate;
use e2e_deploy::DeploymentFixture;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: deployment={} template={} output_dir={}",
        config.deployment_name,
        config.template_path.display(),
        config.output_dir.display()
    );

    let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner);
    let identity: Arc<dyn ClientIdResolver> = match &config.client_id {
        Some(client_id) => Arc::new(StaticClientId(client_id.clone())),
        None => Arc::new(AzCliResolver::new(runner.clone())),
    };

    let template = ManifestTemplate::from_file(&config.template_path).await?;
    let fixture = DeploymentFixture::new(
        Kubectl::with_program(runner, config.kubectl.clone()),
        identity,
        template,
        config.output_dir.clone(),
    )
    .with_wait_config(config.wait);

    // Connect before creating anything so a failure here leaves nothing to clean up
    let source = fixture.status_source(config.status_source).await?;

    fixture
        .create(
            &config.subscription_id,
            &config.resource_group,
            &config.deployment_name,
            &config.identity_binding,
        )
        .await?;

    let waited = fixture
        .wait_on_ready_with(source, &config.deployment_name)
        .await;

    if config.keep_deployment {
        info!("Keeping deployment {}", config.deployment_name);
    } else if let Err(e) = fixture.delete(&config.deployment_name).await {
        warn!("Failed to delete deployment {}: {}", config.deployment_name, e);
    }

    waited?;
    info!("Deployment {} became available", config.deployment_name);
    Ok(())
}
