// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Create, inspect, wait on, and delete a test deployment.

use crate::config::StatusSourceKind;
use crate::error::Result;
use crate::identity::ClientIdResolver;
use crate::kubernetes::{KubeStatusSource, Kubectl};
use crate::manifest::{manifest_path, validate_name, ManifestTemplate, ManifestValues};
use crate::readiness::{ReadinessWaiter, StatusSource, WaitConfig};
use crate::types::{replicas_match_desired, DeploymentList};
use std::path::{Path, PathBuf};
use kube::Client;
use std::sync::Arc;
use tracing::{info, instrument};

/// A deployment fixture for e2e suites
pub struct DeploymentFixture {
    kubectl: Arc<Kubectl>,
    identity: Arc<dyn ClientIdResolver>,
    template: ManifestTemplate,
    output_dir: PathBuf,
    wait: WaitConfig,
}

impl DeploymentFixture {
    pub fn new(
        kubectl: Kubectl,
        identity: Arc<dyn ClientIdResolver>,
        template: ManifestTemplate,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            kubectl: Arc::new(kubectl),
            identity,
            template,
            output_dir: output_dir.into(),
            wait: WaitConfig::default(),
        }
    }

    pub fn with_wait_config(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render the template for `name` and apply it. Returns the manifest path.
    #[instrument(skip(self, subscription_id))]
    pub async fn create(
        &self,
        subscription_id: &str,
        resource_group: &str,
        name: &str,
        identity_binding: &str,
    ) -> Result<PathBuf> {
        validate_name(name)?;
        let client_id = self.identity.client_id(resource_group, identity_binding).await?;

        let values = ManifestValues {
            subscription_id: subscription_id.to_string(),
            resource_group: resource_group.to_string(),
            client_id,
            name: name.to_string(),
            identity_binding: identity_binding.to_string(),
        };
        let path = self.template.render_to_dir(&values, &self.output_dir).await?;

        self.kubectl.apply(&path).await?;
        info!("Deployment {} created", name);
        Ok(path)
    }

    /// Delete the deployment created for `name`; a missing one is not an error
    #[instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        self.kubectl
            .delete(&manifest_path(&self.output_dir, name))
            .await
    }

    pub async fn get_all(&self) -> Result<DeploymentList> {
        self.kubectl.get_deployments().await
    }

    /// One listing: `false` when `name` is not listed or not fully available
    pub async fn is_available_replicas_match_desired(&self, name: &str) -> Result<bool> {
        let list = self.get_all().await?;
        Ok(replicas_match_desired(&list.snapshots(), name))
    }

    /// Resolve where readiness is read from. Call before `create` so a cluster
    /// connection failure cannot leave a created deployment behind.
    pub async fn status_source(&self, kind: StatusSourceKind) -> Result<Arc<dyn StatusSource>> {
        let source: Arc<dyn StatusSource> = match kind {
            StatusSourceKind::Kubectl => self.kubectl.clone(),
            StatusSourceKind::Api => {
                let client = Client::try_default().await?;
                info!("Connected to Kubernetes cluster");
                Arc::new(KubeStatusSource::new(client))
            }
        };
        Ok(source)
    }

    /// Block until all replicas of `name` are available, polling kubectl
    pub async fn wait_on_ready(&self, name: &str) -> Result<()> {
        let source: Arc<dyn StatusSource> = self.kubectl.clone();
        self.wait_on_ready_with(source, name).await
    }

    /// Block until all replicas of `name` are available according to `source`
    pub async fn wait_on_ready_with(&self, source: Arc<dyn StatusSource>, name: &str) -> Result<()> {
        ReadinessWaiter::new(source, self.wait)
            .wait_on_ready(name)
            .await
    }
}
