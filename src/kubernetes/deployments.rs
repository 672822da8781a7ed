// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deployment status listing through the Kubernetes API

use crate::error::Result;
use crate::readiness::StatusSource;
use crate::types::DeploymentStatusSnapshot;
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use kube::{api::ListParams, Api, Client};
use tracing::debug;

/// Lists `apps/v1` Deployments with a kube client instead of shelling out
pub struct KubeStatusSource {
    api: Api<Deployment>,
}

impl KubeStatusSource {
    /// Use the client's default namespace, same as a bare `kubectl get deploy`
    pub fn new(client: Client) -> Self {
        Self {
            api: Api::default_namespaced(client),
        }
    }

    pub fn namespaced(client: Client, namespace: &str) -> Self {
        Self {
            api: Api::namespaced(client, namespace),
        }
    }
}

#[async_trait]
impl StatusSource for KubeStatusSource {
    async fn list_deployments(&self) -> Result<Vec<DeploymentStatusSnapshot>> {
        let list = self.api.list(&ListParams::default()).await?;
        debug!("Listed {} deployments", list.items.len());

        Ok(list.items.iter().map(DeploymentStatusSnapshot::from).collect())
    }
}
