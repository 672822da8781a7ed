// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::ResourceExt;
use serde::{Deserialize, Serialize};

/// Deployments as printed by `kubectl get deploy -ojson`
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DeploymentList {
    #[serde(default)]
    pub items: Vec<Deployment>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Deployment {
    pub metadata: Metadata,
    #[serde(default)]
    pub spec: Spec,
    #[serde(default)]
    pub status: Status,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Spec {
    #[serde(default = "default_replicas")]
    pub replicas: i32,
}

impl Default for Spec {
    fn default() -> Self {
        Self {
            replicas: default_replicas(),
        }
    }
}

// The API server defaults spec.replicas to 1 when it is left out
fn default_replicas() -> i32 {
    1
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    #[serde(default)]
    pub available_replicas: i32,
}

/// Replica counts of one deployment at the time it was listed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentStatusSnapshot {
    pub name: String,
    pub desired_replicas: i32,
    pub available_replicas: i32,
}

impl DeploymentStatusSnapshot {
    pub fn new(name: impl Into<String>, desired_replicas: i32, available_replicas: i32) -> Self {
        Self {
            name: name.into(),
            desired_replicas,
            available_replicas,
        }
    }

    /// Check if every desired replica is available
    pub fn is_ready(&self) -> bool {
        self.available_replicas == self.desired_replicas
    }
}

impl DeploymentList {
    pub fn snapshots(&self) -> Vec<DeploymentStatusSnapshot> {
        self.items.iter().map(DeploymentStatusSnapshot::from).collect()
    }

    pub fn find(&self, name: &str) -> Option<&Deployment> {
        self.items.iter().find(|d| d.metadata.name == name)
    }
}

impl From<&Deployment> for DeploymentStatusSnapshot {
    fn from(deploy: &Deployment) -> Self {
        Self::new(
            deploy.metadata.name.clone(),
            deploy.spec.replicas,
            deploy.status.available_replicas,
        )
    }
}

impl From<&k8s_openapi::api::apps::v1::Deployment> for DeploymentStatusSnapshot {
    fn from(deploy: &k8s_openapi::api::apps::v1::Deployment) -> Self {
        let desired = deploy
            .spec
            .as_ref()
            .and_then(|s| s.replicas)
            .unwrap_or_else(default_replicas);
        let available = deploy
            .status
            .as_ref()
            .and_then(|s| s.available_replicas)
            .unwrap_or(0);

        Self::new(deploy.name_any(), desired, available)
    }
}

/// Look up `name` in a listing and report whether it is ready.
/// A deployment missing from the listing counts as not ready.
pub fn replicas_match_desired(snapshots: &[DeploymentStatusSnapshot], name: &str) -> bool {
    snapshots
        .iter()
        .find(|s| s.name == name)
        .is_some_and(DeploymentStatusSnapshot::is_ready)
}
