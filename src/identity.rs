// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Client ID lookup for the managed identity a deployment binds to

use crate::command::{command_line, CommandRunner};
use crate::constants::AZ;
use crate::error::{DeployError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

#[async_trait]
pub trait ClientIdResolver: Send + Sync {
    async fn client_id(&self, resource_group: &str, identity_name: &str) -> Result<String>;
}

/// Always answers with the same client ID
#[derive(Debug, Clone)]
pub struct StaticClientId(pub String);

#[async_trait]
impl ClientIdResolver for StaticClientId {
    async fn client_id(&self, _: &str, _: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Looks the identity up with `az identity show`
pub struct AzCliResolver {
    runner: Arc<dyn CommandRunner>,
}

impl AzCliResolver {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl ClientIdResolver for AzCliResolver {
    async fn client_id(&self, resource_group: &str, identity_name: &str) -> Result<String> {
        let args: Vec<String> = [
            "identity",
            "show",
            "--resource-group",
            resource_group,
            "--name",
            identity_name,
            "--query",
            "clientId",
            "--output",
            "tsv",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let output = self
            .runner
            .run(AZ, &args)
            .await?
            .check(&command_line(AZ, &args))?;

        let client_id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if client_id.is_empty() {
            return Err(DeployError::Identity(format!(
                "identity {}/{} has no client ID",
                resource_group, identity_name
            )));
        }

        debug!("Identity {}/{} has client ID {}", resource_group, identity_name, client_id);
        Ok(client_id)
    }
}
