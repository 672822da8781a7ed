// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! kubectl invocations for applying, deleting, and listing deployments

use crate::command::{command_line, CommandRunner};
use crate::constants::KUBECTL;
use crate::error::Result;
use crate::readiness::StatusSource;
use crate::types::{DeploymentList, DeploymentStatusSnapshot};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, instrument};

pub struct Kubectl {
    runner: Arc<dyn CommandRunner>,
    program: String,
}

impl Kubectl {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self::with_program(runner, KUBECTL)
    }

    /// Use a different binary, e.g. a wrapper script or an absolute path
    pub fn with_program(runner: Arc<dyn CommandRunner>, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    /// `kubectl apply -f <manifest>`
    #[instrument(skip(self, manifest), fields(manifest = %manifest.display()))]
    pub async fn apply(&self, manifest: &Path) -> Result<()> {
        let args = vec![
            "apply".to_string(),
            "-f".to_string(),
            manifest.display().to_string(),
        ];
        let output = self.run(&args).await?;
        info!("{}", output.trim());
        Ok(())
    }

    /// `kubectl delete -f <manifest> --ignore-not-found`
    #[instrument(skip(self, manifest), fields(manifest = %manifest.display()))]
    pub async fn delete(&self, manifest: &Path) -> Result<()> {
        let args = vec![
            "delete".to_string(),
            "-f".to_string(),
            manifest.display().to_string(),
            "--ignore-not-found".to_string(),
        ];
        self.run(&args).await?;
        Ok(())
    }

    /// `kubectl get deploy -ojson`
    pub async fn get_deployments(&self) -> Result<DeploymentList> {
        let args = vec!["get".to_string(), "deploy".to_string(), "-ojson".to_string()];
        let stdout = self.run(&args).await?;

        serde_json::from_str(&stdout).map_err(|e| {
            error!("Error unmarshalling deployments json: {}", e);
            e.into()
        })
    }

    async fn run(&self, args: &[String]) -> Result<String> {
        let output = self
            .runner
            .run(&self.program, args)
            .await?
            .check(&command_line(&self.program, args))?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl StatusSource for Kubectl {
    async fn list_deployments(&self) -> Result<Vec<DeploymentStatusSnapshot>> {
        Ok(self.get_deployments().await?.snapshots())
    }
}
