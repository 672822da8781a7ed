// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{manifest, readiness, KUBECTL};
use crate::readiness::WaitConfig;
use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Where readiness is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSourceKind {
    /// `kubectl get deploy -ojson`
    Kubectl,
    /// The Kubernetes API through a kube client
    Api,
}

/// Fixture configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub subscription_id: String,
    pub resource_group: String,
    pub identity_binding: String,
    pub deployment_name: String,
    /// Skips the `az identity show` lookup when set
    pub client_id: Option<String>,
    pub template_path: PathBuf,
    pub output_dir: PathBuf,
    pub kubectl: String,
    pub status_source: StatusSourceKind,
    pub wait: WaitConfig,
    /// Leave the deployment running after it became ready
    pub keep_deployment: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.is_empty())
                .with_context(|| format!("{} environment variable not set", key))
        };
        let seconds = |key: &str, default: u64| -> Result<Duration> {
            let secs = match lookup(key) {
                Some(v) => v
                    .parse()
                    .with_context(|| format!("{} must be a number of seconds, got {:?}", key, v))?,
                None => default,
            };
            if secs == 0 {
                bail!("{} must be greater than zero", key);
            }
            Ok(Duration::from_secs(secs))
        };

        let status_source = match lookup("STATUS_SOURCE").as_deref() {
            None | Some("kubectl") => StatusSourceKind::Kubectl,
            Some("api") => StatusSourceKind::Api,
            Some(other) => bail!("STATUS_SOURCE must be 'kubectl' or 'api', got {:?}", other),
        };

        Ok(Config {
            subscription_id: required("SUBSCRIPTION_ID")?,
            resource_group: required("RESOURCE_GROUP")?,
            identity_binding: required("IDENTITY_BINDING")?,
            deployment_name: required("DEPLOYMENT_NAME")?,
            client_id: lookup("CLIENT_ID").filter(|v| !v.is_empty()),
            template_path: lookup("TEMPLATE_PATH")
                .unwrap_or_else(|| manifest::DEFAULT_TEMPLATE_PATH.to_string())
                .into(),
            output_dir: lookup("OUTPUT_DIR").unwrap_or_else(|| ".".to_string()).into(),
            kubectl: lookup("KUBECTL").unwrap_or_else(|| KUBECTL.to_string()),
            status_source,
            wait: WaitConfig {
                poll_interval: seconds("POLL_INTERVAL_SECS", readiness::POLL_INTERVAL_SECS)?,
                timeout: seconds("WAIT_TIMEOUT_SECS", readiness::TIMEOUT_SECS)?,
            },
            keep_deployment: lookup("KEEP_DEPLOYMENT")
                .unwrap_or("false".to_string())
                .parse()
                .unwrap_or(false),
        })
    }
}
