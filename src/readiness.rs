// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Bounded polling until a deployment reports all replicas available.

use crate::constants::readiness::{POLL_INTERVAL_SECS, TIMEOUT_SECS};
use crate::error::{DeployError, Result};
use crate::manifest::validate_name;
use crate::types::{replicas_match_desired, DeploymentStatusSnapshot};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, instrument, warn};

/// Anything that can list the current deployment states
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn list_deployments(&self) -> Result<Vec<DeploymentStatusSnapshot>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(POLL_INTERVAL_SECS),
            timeout: Duration::from_secs(TIMEOUT_SECS),
        }
    }
}

#[derive(Debug)]
pub enum WaitOutcome {
    Ready,
    TimedOut { elapsed: Duration },
    Failed(DeployError),
}

impl WaitOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, WaitOutcome::Ready)
    }
}

pub struct ReadinessWaiter {
    source: Arc<dyn StatusSource>,
    config: WaitConfig,
}

impl ReadinessWaiter {
    pub fn new(source: Arc<dyn StatusSource>, config: WaitConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> WaitConfig {
        self.config
    }

    /// Poll until `name` is ready, the source fails, or the timeout expires.
    ///
    /// A deployment that never shows up in the listing is treated like one
    /// that is not ready yet and ends in [`WaitOutcome::TimedOut`].
    #[instrument(skip(self), fields(timeout = ?self.config.timeout))]
    pub async fn wait(&self, name: &str) -> WaitOutcome {
        if let Err(e) = validate_name(name) {
            return WaitOutcome::Failed(e);
        }

        let started = Instant::now();
        let mut poller = tokio::spawn(poll_until_ready(
            Arc::clone(&self.source),
            name.to_string(),
            self.config.poll_interval,
        ));

        let outcome = tokio::select! {
            biased;
            joined = &mut poller => match joined {
                Ok(Ok(())) => WaitOutcome::Ready,
                Ok(Err(e)) => WaitOutcome::Failed(e),
                Err(e) => WaitOutcome::Failed(DeployError::Poller(e)),
            },
            _ = sleep(self.config.timeout) => WaitOutcome::TimedOut {
                elapsed: started.elapsed(),
            },
        };

        // Cancels an in-flight listing or sleep when the deadline won
        poller.abort();

        match &outcome {
            WaitOutcome::Ready => info!("Deployment {} is available", name),
            WaitOutcome::TimedOut { elapsed } => {
                warn!("Deployment {} not available after {:?}", name, elapsed)
            }
            WaitOutcome::Failed(e) => warn!("Waiting for deployment {} failed: {}", name, e),
        }

        outcome
    }

    /// Same as [`ReadinessWaiter::wait`], with timeouts turned into errors
    pub async fn wait_on_ready(&self, name: &str) -> Result<()> {
        match self.wait(name).await {
            WaitOutcome::Ready => Ok(()),
            WaitOutcome::TimedOut { .. } => Err(DeployError::Timeout {
                name: name.to_string(),
                timeout: self.config.timeout,
            }),
            WaitOutcome::Failed(e) => Err(e),
        }
    }
}

async fn poll_until_ready(
    source: Arc<dyn StatusSource>,
    name: String,
    interval: Duration,
) -> Result<()> {
    loop {
        let snapshots = source.list_deployments().await?;

        if replicas_match_desired(&snapshots, &name) {
            return Ok(());
        }

        match snapshots.iter().find(|s| s.name == name) {
            Some(s) => debug!(
                "Deployment {} has {}/{} replicas available, checking again in {:?}",
                name, s.available_replicas, s.desired_replicas, interval
            ),
            None => debug!(
                "Deployment {} not listed yet, checking again in {:?}",
                name, interval
            ),
        }

        sleep(interval).await;
    }
}
