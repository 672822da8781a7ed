// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Template error: {0}")]
    Template(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to launch `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command `{command}` failed: {output}")]
    CommandFailed { command: String, output: String },

    #[error("Failed to parse command output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Timeout exceeded ({timeout:?}) while waiting for deployment ({name}) to be available")]
    Timeout { name: String, timeout: Duration },

    #[error("Identity lookup failed: {0}")]
    Identity(String),

    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Readiness poller stopped unexpectedly: {0}")]
    Poller(#[from] tokio::task::JoinError),

    #[error("Invalid deployment name: {0:?}")]
    InvalidName(String),
}

pub type Result<T> = std::result::Result<T, DeployError>;
