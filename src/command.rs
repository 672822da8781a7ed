// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Command execution for external tooling (kubectl, az).

use crate::error::{DeployError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::info;

/// Captured result of a finished command
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Output of a command that exited with status 0
    pub fn ok(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: Vec::new(),
        }
    }

    /// Output of a command that exited with a non-zero status
    pub fn failed(stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            success: false,
            stdout: Vec::new(),
            stderr: stderr.into(),
        }
    }

    /// stdout followed by stderr, lossily decoded
    pub fn combined(&self) -> String {
        let mut out = String::from_utf8_lossy(&self.stdout).into_owned();
        out.push_str(&String::from_utf8_lossy(&self.stderr));
        out
    }

    /// Turn a non-zero exit into a `CommandFailed` error
    pub fn check(self, command: &str) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(DeployError::CommandFailed {
                command: command.to_string(),
                output: self.combined().trim().to_string(),
            })
        }
    }
}

/// Runs an external program to completion.
///
/// Implementations only fail when the program cannot be launched; a non-zero
/// exit is reported through [`CommandOutput::success`].
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Render a command line for logs and error messages
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Spawns real processes with tokio
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let command = command_line(program, args);
        info!("$ {}", command);

        // Dropping the future (e.g. on a readiness timeout) kills the child
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| DeployError::CommandSpawn { command, source })?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
