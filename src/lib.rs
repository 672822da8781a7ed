// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod command;
pub mod config;
pub mod constants;
pub mod deploy;
pub mod error;
pub mod identity;
pub mod kubernetes;
pub mod manifest;
pub mod readiness;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use deploy::DeploymentFixture;
pub use error::{DeployError, Result};
pub use readiness::{ReadinessWaiter, StatusSource, WaitConfig, WaitOutcome};
