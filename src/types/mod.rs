// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deployment listing and status types.

pub mod deployment;

pub use deployment::{replicas_match_desired, DeploymentList, DeploymentStatusSnapshot};
