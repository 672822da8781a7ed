// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster access: kubectl subprocesses and the Kubernetes API.

pub mod deployments;
pub mod kubectl;

pub use deployments::KubeStatusSource;
pub use kubectl::Kubectl;
