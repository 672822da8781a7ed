// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Default cluster-management binary
pub const KUBECTL: &str = "kubectl";

/// Azure CLI binary used for identity lookups
pub const AZ: &str = "az";

/// Manifest template and rendering locations
pub mod manifest {
    /// Template location relative to the working directory
    pub const DEFAULT_TEMPLATE_PATH: &str = "template/deployment.yaml";
    /// Appended to the deployment name to build the output file name
    pub const FILE_SUFFIX: &str = "-deployment.yaml";
}

/// Readiness polling configuration
pub mod readiness {
    /// Interval between two status listings in seconds
    pub const POLL_INTERVAL_SECS: u64 = 3;
    /// Total time to wait for a deployment to become available in seconds
    pub const TIMEOUT_SECS: u64 = 30;
}
