// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation from an explicit kubeconfig file and context

use crate::error::{ProvisionError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Client;
use std::path::Path;
use tracing::{info, instrument};

/// Create a Kubernetes client for `context` from the kubeconfig at `kubeconfig_path`
#[instrument(skip(kubeconfig_path), fields(kubeconfig = %kubeconfig_path.display()))]
pub async fn create_client(kubeconfig_path: &Path, context: &str) -> Result<Client> {
    let kubeconfig = tokio::fs::read_to_string(kubeconfig_path)
        .await
        .map_err(|e| {
            ProvisionError::KubeconfigError(format!(
                "Failed to read {}: {}",
                kubeconfig_path.display(),
                e
            ))
        })?;

    info!("Creating Kubernetes client for context '{}'", context);
    create_client_from_kubeconfig(&kubeconfig, context).await
}

/// Create a Kubernetes client from a kubeconfig string
async fn create_client_from_kubeconfig(kubeconfig: &str, context: &str) -> Result<Client> {
    let client_config = config_from_kubeconfig(kubeconfig, context).await?;

    Client::try_from(client_config)
        .map_err(|e| ProvisionError::KubeconfigError(format!("Failed to create client: {}", e)))
}

async fn config_from_kubeconfig(kubeconfig: &str, context: &str) -> Result<kube::Config> {
    let kubeconfig_parsed: Kubeconfig = serde_yaml::from_str(kubeconfig).map_err(|e| {
        ProvisionError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e))
    })?;

    let options = KubeConfigOptions {
        context: Some(context.to_string()),
        ..Default::default()
    };

    kube::Config::from_custom_kubeconfig(kubeconfig_parsed, &options)
        .await
        .map_err(|e| ProvisionError::KubeconfigError(format!("Failed to create config: {}", e)))
}
