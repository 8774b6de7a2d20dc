// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace lookup utilities

use crate::error::{ProvisionError, Result};
use k8s_openapi::api::core::v1::Namespace;
use kube::{api::ListParams, Api, Client, ResourceExt};
use tracing::{debug, instrument};

/// List the names of all namespaces in the cluster
#[instrument(skip(client))]
pub async fn list_namespaces(client: &Client) -> Result<Vec<String>> {
    let namespaces: Api<Namespace> = Api::all(client.clone());
    let namespace_list = namespaces.list(&ListParams::default()).await?;

    Ok(namespace_list
        .items
        .iter()
        .map(|ns| ns.name_any())
        .collect())
}

/// Fail unless `namespace` is present in the cluster
#[instrument(skip(client))]
pub async fn ensure_namespace_present(client: &Client, namespace: &str) -> Result<()> {
    let names = list_namespaces(client).await?;

    if names.iter().any(|name| name == namespace) {
        debug!("Namespace {} found among {} namespaces", namespace, names.len());
        Ok(())
    } else {
        Err(ProvisionError::NamespaceNotFound(namespace.to_string()))
    }
}
