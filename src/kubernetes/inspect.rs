// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Read-only report of the access and quota state of one namespace

use crate::error::Result;
use crate::kubernetes::namespaces::ensure_namespace_present;
use k8s_openapi::api::core::v1::ResourceQuota;
use k8s_openapi::api::rbac::v1::RoleBinding;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::{api::ListParams, Api, Client};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Who may act in a namespace and which quota limits apply to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamespaceReport {
    pub namespace: String,
    /// Subject names across every role binding, in listing order
    pub rolebindings: Vec<String>,
    /// The `spec.hard` map of every resource quota
    pub quotas: Vec<BTreeMap<String, Quantity>>,
}

/// Build the report for `namespace`, failing when it does not exist
#[instrument(skip(client))]
pub async fn inspect_namespace(client: &Client, namespace: &str) -> Result<NamespaceReport> {
    ensure_namespace_present(client, namespace).await?;

    let rolebindings = list_role_binding_subjects(client, namespace).await?;
    let quotas = list_quota_limits(client, namespace).await?;

    info!(
        "Namespace {} has {} role binding subjects and {} quotas",
        namespace,
        rolebindings.len(),
        quotas.len()
    );

    Ok(NamespaceReport {
        namespace: namespace.to_string(),
        rolebindings,
        quotas,
    })
}

async fn list_role_binding_subjects(client: &Client, namespace: &str) -> Result<Vec<String>> {
    let api: Api<RoleBinding> = Api::namespaced(client.clone(), namespace);
    let bindings = api.list(&ListParams::default()).await?;
    debug!("Found {} role bindings", bindings.items.len());

    Ok(bindings
        .items
        .into_iter()
        .flat_map(|binding| binding.subjects.unwrap_or_default())
        .map(|subject| subject.name)
        .collect())
}

async fn list_quota_limits(
    client: &Client,
    namespace: &str,
) -> Result<Vec<BTreeMap<String, Quantity>>> {
    let api: Api<ResourceQuota> = Api::namespaced(client.clone(), namespace);
    let quotas = api.list(&ListParams::default()).await?;
    debug!("Found {} resource quotas", quotas.items.len());

    Ok(quotas
        .items
        .into_iter()
        .map(|quota| quota.spec.and_then(|spec| spec.hard).unwrap_or_default())
        .collect())
}
